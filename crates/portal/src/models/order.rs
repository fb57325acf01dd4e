//! Orders and order items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use threadline_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// A placed catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    /// Order total in cents.
    pub total: Price,
}

/// Body for `POST /orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub user_id: UserId,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total: Price,
}

/// One line of a placed order.
///
/// `price_at_purchase` is the unit price captured at checkout. It is never
/// refreshed from the product, so later price edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_at_purchase: Price,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price_at_purchase * self.quantity
    }
}

/// Body for `POST /orderItems`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price_at_purchase: Price,
}
