//! Checkout and order history.

use chrono::{DateTime, Utc};
use tracing::instrument;

use threadline_core::{OrderId, OrderStatus, UserId};

use crate::api::ApiClient;
use crate::cart::{Cart, CartItem};
use crate::error::{PortalError, Result, add_breadcrumb};
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem};

/// An order together with the items created for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Order placement and lookup.
#[derive(Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Turn the cart into an order for `user_id`, placed at `now`.
    ///
    /// The order is created first, then one item per cart line with the
    /// line's unit price frozen as `priceAtPurchase`. The cart is cleared
    /// only once every item exists. If an item fails, the half-built order
    /// is marked cancelled (best effort) and the cart is kept.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::EmptyCart` if the cart has no lines,
    /// `PortalError::Api` if a backend call fails, or `PortalError::Store`
    /// if the emptied cart cannot be persisted.
    #[instrument(skip(self, cart), fields(user_id = %user_id))]
    pub async fn checkout(
        &self,
        cart: &Cart,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<PlacedOrder> {
        let lines = cart.items();
        if lines.is_empty() {
            return Err(PortalError::EmptyCart);
        }

        let total = lines.iter().map(CartItem::line_total).sum();
        let order = self
            .api
            .create_order(&NewOrder {
                user_id,
                order_date: now,
                status: OrderStatus::Pending,
                total,
            })
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let body = NewOrderItem {
                order_id: order.id,
                product_id: line.product_id,
                quantity: line.quantity,
                price_at_purchase: line.price,
            };
            match self.api.create_order_item(&body).await {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::error!(order_id = %order.id, error = %e, "Failed to create order item");
                    if let Err(cancel) = self
                        .api
                        .update_order_status(order.id, &OrderStatus::Cancelled)
                        .await
                    {
                        tracing::warn!(order_id = %order.id, error = %cancel, "Failed to cancel partial order");
                    }
                    return Err(e.into());
                }
            }
        }

        cart.clear_cart()?;

        tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
        add_breadcrumb(
            "checkout",
            "Placed order",
            Some(&[("order_id", &order.id.to_string())]),
        );
        Ok(PlacedOrder { order, items })
    }

    /// A user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        let mut orders = self.api.orders_by_user(user_id).await?;
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    /// An order and its items.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if the order does not exist or a backend
    /// call fails.
    pub async fn get(&self, id: OrderId) -> Result<PlacedOrder> {
        let order = self.api.get_order(id).await?;
        let items = self.api.order_items(id).await?;
        Ok(PlacedOrder { order, items })
    }

    /// Brand-side status change.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Api` if the backend call fails.
    pub async fn update_status(&self, id: OrderId, status: &OrderStatus) -> Result<Order> {
        Ok(self.api.update_order_status(id, status).await?)
    }
}
