//! `/orders` and `/orderItems`.

use reqwest::Method;
use serde::Serialize;
use tracing::instrument;

use threadline_core::{OrderId, OrderStatus, UserId};

use super::{ApiClient, ApiError};
use crate::models::{NewOrder, NewOrderItem, Order, OrderItem};

#[derive(Serialize)]
struct StatusPatch<'a> {
    status: &'a OrderStatus,
}

impl ApiClient {
    /// List every order (brand side).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get_json(&["orders"], &[]).await
    }

    /// List the orders placed by a user, in backend order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(user_id = %user_id, request_id = tracing::field::Empty))]
    pub async fn orders_by_user(&self, user_id: UserId) -> Result<Vec<Order>, ApiError> {
        self.get_json(&["orders"], &[("userId", user_id.to_string())])
            .await
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist, or an error
    /// if the API request fails.
    #[instrument(skip(self), fields(order_id = %id, request_id = tracing::field::Empty))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, ApiError> {
        self.get_json(&["orders", &id.to_string()], &[]).await
    }

    /// Create an order header.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, order), fields(user_id = %order.user_id, request_id = tracing::field::Empty))]
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.send_json(Method::POST, &["orders"], order).await
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %id, request_id = tracing::field::Empty))]
    pub async fn update_order_status(
        &self,
        id: OrderId,
        status: &OrderStatus,
    ) -> Result<Order, ApiError> {
        self.send_json(
            Method::PATCH,
            &["orders", &id.to_string()],
            &StatusPatch { status },
        )
        .await
    }

    /// List the items of an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_id = %order_id, request_id = tracing::field::Empty))]
    pub async fn order_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, ApiError> {
        self.get_json(&["orderItems"], &[("orderId", order_id.to_string())])
            .await
    }

    /// Create one order item.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, item), fields(order_id = %item.order_id, request_id = tracing::field::Empty))]
    pub async fn create_order_item(&self, item: &NewOrderItem) -> Result<OrderItem, ApiError> {
        self.send_json(Method::POST, &["orderItems"], item).await
    }
}
