//! Checkout and order history.

use clap::Subcommand;

use threadline_core::{OrderId, OrderStatus};
use threadline_portal::Portal;
use threadline_portal::session::View;

use super::{CliError, Login};

#[derive(Subcommand)]
pub enum OrdersAction {
    /// Place an order for everything in the cart
    Checkout,
    /// List your orders, newest first
    List,
    /// Show an order and its items
    Show { id: OrderId },
    /// Change an order's status (brand only)
    Status { id: OrderId, status: String },
}

pub async fn run(portal: &Portal, login: &Login, action: OrdersAction) -> Result<(), CliError> {
    let orders = portal.orders();

    match action {
        OrdersAction::Checkout => {
            login.open(portal, View::CustomerDashboard).await?;
            let placed = portal.checkout().await?;
            println!(
                "Order #{} placed: {} item line(s), total {}",
                placed.order.id,
                placed.items.len(),
                placed.order.total
            );
        }
        OrdersAction::List => {
            let identity = login.open(portal, View::CustomerDashboard).await?;
            for order in orders.list_by_user(identity.user_id).await? {
                println!(
                    "#{:<5} {}  {:<10} {:>10}",
                    order.id,
                    order.order_date.format("%Y-%m-%d"),
                    order.status.as_str(),
                    order.total.to_string()
                );
            }
        }
        OrdersAction::Show { id } => {
            login.establish(portal).await?;
            let placed = orders.get(id).await?;
            println!(
                "Order #{} ({}) on {}",
                placed.order.id,
                placed.order.status,
                placed.order.order_date.format("%Y-%m-%d %H:%M")
            );
            for item in &placed.items {
                println!(
                    "  product #{:<5} {:>3} x {:>9} = {:>10}",
                    item.product_id,
                    item.quantity,
                    item.price_at_purchase.to_string(),
                    item.line_total().to_string()
                );
            }
            println!("Total {}", placed.order.total);
        }
        OrdersAction::Status { id, status } => {
            login.open(portal, View::BrandDashboard).await?;
            let order = orders.update_status(id, &OrderStatus::from(status)).await?;
            println!("Order #{} is now {}", order.id, order.status);
        }
    }
    Ok(())
}
