//! Cart editing. Works without a session; the cart persists between runs.

use clap::{Args, Subcommand};

use threadline_core::ProductId;
use threadline_portal::Portal;
use threadline_portal::cart::{LineKey, Selection};

use super::CliError;

/// Which line of the cart a command targets.
#[derive(Args)]
pub struct LineArgs {
    product_id: ProductId,

    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    color: Option<String>,
}

impl LineArgs {
    fn selection(&self) -> Selection {
        Selection::new(self.size.as_deref(), self.color.as_deref())
    }

    fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.selection())
    }
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Add one unit of a product
    Add(LineArgs),
    /// Set a line's quantity; 0 or less removes it
    Update {
        #[command(flatten)]
        line: LineArgs,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove(LineArgs),
    /// Empty the cart
    Clear,
    /// Print the cart
    Show,
}

pub async fn run(portal: &Portal, action: CartAction) -> Result<(), CliError> {
    let cart = portal.cart();

    match action {
        CartAction::Add(line) => {
            let product = portal.api().get_product(line.product_id).await?;
            if !product.in_stock() {
                println!("{} is sold out", product.name);
                return Ok(());
            }
            cart.add_to_cart(&product, line.selection())?;
        }
        CartAction::Update { line, quantity } => {
            cart.update_quantity(&line.key(), quantity)?;
        }
        CartAction::Remove(line) => {
            cart.remove_from_cart(&line.key())?;
        }
        CartAction::Clear => {
            cart.clear_cart()?;
        }
        CartAction::Show => {}
    }

    let items = cart.items();
    if items.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }
    for item in &items {
        let variant = [item.selected_size.as_deref(), item.selected_color.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("/");
        println!(
            "#{:<4} {:<28} {:<10} {:>3} x {:>9} = {:>10}",
            item.product_id,
            item.name,
            variant,
            item.quantity,
            item.price.to_string(),
            item.line_total().to_string()
        );
    }
    println!("{} item(s), total {}", cart.count(), cart.total());
    Ok(())
}
