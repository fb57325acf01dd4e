//! Catalog browsing and brand-side product edits.

use clap::Subcommand;

use threadline_core::{CategoryId, Price, ProductId, ProductTag};
use threadline_portal::Portal;
use threadline_portal::models::{Product, ProductPatch, filter_by_tag};
use threadline_portal::session::View;

use super::{CliError, Login};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List products
    List {
        /// Only products in this category
        #[arg(short, long)]
        category: Option<CategoryId>,

        /// Only products with this tag (`bestseller`, `new`, `trending`)
        #[arg(short, long)]
        tag: Option<ProductTag>,
    },
    /// Show one product
    Show { id: ProductId },
    /// List categories
    Categories,
    /// Change a product's price and/or stock (brand only)
    Patch {
        id: ProductId,

        /// New unit price in cents
        #[arg(long)]
        price_cents: Option<i64>,

        #[arg(long)]
        stock: Option<u32>,
    },
}

pub async fn run(portal: &Portal, login: &Login, action: CatalogAction) -> Result<(), CliError> {
    let locale = portal.config().locale;
    let api = portal.api();

    match action {
        CatalogAction::List { category, tag } => {
            let products = match category {
                Some(id) => api.products_by_category(id).await,
                None => api.list_products().await,
            }?;

            let shown: Vec<&Product> = match tag {
                Some(tag) => filter_by_tag(&products, tag),
                None => products.iter().collect(),
            };
            for product in shown {
                println!(
                    "#{:<4} {:<32} {:>10}  {}",
                    product.id,
                    product.display_name(locale),
                    product.price.to_string(),
                    if product.in_stock() { "in stock" } else { "sold out" }
                );
            }
        }
        CatalogAction::Show { id } => {
            let product = api.get_product(id).await?;
            println!("{} ({})", product.display_name(locale), product.price);
            println!("{}", product.display_description(locale));
            println!("stock: {}", product.stock);
        }
        CatalogAction::Categories => {
            let categories = api.list_categories().await?;
            for category in categories {
                println!("#{:<4} {}", category.id, category.display_name(locale));
            }
        }
        CatalogAction::Patch {
            id,
            price_cents,
            stock,
        } => {
            login.open(portal, View::BrandDashboard).await?;
            let patch = ProductPatch {
                price: price_cents.map(Price::from_cents),
                stock,
            };
            if patch.is_empty() {
                println!("Nothing to change");
                return Ok(());
            }
            let product = api.patch_product(id, &patch).await?;
            println!(
                "Updated #{}: {} ({} in stock)",
                product.id, product.price, product.stock
            );
        }
    }
    Ok(())
}
