//! Cache types for catalog responses.

use crate::models::{Category, Product};

/// Cached value types, keyed by strings such as `product:3` or
/// `products:category=2`.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Category(Category),
    Categories(Vec<Category>),
}
