//! Catalog records: products and categories.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use threadline_core::{CategoryId, Price, ProductId, ProductTag};

/// Display language for catalog text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Locale {
    #[default]
    En,
    Es,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// Picks the Spanish text when requested and present, else English.
fn localized<'a>(locale: Locale, en: &'a str, es: Option<&'a str>) -> &'a str {
    match (locale, es) {
        (Locale::Es, Some(es)) if !es.trim().is_empty() => es,
        _ => en,
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub name_es: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Category {
    /// Category name in the given locale.
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &str {
        localized(locale, &self.name, self.name_es.as_deref())
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub name_es: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_es: Option<String>,
    /// Unit price in cents.
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tag: Option<ProductTag>,
}

impl Product {
    /// Product name in the given locale.
    #[must_use]
    pub fn display_name(&self, locale: Locale) -> &str {
        localized(locale, &self.name, self.name_es.as_deref())
    }

    /// Product description in the given locale.
    #[must_use]
    pub fn display_description(&self, locale: Locale) -> &str {
        localized(locale, &self.description, self.description_es.as_deref())
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Products carrying `tag`, in their original order.
#[must_use]
pub fn filter_by_tag(products: &[Product], tag: ProductTag) -> Vec<&Product> {
    products.iter().filter(|p| p.tag == Some(tag)).collect()
}

/// Brand-side edit of a product, sent as `PATCH /products/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
}

impl ProductPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.price.is_none() && self.stock.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product_json() -> &'static str {
        r#"{
            "id": 3,
            "categoryId": 1,
            "name": "Linen Shirt",
            "nameEs": "Camisa de lino",
            "description": "Breathable linen",
            "price": 7500,
            "imageUrl": "/img/shirt.jpg",
            "stock": 12,
            "tag": "bestseller"
        }"#
    }

    #[test]
    fn test_product_deserializes_from_wire() {
        let product: Product = serde_json::from_str(product_json()).unwrap();
        assert_eq!(product.price, Price::from_cents(7_500));
        assert_eq!(product.tag, Some(ProductTag::Bestseller));
        assert!(product.description_es.is_none());
    }

    #[test]
    fn test_localized_text_falls_back_to_english() {
        let product: Product = serde_json::from_str(product_json()).unwrap();
        assert_eq!(product.display_name(Locale::Es), "Camisa de lino");
        assert_eq!(product.display_description(Locale::Es), "Breathable linen");
        assert_eq!(product.display_name(Locale::En), "Linen Shirt");
    }

    #[test]
    fn test_filter_by_tag() {
        let tagged: Product = serde_json::from_str(product_json()).unwrap();
        let plain = Product {
            id: ProductId::new(4),
            tag: None,
            ..tagged.clone()
        };
        let products = vec![plain, tagged];
        let bestsellers = filter_by_tag(&products, ProductTag::Bestseller);
        assert_eq!(bestsellers.len(), 1);
        assert!(filter_by_tag(&products, ProductTag::New).is_empty());
    }

    #[test]
    fn test_patch_skips_unset_fields() {
        let patch = ProductPatch {
            stock: Some(4),
            ..ProductPatch::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"stock":4}"#);
    }
}
