//! Shopping cart aggregate.
//!
//! Lines are keyed by product *and* selected size/color, so the same shirt in
//! M and L occupies two lines. Every mutation is written through to the local
//! store before it becomes visible; if the write fails the cart is left as it
//! was and the error is returned.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use threadline_core::{Price, ProductId};

use crate::error::add_breadcrumb;
use crate::models::Product;
use crate::store::{LocalStore, StoreError, keys};

/// Size and color picked on the product page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    pub size: Option<String>,
    pub color: Option<String>,
}

impl Selection {
    #[must_use]
    pub fn new(size: Option<&str>, color: Option<&str>) -> Self {
        let normalize = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        Self {
            size: normalize(size),
            color: normalize(color),
        }
    }
}

/// Identity of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub selection: Selection,
}

impl LineKey {
    #[must_use]
    pub const fn new(product_id: ProductId, selection: Selection) -> Self {
        Self {
            product_id,
            selection,
        }
    }
}

/// One cart line: a product snapshot plus quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    /// Unit price captured when the line was added.
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub selected_size: Option<String>,
    #[serde(default)]
    pub selected_color: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// A single unit of `product` with the given selection.
    #[must_use]
    pub fn from_product(product: &Product, selection: Selection) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            selected_size: selection.size,
            selected_color: selection.color,
            quantity: 1,
        }
    }

    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(
            self.product_id,
            Selection::new(
                self.selected_size.as_deref(),
                self.selected_color.as_deref(),
            ),
        )
    }

    /// Trim size and color the way [`Selection::new`] does, so a line built
    /// by hand lands on the same key as one built from a product.
    fn normalized(self) -> Self {
        let Selection { size, color } = self.key().selection;
        Self {
            selected_size: size,
            selected_color: color,
            ..self
        }
    }

    fn matches(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id
            && self.selected_size == key.selection.size
            && self.selected_color == key.selection.color
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }
}

/// Serialize cart lines to the stored JSON form.
///
/// # Errors
///
/// Returns an error only if serialization itself fails.
pub fn encode_lines(lines: &[CartItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(lines)
}

/// Parse stored cart lines, enforcing the cart invariants: lines with a
/// zero quantity are dropped and duplicate keys are merged.
///
/// # Errors
///
/// Returns an error if `raw` is not a JSON array of cart lines.
pub fn decode_lines(raw: &str) -> Result<Vec<CartItem>, serde_json::Error> {
    let parsed: Vec<CartItem> = serde_json::from_str(raw)?;
    let mut lines: Vec<CartItem> = Vec::with_capacity(parsed.len());
    for item in parsed.into_iter().filter(|item| item.quantity > 0) {
        let item = item.normalized();
        let key = item.key();
        match lines.iter_mut().find(|line| line.matches(&key)) {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => lines.push(item),
        }
    }
    Ok(lines)
}

/// Shared handle to the cart.
///
/// Clones observe the same lines. Each mutation takes the write lock, builds
/// the new line list, persists it, and only then swaps it in.
#[derive(Clone)]
pub struct Cart {
    inner: Arc<CartInner>,
}

struct CartInner {
    lines: RwLock<Vec<CartItem>>,
    store: Arc<dyn LocalStore>,
}

impl Cart {
    /// Load the cart from `store`.
    ///
    /// A missing value yields an empty cart. An unreadable or malformed value
    /// also yields an empty cart and is logged; it is overwritten by the next
    /// mutation.
    #[must_use]
    pub fn load(store: Arc<dyn LocalStore>) -> Self {
        let lines = match store.get(keys::CART) {
            Ok(Some(raw)) => decode_lines(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Stored cart is malformed, starting empty");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored cart, starting empty");
                Vec::new()
            }
        };

        Self {
            inner: Arc::new(CartInner {
                lines: RwLock::new(lines),
                store,
            }),
        }
    }

    /// Apply `change` to a copy of the lines, persist, then commit.
    fn mutate<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Vec<CartItem>),
    {
        let mut lines = self
            .inner
            .lines
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = lines.clone();
        change(&mut next);

        let encoded = encode_lines(&next).map_err(|e| StoreError::Io(e.into()))?;
        self.inner.store.set(keys::CART, &encoded)?;
        *lines = next;
        Ok(())
    }

    /// Add one unit of `product`. An existing line with the same key is
    /// incremented; otherwise a new line with quantity 1 is appended.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    pub fn add_to_cart(&self, product: &Product, selection: Selection) -> Result<(), StoreError> {
        self.add_item(CartItem::from_product(product, selection))
    }

    /// Add one unit described by a line snapshot. The snapshot's own
    /// quantity is ignored and its size and color are trimmed, blanks
    /// becoming `None`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    pub fn add_item(&self, item: CartItem) -> Result<(), StoreError> {
        let item = item.normalized();
        let product_id = item.product_id.to_string();
        self.mutate(|lines| {
            let key = item.key();
            match lines.iter_mut().find(|line| line.matches(&key)) {
                Some(line) => line.quantity = line.quantity.saturating_add(1),
                None => lines.push(CartItem { quantity: 1, ..item }),
            }
        })?;
        add_breadcrumb("cart", "Added item", Some(&[("product_id", &product_id)]));
        Ok(())
    }

    /// Set a line's quantity. Zero or negative removes the line; an absent
    /// key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    pub fn update_quantity(&self, key: &LineKey, quantity: i64) -> Result<(), StoreError> {
        self.mutate(|lines| {
            if quantity <= 0 {
                lines.retain(|line| !line.matches(key));
            } else if let Some(line) = lines.iter_mut().find(|line| line.matches(key)) {
                line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            }
        })
    }

    /// Remove a line. An absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    pub fn remove_from_cart(&self, key: &LineKey) -> Result<(), StoreError> {
        self.mutate(|lines| lines.retain(|line| !line.matches(key)))
    }

    /// Remove every line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the cart cannot be persisted; the cart is
    /// unchanged in that case.
    pub fn clear_cart(&self) -> Result<(), StoreError> {
        self.mutate(Vec::clear)?;
        add_breadcrumb("cart", "Cleared cart", None);
        Ok(())
    }

    /// A snapshot of the lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.inner
            .lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner
            .lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.inner
            .lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Sum of unit price times quantity across all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.inner
            .lines
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(CartItem::line_total)
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;

    use threadline_core::CategoryId;

    use super::*;
    use crate::store::MemoryStore;

    fn product(id: i64, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            category_id: CategoryId::new(1),
            name: format!("Product {id}"),
            name_es: None,
            description: String::new(),
            description_es: None,
            price: Price::from_cents(price),
            image_url: String::new(),
            stock: 10,
            tag: None,
        }
    }

    fn empty_cart() -> (Cart, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Cart::load(store.clone()), store)
    }

    fn key(id: i64) -> LineKey {
        LineKey::new(ProductId::new(id), Selection::default())
    }

    /// A store whose writes always fail.
    struct BrokenStore;

    impl LocalStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(io::Error::other("disk full")))
        }
        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[test]
    fn test_repeated_adds_keep_one_line() {
        let (cart, _) = empty_cart();
        let shirt = product(1, 7_500);
        for _ in 0..4 {
            cart.add_to_cart(&shirt, Selection::default()).unwrap();
        }
        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 4);
        assert_eq!(cart.count(), 4);
    }

    #[test]
    fn test_different_sizes_are_separate_lines() {
        let (cart, _) = empty_cart();
        let shirt = product(1, 7_500);
        cart.add_to_cart(&shirt, Selection::new(Some("M"), None))
            .unwrap();
        cart.add_to_cart(&shirt, Selection::new(Some("L"), None))
            .unwrap();
        cart.add_to_cart(&shirt, Selection::new(Some(" M "), None))
            .unwrap();
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.count(), 3);
    }

    #[test]
    fn test_add_item_trims_selection_like_add_to_cart() {
        let (cart, _) = empty_cart();
        let shirt = product(1, 7_500);
        cart.add_to_cart(&shirt, Selection::new(Some("M"), None))
            .unwrap();
        cart.add_item(CartItem {
            selected_size: Some(" M ".to_owned()),
            selected_color: Some("  ".to_owned()),
            ..CartItem::from_product(&shirt, Selection::default())
        })
        .unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        let line = items.first().unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.selected_size.as_deref(), Some("M"));
        assert_eq!(line.selected_color, None);
    }

    #[test]
    fn test_non_positive_quantity_removes_line() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(&product(1, 100), Selection::default())
            .unwrap();
        cart.add_to_cart(&product(2, 100), Selection::default())
            .unwrap();

        cart.update_quantity(&key(1), 0).unwrap();
        cart.update_quantity(&key(2), -3).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_update_quantity_replaces_value() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(&product(1, 100), Selection::default())
            .unwrap();
        cart.update_quantity(&key(1), 6).unwrap();
        assert_eq!(cart.count(), 6);
        // absent key is a no-op
        cart.update_quantity(&key(9), 2).unwrap();
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_total_multiplies_price_by_quantity() {
        let (cart, _) = empty_cart();
        let a = product(1, 7_500);
        let b = product(2, 12_800);
        cart.add_to_cart(&a, Selection::default()).unwrap();
        cart.add_to_cart(&b, Selection::default()).unwrap();
        cart.add_to_cart(&b, Selection::default()).unwrap();
        assert_eq!(cart.total(), Price::from_cents(33_100));
    }

    #[test]
    fn test_remove_and_clear() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(&product(1, 100), Selection::default())
            .unwrap();
        cart.add_to_cart(&product(2, 100), Selection::default())
            .unwrap();
        cart.remove_from_cart(&key(1)).unwrap();
        cart.remove_from_cart(&key(1)).unwrap();
        assert_eq!(cart.items().len(), 1);
        cart.clear_cart().unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (cart, store) = empty_cart();
        cart.add_to_cart(&product(1, 7_500), Selection::new(Some("S"), Some("navy")))
            .unwrap();

        let reloaded = Cart::load(store.clone());
        assert_eq!(reloaded.items(), cart.items());

        cart.clear_cart().unwrap();
        assert_eq!(store.get(keys::CART).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(&product(1, 7_500), Selection::new(Some("M"), Some("red")))
            .unwrap();
        cart.add_to_cart(&product(2, 12_800), Selection::default())
            .unwrap();
        cart.add_to_cart(&product(2, 12_800), Selection::default())
            .unwrap();

        let original = cart.items();
        let decoded = decode_lines(&encode_lines(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_malformed_blob_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::CART, "{not json").unwrap();
        let cart = Cart::load(store);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decode_drops_zero_lines_and_merges_duplicates() {
        let raw = r#"[
            {"id": 1, "name": "A", "price": 100, "quantity": 2},
            {"id": 1, "name": "A", "price": 100, "quantity": 3},
            {"id": 2, "name": "B", "price": 100, "quantity": 0}
        ]"#;
        let lines = decode_lines(raw).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_failed_persist_leaves_cart_unchanged() {
        let cart = Cart::load(Arc::new(BrokenStore));
        let result = cart.add_to_cart(&product(1, 100), Selection::default());
        assert!(result.is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_concurrent_adds_are_all_applied() {
        let (cart, _) = empty_cart();
        let shirt = product(1, 100);
        std::thread::scope(|scope| {
            for _ in 0..8 {
                let cart = cart.clone();
                let shirt = shirt.clone();
                scope.spawn(move || {
                    for _ in 0..25 {
                        cart.add_to_cart(&shirt, Selection::default()).unwrap();
                    }
                });
            }
        });
        assert_eq!(cart.count(), 200);
        assert_eq!(cart.items().len(), 1);
    }
}
