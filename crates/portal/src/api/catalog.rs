//! `/products` and `/categories`.

use reqwest::Method;
use tracing::{debug, instrument};

use threadline_core::{CategoryId, ProductId};

use super::cache::CacheValue;
use super::{ApiClient, ApiError};
use crate::models::{Category, Product, ProductPatch};

impl ApiClient {
    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List every product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products:all".to_string();
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self.get_json(&["products"], &[]).await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id, request_id = tracing::field::Empty))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.get_json(&["products", &id.to_string()], &[]).await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;
        Ok(product)
    }

    /// List the products in a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %category_id, request_id = tracing::field::Empty))]
    pub async fn products_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, ApiError> {
        let cache_key = format!("products:category={category_id}");
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .get_json(&["products"], &[("categoryId", category_id.to_string())])
            .await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Brand-side edit of price and/or stock.
    ///
    /// Drops every cached catalog entry so later reads see the new values.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, patch), fields(product_id = %id, request_id = tracing::field::Empty))]
    pub async fn patch_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let product: Product = self
            .send_json(Method::PATCH, &["products", &id.to_string()], patch)
            .await?;
        self.inner.cache.invalidate_all();
        Ok(product)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// List every category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(request_id = tracing::field::Empty))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let cache_key = "categories:all".to_string();
        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self.get_json(&["categories"], &[]).await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;
        Ok(categories)
    }

    /// Get a category by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the category does not exist, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id, request_id = tracing::field::Empty))]
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, ApiError> {
        let cache_key = format!("category:{id}");
        if let Some(CacheValue::Category(category)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(category);
        }

        let category: Category = self.get_json(&["categories", &id.to_string()], &[]).await?;
        self.inner
            .cache
            .insert(cache_key, CacheValue::Category(category.clone()))
            .await;
        Ok(category)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use threadline_core::Price;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::store::MemoryStore;

    fn test_client(uri: &str) -> ApiClient {
        ApiClient::new(Url::parse(uri).unwrap(), Arc::new(MemoryStore::new())).unwrap()
    }

    fn shirt(price: i64, stock: u32) -> serde_json::Value {
        json!({
            "id": 3,
            "categoryId": 1,
            "name": "Linen Shirt",
            "description": "Breathable linen",
            "price": price,
            "imageUrl": "/img/shirt.jpg",
            "stock": stock,
            "tag": "new"
        })
    }

    #[tokio::test]
    async fn test_get_product_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(shirt(7500, 4)))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let first = client.get_product(ProductId::new(3)).await.unwrap();
        let second = client.get_product(ProductId::new(3)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.price, Price::from_cents(7500));
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.get_product(ProductId::new(99)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref r) if r == "/products/99"), "got: {err}");
    }

    #[tokio::test]
    async fn test_products_by_category_uses_query_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products"))
            .and(query_param("categoryId", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([shirt(7500, 4)])))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let products = client.products_by_category(CategoryId::new(1)).await.unwrap();
        assert_eq!(products.len(), 1);
    }

    #[tokio::test]
    async fn test_patch_product_invalidates_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/products/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(shirt(7500, 4)))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/products/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(shirt(7500, 0)))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        client.get_product(ProductId::new(3)).await.unwrap();
        let patch = ProductPatch {
            stock: Some(0),
            ..ProductPatch::default()
        };
        let updated = client.patch_product(ProductId::new(3), &patch).await.unwrap();
        assert!(!updated.in_stock());
        // cache was dropped, so this reaches the server again
        client.get_product(ProductId::new(3)).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.list_categories().await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
