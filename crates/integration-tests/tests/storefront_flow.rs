//! Catalog → cart → checkout against a mock backend.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use threadline_core::{Price, ProductId, Role};
use threadline_integration_tests::{TestContext, product_json};
use threadline_portal::cart::{LineKey, Selection};
use threadline_portal::config::PortalConfig;
use threadline_portal::{ErrorKind, Portal, PortalError};

async fn mount_products(ctx: &TestContext) {
    for (id, name, price) in [(1, "Linen Shirt", 7_500), (2, "Denim Jacket", 12_800)] {
        Mock::given(method("GET"))
            .and(path(format!("/products/{id}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(product_json(id, name, price, 10)),
            )
            .mount(&ctx.server)
            .await;
    }
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let ctx = TestContext::new().await;
    mount_products(&ctx).await;

    let shirt = ctx
        .portal
        .api()
        .get_product(ProductId::new(1))
        .await
        .expect("product");
    ctx.portal
        .cart()
        .add_to_cart(&shirt, Selection::new(Some("M"), Some("white")))
        .expect("add");
    ctx.portal
        .cart()
        .add_to_cart(&shirt, Selection::new(Some("M"), Some("white")))
        .expect("add");

    let restarted = ctx.restart();
    assert_eq!(restarted.cart().items(), ctx.portal.cart().items());
    assert_eq!(restarted.cart().count(), 2);
}

#[tokio::test]
async fn test_file_store_persists_between_portals() {
    let ctx = TestContext::new().await;
    mount_products(&ctx).await;
    let dir = tempfile::tempdir().expect("tempdir");

    let config = || {
        let mut config =
            PortalConfig::with_api_url(Url::parse(&ctx.server.uri()).expect("uri"));
        config.state_dir = dir.path().join("state");
        config
    };

    let first = Portal::new(config()).expect("portal");
    let jacket = first
        .api()
        .get_product(ProductId::new(2))
        .await
        .expect("product");
    first
        .cart()
        .add_to_cart(&jacket, Selection::default())
        .expect("add");

    let second = Portal::new(config()).expect("portal");
    assert_eq!(second.cart().total(), Price::from_cents(12_800));
}

#[tokio::test]
async fn test_checkout_places_order_and_empties_cart() {
    let ctx = TestContext::new().await;
    mount_products(&ctx).await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({"userId": 1, "status": "pending", "total": 33100})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 90, "userId": 1, "orderDate": "2026-10-17T10:00:00Z",
            "status": "pending", "total": 33100
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/orderItems"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 1, "orderId": 90, "productId": 1, "quantity": 1, "priceAtPurchase": 7500
        })))
        .expect(2)
        .mount(&ctx.server)
        .await;

    let api = ctx.portal.api();
    let cart = ctx.portal.cart();
    let shirt = api.get_product(ProductId::new(1)).await.expect("shirt");
    let jacket = api.get_product(ProductId::new(2)).await.expect("jacket");
    cart.add_to_cart(&shirt, Selection::default()).expect("add");
    cart.add_to_cart(&jacket, Selection::default()).expect("add");
    cart.add_to_cart(&jacket, Selection::default()).expect("add");
    assert_eq!(cart.total(), Price::from_cents(33_100));

    ctx.portal.session().login_as(Role::Customer);
    let placed = ctx.portal.checkout().await.expect("checkout");
    assert_eq!(placed.order.total, Price::from_cents(33_100));
    assert!(ctx.portal.cart().is_empty());
    assert_eq!(ctx.restart().cart().count(), 0);
}

#[tokio::test]
async fn test_checkout_without_session_keeps_cart() {
    let ctx = TestContext::new().await;
    mount_products(&ctx).await;

    let shirt = ctx
        .portal
        .api()
        .get_product(ProductId::new(1))
        .await
        .expect("product");
    ctx.portal
        .cart()
        .add_to_cart(&shirt, Selection::default())
        .expect("add");

    let err = ctx.portal.checkout().await.expect_err("no session");
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(ctx.portal.cart().count(), 1);
}

#[tokio::test]
async fn test_missing_product_is_not_found_state() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/products/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ctx.server)
        .await;

    let err: PortalError = ctx
        .portal
        .api()
        .get_product(ProductId::new(404))
        .await
        .expect_err("missing")
        .into();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.user_message(), "Not found");
}

#[tokio::test]
async fn test_update_to_zero_removes_line() {
    let ctx = TestContext::new().await;
    mount_products(&ctx).await;
    let shirt = ctx
        .portal
        .api()
        .get_product(ProductId::new(1))
        .await
        .expect("product");
    let cart = ctx.portal.cart();
    let selection = Selection::new(Some("L"), None);
    cart.add_to_cart(&shirt, selection.clone()).expect("add");

    cart.update_quantity(&LineKey::new(ProductId::new(1), selection), 0)
        .expect("update");
    assert!(cart.is_empty());
}
