//! Integration tests for the Threadline portal.
//!
//! Each test stands up a `wiremock` server playing the REST backend and
//! drives a real [`Portal`] against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p threadline-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_flow` - catalog, cart persistence and checkout
//! - `quote_inquiries` - submit, list, filter, paginate, stale fetches
//! - `auth_session` - password login, bearer token, role gating

use std::sync::Arc;

use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

use threadline_portal::Portal;
use threadline_portal::config::PortalConfig;
use threadline_portal::store::{LocalStore, MemoryStore};

/// A portal wired to a fresh mock backend.
pub struct TestContext {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub portal: Portal,
}

impl TestContext {
    /// Start a mock backend and a portal with an in-memory store.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI cannot be parsed or the portal fails to
    /// build.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::new());
        let portal = portal_for(&server, store.clone());
        Self {
            server,
            store,
            portal,
        }
    }

    /// A second portal sharing this context's store, as after a restart.
    ///
    /// # Panics
    ///
    /// Panics if the portal fails to build.
    #[must_use]
    pub fn restart(&self) -> Portal {
        portal_for(&self.server, self.store.clone())
    }
}

fn portal_for(server: &MockServer, store: Arc<dyn LocalStore>) -> Portal {
    let url = Url::parse(&server.uri()).expect("mock server URI");
    let mut config = PortalConfig::with_api_url(url);
    config.page_size = 5;
    Portal::with_store(config, store).expect("portal")
}

/// A product record in wire form.
#[must_use]
pub fn product_json(id: i64, name: &str, price_cents: i64, stock: u32) -> Value {
    json!({
        "id": id,
        "categoryId": 1,
        "name": name,
        "nameEs": format!("{name} (es)"),
        "description": format!("{name} description"),
        "price": price_cents,
        "imageUrl": format!("/img/{id}.jpg"),
        "stock": stock
    })
}

/// An inquiry record in wire form, created on day `day` of October 2026.
#[must_use]
pub fn inquiry_json(id: i64, user_id: i64, status: &str, day: u32) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "description": format!("Inquiry {id}"),
        "quantity": 100,
        "deadline": "2026-12-15",
        "fabrics": "cotton",
        "status": status,
        "createdAt": format!("2026-10-{day:02}T09:00:00Z")
    })
}
