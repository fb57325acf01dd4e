//! Application root shared by every view.
//!
//! Owns the configuration, the resource client, the session and the cart,
//! and hands out services bound to them. Front ends build one [`Portal`] at
//! startup and pass clones around instead of reaching for globals.

use std::sync::Arc;

use secrecy::SecretString;

use crate::api::ApiClient;
use crate::cart::Cart;
use crate::config::PortalConfig;
use crate::error::{PortalError, Result};
use crate::inquiries::{InquiryService, SharedInquiryBoard};
use crate::services::{
    AccountService, Authenticator, OrderService, PlacedOrder, RecommendationClient,
};
use crate::session::{Identity, Session};
use crate::store::{FileStore, LocalStore};

/// Portal state shared across all views.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Portal {
    inner: Arc<PortalInner>,
}

struct PortalInner {
    config: PortalConfig,
    api: ApiClient,
    session: Session,
    cart: Cart,
    recommender: Option<RecommendationClient>,
}

impl Portal {
    /// Build a portal backed by files under `config.state_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created or the
    /// HTTP clients fail to build.
    pub fn new(config: PortalConfig) -> Result<Self> {
        let store = FileStore::open(&config.state_dir)?;
        Self::with_store(config, Arc::new(store))
    }

    /// Build a portal over an explicit local store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP clients fail to build.
    pub fn with_store(config: PortalConfig, store: Arc<dyn LocalStore>) -> Result<Self> {
        let api = ApiClient::new(config.api_url.clone(), Arc::clone(&store))?;
        let cart = Cart::load(store);
        let recommender = config
            .recommender
            .clone()
            .map(RecommendationClient::new)
            .transpose()?;

        tracing::debug!(
            api_url = %config.api_url,
            recommender = recommender.is_some(),
            "Portal initialized"
        );

        Ok(Self {
            inner: Arc::new(PortalInner {
                config,
                api,
                session: Session::new(),
                cart,
                recommender,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.inner.cart
    }

    /// The recommendation client, when one is configured.
    #[must_use]
    pub fn recommender(&self) -> Option<&RecommendationClient> {
        self.inner.recommender.as_ref()
    }

    #[must_use]
    pub fn inquiries(&self) -> InquiryService {
        InquiryService::new(self.inner.api.clone())
    }

    #[must_use]
    pub fn orders(&self) -> OrderService {
        OrderService::new(self.inner.api.clone())
    }

    #[must_use]
    pub fn account(&self) -> AccountService {
        AccountService::new(self.inner.api.clone())
    }

    #[must_use]
    pub fn auth(&self) -> Authenticator {
        Authenticator::new(self.inner.api.clone())
    }

    /// A fresh inquiry board using the configured page size.
    #[must_use]
    pub fn new_inquiry_board(&self) -> SharedInquiryBoard {
        SharedInquiryBoard::new(self.inner.config.page_size)
    }

    /// Verify credentials and start a session.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Auth` if the credentials are rejected or the
    /// lookup fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity> {
        let identity = self.auth().login(email, password).await?;
        self.inner.session.login(identity.clone());
        Ok(identity)
    }

    /// End the session and forget the bearer token. The cart is kept.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Store` if the token cannot be removed.
    pub fn logout(&self) -> Result<()> {
        self.inner.session.logout();
        self.inner.api.clear_token()?;
        Ok(())
    }

    /// Store a bearer token for subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Store` if the token cannot be written.
    pub fn set_token(&self, token: &SecretString) -> Result<()> {
        Ok(self.inner.api.set_token(token)?)
    }

    /// Check out the cart as the current user.
    ///
    /// # Errors
    ///
    /// Returns `PortalError::Unauthorized` when nobody is logged in, and
    /// otherwise whatever [`OrderService::checkout`] returns.
    pub async fn checkout(&self) -> Result<PlacedOrder> {
        let identity = self
            .inner
            .session
            .current()
            .ok_or_else(|| PortalError::Unauthorized("checkout requires a session".into()))?;
        self.orders()
            .checkout(&self.inner.cart, identity.user_id, chrono::Utc::now())
            .await
    }
}
