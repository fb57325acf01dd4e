//! REST resource client.
//!
//! # Architecture
//!
//! - One [`ApiClient`] per application root, cheap to clone (`Arc` inner)
//! - The backend is the source of truth; this layer is a typed pass-through
//! - Products and categories are cached in memory via `moka` (5 minute TTL)
//! - `Authorization: Bearer <token>` is attached iff the local store holds a
//!   non-empty token
//!
//! Resource methods live in per-collection modules:
//!
//! | Module | Collection |
//! |---|---|
//! | `users` | `/users` |
//! | `catalog` | `/products`, `/categories` |
//! | `orders` | `/orders`, `/orderItems` |
//! | `inquiries` | `/serviceInquiries` |
//! | `profiles` | `/profiles`, `/notificationPreferences` |

mod cache;
mod catalog;
mod inquiries;
mod orders;
mod profiles;
mod users;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::Span;
use url::Url;
use uuid::Uuid;

use crate::store::{LocalStore, StoreError, keys};

use cache::CacheValue;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Errors that can occur when talking to the REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 404 for a resource.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend answered with a non-success status.
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry a path.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::NotFound(_) | Self::Parse(_) | Self::InvalidUrl(_) => false,
        }
    }
}

/// Typed client over the backend's REST collections.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    store: Arc<dyn LocalStore>,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a client for `base_url`, reading the bearer token from `store`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `base_url` cannot carry a path
    /// (e.g. `mailto:`), or `ApiError::Http` if the HTTP client fails to build.
    pub fn new(base_url: Url, store: Arc<dyn LocalStore>) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                store,
                cache,
            }),
        })
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Token Management
    // =========================================================================

    /// Persist a bearer token for subsequent requests.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the local store cannot be written.
    pub fn set_token(&self, token: &SecretString) -> Result<(), StoreError> {
        self.inner
            .store
            .set(keys::AUTH_TOKEN, token.expose_secret())
    }

    /// Forget the bearer token.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the local store cannot be written.
    pub fn clear_token(&self) -> Result<(), StoreError> {
        self.inner.store.remove(keys::AUTH_TOKEN)
    }

    /// The stored token, if any. Blank tokens count as absent so the header
    /// is never sent empty.
    fn token(&self) -> Option<SecretString> {
        match self.inner.store.get(keys::AUTH_TOKEN) {
            Ok(Some(token)) if !token.trim().is_empty() => Some(SecretString::from(token)),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read auth token, sending request without it");
                None
            }
        }
    }

    // =========================================================================
    // Request Plumbing
    // =========================================================================

    /// Build `{base}/{segments...}?{query}` with proper percent-encoding.
    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let builder = self
            .inner
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id)
            .header("Accept", "application/json");

        match self.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and return the body text of a successful response.
    async fn send(&self, builder: RequestBuilder, resource: &str) -> Result<String, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!(error = %e, resource, "Request to backend failed");
            ApiError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                resource,
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: &str, resource: &str) -> Result<T, ApiError> {
        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                resource,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.url(segments, query)?;
        let resource = url.path().to_string();
        let body = self.send(self.request(Method::GET, url), &resource).await?;
        Self::decode(&body, &resource)
    }

    pub(crate) async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        payload: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(segments, &[])?;
        let resource = url.path().to_string();
        let builder = self.request(method, url).json(payload);
        let body = self.send(builder, &resource).await?;
        Self::decode(&body, &resource)
    }

    pub(crate) async fn delete_resource(&self, segments: &[&str]) -> Result<(), ApiError> {
        let url = self.url(segments, &[])?;
        let resource = url.path().to_string();
        self.send(self.request(Method::DELETE, url), &resource)
            .await
            .map(drop)
    }
}
