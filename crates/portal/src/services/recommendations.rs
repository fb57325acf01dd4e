//! Fabric and production suggestions for a quote request.
//!
//! The recommender is an external JSON endpoint. Its payload is treated as
//! opaque; only `summary` and `fabrics` are lifted out when present.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::RecommenderConfig;

/// Errors from the recommendation service.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("recommender returned {status}")]
    Status { status: u16 },

    #[error("invalid recommender response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionRequest<'a> {
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fabrics: Option<&'a str>,
}

/// A recommender answer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Suggestion {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub fabrics: Vec<String>,
    /// Everything else the recommender sent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Client for the recommendation endpoint.
#[derive(Clone)]
pub struct RecommendationClient {
    client: reqwest::Client,
    config: RecommenderConfig,
}

impl RecommendationClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: RecommenderConfig) -> Result<Self, RecommendationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self { client, config })
    }

    /// Ask for suggestions on an inquiry in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the recommender answers with a
    /// non-success status, or the body is not a JSON object.
    #[instrument(skip_all)]
    pub async fn suggest(
        &self,
        description: &str,
        quantity: Option<u32>,
        fabrics: Option<&str>,
    ) -> Result<Suggestion, RecommendationError> {
        let mut request = self
            .client
            .post(self.config.url.clone())
            .json(&SuggestionRequest {
                description,
                quantity,
                fabrics,
            });
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Recommender returned non-success status");
            return Err(RecommendationError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
