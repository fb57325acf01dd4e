//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `THREADLINE_API_URL` - REST backend base URL (default: `http://localhost:3001`)
//! - `THREADLINE_STATE_DIR` - Directory for the local store (default: `.threadline`)
//! - `THREADLINE_PAGE_SIZE` - Inquiry board page size (default: 5)
//! - `THREADLINE_LOCALE` - Catalog language, `en` or `es` (default: `en`)
//! - `THREADLINE_RECOMMENDER_URL` - AI recommendation endpoint
//! - `THREADLINE_RECOMMENDER_KEY` - API key for the recommendation endpoint
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use crate::models::Locale;

const DEFAULT_API_URL: &str = "http://localhost:3001";
const DEFAULT_STATE_DIR: &str = ".threadline";
const DEFAULT_PAGE_SIZE: &str = "5";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Portal configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// REST backend base URL
    pub api_url: Url,
    /// Directory holding the local store files
    pub state_dir: PathBuf,
    /// Page size for inquiry lists
    pub page_size: usize,
    /// Display language for catalog text
    pub locale: Locale,
    /// Recommendation service, if configured
    pub recommender: Option<RecommenderConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// AI recommendation endpoint configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct RecommenderConfig {
    /// Endpoint receiving suggestion requests
    pub url: Url,
    /// Bearer key for the endpoint
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for RecommenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommenderConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if the
    /// recommender key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_url(
            "THREADLINE_API_URL",
            &get_env_or_default("THREADLINE_API_URL", DEFAULT_API_URL),
        )?;
        let state_dir = PathBuf::from(get_env_or_default("THREADLINE_STATE_DIR", DEFAULT_STATE_DIR));
        let page_size = parse_page_size(&get_env_or_default("THREADLINE_PAGE_SIZE", DEFAULT_PAGE_SIZE))?;
        let locale = get_env_or_default("THREADLINE_LOCALE", "en")
            .parse::<Locale>()
            .map_err(|e| ConfigError::InvalidEnvVar("THREADLINE_LOCALE".to_string(), e))?;
        let recommender = RecommenderConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            api_url,
            state_dir,
            page_size,
            locale,
            recommender,
            sentry_dsn,
        })
    }

    /// Configuration pointing at `api_url` with every other setting at its
    /// default. Used by tests and embedders that do not read the environment.
    #[must_use]
    pub fn with_api_url(api_url: Url) -> Self {
        Self {
            api_url,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            page_size: 5,
            locale: Locale::En,
            recommender: None,
            sentry_dsn: None,
        }
    }
}

impl RecommenderConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(raw_url) = get_optional_env("THREADLINE_RECOMMENDER_URL") else {
            return Ok(None);
        };
        let url = parse_url("THREADLINE_RECOMMENDER_URL", &raw_url)?;
        let api_key = match get_optional_env("THREADLINE_RECOMMENDER_KEY") {
            Some(key) => {
                validate_secret_strength(&key, "THREADLINE_RECOMMENDER_KEY")?;
                Some(SecretString::from(key))
            }
            None => None,
        };
        Ok(Some(Self { url, api_key }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_url(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

fn parse_page_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        Ok(_) => Err(ConfigError::InvalidEnvVar(
            "THREADLINE_PAGE_SIZE".to_string(),
            "must be at least 1".to_string(),
        )),
        Err(e) => Err(ConfigError::InvalidEnvVar(
            "THREADLINE_PAGE_SIZE".to_string(),
            e.to_string(),
        )),
    }
}

/// Reject secrets that are obviously placeholders.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_rejects_non_http() {
        assert!(parse_url("X", "ftp://files.local").is_err());
        assert!(parse_url("X", "not a url").is_err());
        assert!(parse_url("X", "https://api.threadline.dev").is_ok());
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("5").unwrap(), 5);
        assert_eq!(parse_page_size(" 12 ").unwrap(), 12);
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("many").is_err());
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
        assert!(validate_secret_strength("sk_live_4f9Qz81", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_recommender_config_debug_redacts_key() {
        let config = RecommenderConfig {
            url: Url::parse("https://ai.threadline.dev/suggest").unwrap(),
            api_key: Some(SecretString::from("super_secret_key")),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("ai.threadline.dev"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
    }

    #[test]
    fn test_with_api_url_defaults() {
        let config = PortalConfig::with_api_url(Url::parse("http://127.0.0.1:4000").unwrap());
        assert_eq!(config.page_size, 5);
        assert_eq!(config.locale, Locale::En);
        assert!(config.recommender.is_none());
    }
}
