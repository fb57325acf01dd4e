//! Unified error handling with Sentry integration.
//!
//! Every portal operation returns `Result<T, PortalError>`. Front ends use
//! [`PortalError::kind`] to pick a presentation (field errors, retry banner,
//! "not found" state, login redirect) and [`PortalError::user_message`] for
//! copy that never leaks internal details.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::inquiries::ValidationErrors;
use crate::services::auth::AuthError;
use crate::services::recommendations::RecommendationError;
use crate::store::StoreError;

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum PortalError {
    /// Form input rejected before any network call.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// REST backend call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Local store read/write failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Recommendation service failed.
    #[error("Recommendation error: {0}")]
    Recommendation(#[from] RecommendationError),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// No identity for an operation that needs one.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// How a front end should present an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Field-scoped; block submission only.
    Validation,
    /// Transport or backend failure; offer a retry.
    Network,
    /// Render an explicit "not found" state with a way back.
    NotFound,
    /// Send the user to the login view.
    Unauthorized,
    /// Anything else; generic message.
    Internal,
}

impl PortalError {
    /// Classify this error for presentation.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::EmptyCart => ErrorKind::Validation,
            Self::Api(ApiError::NotFound(_)) => ErrorKind::NotFound,
            Self::Api(_) | Self::Recommendation(_) => ErrorKind::Network,
            Self::Auth(AuthError::Api(ApiError::Http(_) | ApiError::Status { .. })) => {
                ErrorKind::Network
            }
            Self::Auth(AuthError::InvalidCredentials | AuthError::InvalidEmail(_))
            | Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Auth(AuthError::UserAlreadyExists | AuthError::WeakPassword(_)) => {
                ErrorKind::Validation
            }
            Self::Auth(_) | Self::Store(_) | Self::Config(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show to an end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(errors) => errors.to_string(),
            Self::EmptyCart => "Your cart is empty".to_string(),
            Self::Api(ApiError::NotFound(_)) => "Not found".to_string(),
            Self::Auth(AuthError::UserAlreadyExists) => {
                "An account with this email already exists".to_string()
            }
            Self::Auth(AuthError::WeakPassword(msg)) => msg.clone(),
            Self::Auth(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
                "Invalid credentials".to_string()
            }
            Self::Unauthorized(_) => "Please log in to continue".to_string(),
            _ => match self.kind() {
                ErrorKind::Network => {
                    "We couldn't reach the server. Please try again.".to_string()
                }
                _ => "Something went wrong".to_string(),
            },
        }
    }

    /// Log the error and capture network/internal failures to Sentry.
    ///
    /// Returns the same error so call sites can write `.map_err(PortalError::report)`.
    #[must_use]
    pub fn report(self) -> Self {
        if matches!(self.kind(), ErrorKind::Network | ErrorKind::Internal) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Portal error"
            );
        } else {
            tracing::debug!(error = %self, "Portal error");
        }
        self
    }
}

/// Result type alias for `PortalError`.
pub type Result<T> = std::result::Result<T, PortalError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after login to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inquiries::{Field, FieldError};

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            PortalError::Api(ApiError::NotFound("/products/1".to_string())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            PortalError::Api(ApiError::Status {
                status: 500,
                body: String::new()
            })
            .kind(),
            ErrorKind::Network
        );
        assert_eq!(PortalError::EmptyCart.kind(), ErrorKind::Validation);
        assert_eq!(
            PortalError::Auth(AuthError::InvalidCredentials).kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            PortalError::Unauthorized("no session".to_string()).kind(),
            ErrorKind::Unauthorized
        );
    }

    #[test]
    fn test_user_message_hides_internals() {
        let err = PortalError::Api(ApiError::Status {
            status: 500,
            body: "stack trace: db at 10.0.0.3".to_string(),
        });
        let message = err.user_message();
        assert!(!message.contains("10.0.0.3"));
        assert!(message.contains("try again"));
    }

    #[test]
    fn test_validation_message_names_fields() {
        let err = PortalError::Validation(ValidationErrors::from(vec![FieldError::new(
            Field::Quantity,
            "must be a positive whole number",
        )]));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.user_message().contains("quantity"));
    }
}
