//! Subcommand implementations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod inquiry;
pub mod orders;
pub mod token;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use threadline_core::Role;
use threadline_portal::api::ApiError;
use threadline_portal::session::{Gate, Identity, View};
use threadline_portal::store::StoreError;
use threadline_portal::{Portal, PortalError};

pub use account::AccountAction;
pub use cart::CartAction;
pub use catalog::CatalogAction;
pub use inquiry::InquiryAction;
pub use orders::OrdersAction;
pub use token::TokenAction;

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Portal(#[from] PortalError),

    /// `--email` was given without `THREADLINE_PASSWORD`.
    #[error("THREADLINE_PASSWORD must be set when using --email")]
    MissingPassword,

    /// The command needs a session; pass `--as` or `--email`.
    #[error("this command needs --as <role> or --email <address>")]
    NoSession,

    /// Logged in with a role that cannot run this command.
    #[error("this command is only available to {0} accounts")]
    WrongRole(Role),
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        Self::Portal(e.into())
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::Portal(e.into())
    }
}

impl CliError {
    /// Message for the terminal. Portal errors go through their user-safe
    /// rendering and are reported to Sentry when they are unexpected.
    pub fn user_message(self) -> String {
        match self {
            Self::Portal(e) => e.report().user_message(),
            other => other.to_string(),
        }
    }
}

/// How the session for this invocation is established.
pub struct Login {
    pub role: Option<Role>,
    pub email: Option<String>,
}

impl Login {
    /// Start a session from the command-line flags.
    pub async fn establish(&self, portal: &Portal) -> Result<Identity, CliError> {
        if let Some(email) = &self.email {
            let password = std::env::var("THREADLINE_PASSWORD")
                .ok()
                .filter(|p| !p.is_empty())
                .map(SecretString::from)
                .ok_or(CliError::MissingPassword)?;
            return Ok(portal.login(email, password.expose_secret()).await?);
        }
        match self.role {
            Some(role) => Ok(portal.session().login_as(role)),
            None => Err(CliError::NoSession),
        }
    }

    /// Start a session and check it may open `view`.
    pub async fn open(&self, portal: &Portal, view: View) -> Result<Identity, CliError> {
        self.establish(portal).await?;
        match portal.session().gate(view) {
            Gate::Allowed(Some(identity)) => Ok(identity),
            Gate::Allowed(None) | Gate::RedirectToLogin => Err(CliError::NoSession),
            Gate::Redirect(_) => Err(CliError::WrongRole(match view {
                View::BrandDashboard => Role::Brand,
                _ => Role::Customer,
            })),
        }
    }
}
