//! Session state: who is acting, and which views they may open.
//!
//! The session is held in memory only and is lost when the process ends.
//! The role it carries is a UI hint for choosing which views to offer; the
//! backend is the enforcement point.

use std::sync::{Arc, PoisonError, RwLock};

use threadline_core::{Email, Role, UserId};

use crate::error::{clear_sentry_user, set_sentry_user};

/// User id assumed by the synthetic customer identity.
pub const DEMO_CUSTOMER_ID: UserId = UserId::new(1);

/// User id assumed by the synthetic brand identity.
pub const DEMO_BRAND_ID: UserId = UserId::new(2);

/// How an identity was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Chosen directly via [`Session::login_as`]; nothing was verified.
    Synthetic,
    /// Returned after credential verification.
    Verified,
}

/// The acting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub name: String,
    pub email: Option<Email>,
    pub role: Role,
    pub source: IdentitySource,
}

impl Identity {
    /// A placeholder identity for the given role.
    #[must_use]
    pub fn synthetic(role: Role) -> Self {
        let (user_id, name) = match role {
            Role::Customer => (DEMO_CUSTOMER_ID, "Demo Customer"),
            Role::Brand => (DEMO_BRAND_ID, "Demo Brand"),
        };
        Self {
            user_id,
            name: name.to_string(),
            email: None,
            role,
            source: IdentitySource::Synthetic,
        }
    }
}

/// Portal views that may be restricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Catalog,
    Product,
    Cart,
    Login,
    /// Submit a new quote inquiry.
    QuoteRequest,
    CustomerDashboard,
    BrandDashboard,
}

impl View {
    /// Role needed to open the view: `None` for public views,
    /// `Some(None)` for any logged-in user.
    #[must_use]
    pub const fn requirement(self) -> Option<Option<Role>> {
        match self {
            Self::Catalog | Self::Product | Self::Cart | Self::Login => None,
            Self::QuoteRequest => Some(None),
            Self::CustomerDashboard => Some(Some(Role::Customer)),
            Self::BrandDashboard => Some(Some(Role::Brand)),
        }
    }

    /// The dashboard belonging to a role.
    #[must_use]
    pub const fn home_for(role: Role) -> Self {
        match role {
            Role::Customer => Self::CustomerDashboard,
            Role::Brand => Self::BrandDashboard,
        }
    }
}

/// Outcome of asking to open a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Open the view. Carries the identity when one is set.
    Allowed(Option<Identity>),
    /// Nobody is logged in; show the login view instead.
    RedirectToLogin,
    /// Logged in with a different role; send them to their own dashboard.
    Redirect(View),
}

/// Shared handle to the current session.
///
/// Clones observe the same state. Reads never block each other; a login or
/// logout replaces the identity in one step.
#[derive(Debug, Clone, Default)]
pub struct Session {
    current: Arc<RwLock<Option<Identity>>>,
}

impl Session {
    /// A session with nobody logged in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Act as a synthetic user with `role`, without any credential check.
    pub fn login_as(&self, role: Role) -> Identity {
        let identity = Identity::synthetic(role);
        self.login(identity.clone());
        identity
    }

    /// Adopt an identity, typically one returned by the authenticator.
    pub fn login(&self, identity: Identity) {
        tracing::info!(
            user_id = %identity.user_id,
            role = %identity.role,
            source = ?identity.source,
            "Session started"
        );
        set_sentry_user(
            &identity.user_id,
            identity.email.as_ref().map(Email::as_str),
        );
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(identity);
    }

    /// Clear the identity. The cart is left untouched.
    pub fn logout(&self) {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(identity) = previous {
            tracing::info!(user_id = %identity.user_id, "Session ended");
            clear_sentry_user();
        }
    }

    /// A copy of the current identity.
    #[must_use]
    pub fn current(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|identity| identity.role)
    }

    /// Decide whether the current actor may open `view`.
    #[must_use]
    pub fn gate(&self, view: View) -> Gate {
        let current = self.current();
        match (view.requirement(), current) {
            (None, current) => Gate::Allowed(current),
            (Some(_), None) => Gate::RedirectToLogin,
            (Some(None), Some(identity)) => Gate::Allowed(Some(identity)),
            (Some(Some(required)), Some(identity)) if identity.role == required => {
                Gate::Allowed(Some(identity))
            }
            (Some(Some(_)), Some(identity)) => Gate::Redirect(View::home_for(identity.role)),
        }
    }
}
