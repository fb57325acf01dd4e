//! Business logic services for the portal.
//!
//! # Services
//!
//! - `auth` - Password login and registration against argon2 hashes
//! - `orders` - Checkout and order history
//! - `account` - Profile and notification preferences
//! - `recommendations` - Fabric/production suggestions for quote requests

pub mod account;
pub mod auth;
pub mod orders;
pub mod recommendations;

pub use account::AccountService;
pub use auth::{AuthError, Authenticator};
pub use orders::{OrderService, PlacedOrder};
pub use recommendations::{RecommendationClient, RecommendationError, Suggestion};
