//! Threadline portal library.
//!
//! Client core for the storefront and brand portal: a typed REST resource
//! client, session and cart state, the quote inquiry lifecycle, checkout and
//! account services. Front ends (the `tl` CLI, tests) drive it through a
//! [`Portal`] handle.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod error;
pub mod inquiries;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod store;

pub use error::{ErrorKind, PortalError, Result};
pub use state::Portal;
