//! Threadline Core - Shared types library.
//!
//! This crate provides common types used across all Threadline components:
//! - `portal` - Client library for the storefront and brand portal
//! - `cli` - Command-line front end driving the portal
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, roles and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
