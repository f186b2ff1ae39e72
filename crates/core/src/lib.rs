//! Green Earth Core - Shared types library.
//!
//! This crate provides the state model of the storefront widget:
//! - `storefront` - the server rendering the widget and routing its events
//! - `integration-tests` - end-to-end tests against a fake catalog API
//!
//! # Architecture
//!
//! The core crate contains only types and their operations - no I/O, no HTTP
//! clients, no rendering. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices, catalog entries, the cart and the detail modal

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
