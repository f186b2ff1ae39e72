//! Core types for the Green Earth storefront.
//!
//! This module provides type-safe wrappers for the catalog, the cart and the
//! detail modal.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod modal;
pub mod price;

pub use cart::{Cart, CartItem, CartLine};
pub use catalog::{ALL_CATEGORIES, ActiveCategory, Category, Plant};
pub use id::*;
pub use modal::{Modal, ModalState, ModalTicket};
pub use price::{CURRENCY_SYMBOL, Price, PriceError, format_amount};
