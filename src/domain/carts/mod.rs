//! Carts
//!
//! The cart is the one collection this core owns end to end. Lines are
//! keyed by (user, product, normalized color, normalized size); aggregates
//! are always rederived from the full line list, never patched.

pub mod errors;
pub mod models;
pub mod repository;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
