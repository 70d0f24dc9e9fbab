//! Checkout
//!
//! Composes the cart subtotal, voucher discounts and the shipping fee into
//! the payable total, and turns a confirmed cart into a write-once order.

pub mod errors;
pub mod models;
pub mod repository;
pub mod service;
pub mod totals;

pub use errors::CheckoutServiceError;
pub use service::*;
