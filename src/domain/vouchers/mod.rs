//! Vouchers
//!
//! Vouchers discount the cart subtotal at checkout. Eligibility is a pure
//! predicate over the voucher, the cart and the clock; the service layers
//! store access and distinct user-facing failure reasons on top.

pub mod eligibility;
pub mod errors;
pub mod models;
pub mod records;
pub mod repository;
pub mod service;

pub use errors::VouchersServiceError;
pub use service::*;
