//! Storefront domain concerns.

pub mod campaigns;
pub mod carts;
pub mod catalog;
pub mod checkout;
pub mod reviews;
pub mod vouchers;
