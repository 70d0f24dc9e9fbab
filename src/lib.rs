//! Vitrine
//!
//! Vitrine is the pricing, promotion, cart and checkout core for a fashion
//! storefront. It owns the flash-sale discount resolution logic (campaign
//! windows, conditional rules, price resolution), the cart line aggregation
//! semantics, voucher eligibility and stacking, and checkout totals.
//!
//! Persistence and auth are delegated to an external store reached through
//! per-collection repository traits; an in-memory implementation backs tests
//! and demos.

pub mod config;
pub mod context;
pub mod domain;
pub mod money;
pub mod session;
pub mod store;
pub mod uuids;
