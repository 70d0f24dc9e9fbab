//! Flash-sale campaigns
//!
//! A campaign is a time-boxed promotional event carrying a default discount
//! and an ordered list of conditional rules. Products join a campaign
//! through memberships; the service resolves each member's sale price by
//! matching rules first and falling back to the campaign default.

pub mod errors;
pub mod models;
pub mod records;
pub mod repository;
pub mod rules;
pub mod schedule;
pub mod service;

pub use errors::CampaignsServiceError;
pub use service::*;
