//! Catalog
//!
//! Products and categories are owned by an external administrative surface;
//! this core only reads them.

pub mod errors;
pub mod models;
pub mod repository;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
