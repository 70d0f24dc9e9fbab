//! Carts service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("product not found")]
    ProductNotFound,

    #[error("cart line not found")]
    LineNotFound,

    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("product requires a color and size selection")]
    MissingSelection,

    #[error("only {available} in stock")]
    InsufficientStock { available: u32 },

    #[error("storage error")]
    Store(#[from] StoreError),
}
