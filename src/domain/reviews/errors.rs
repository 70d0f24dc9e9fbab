//! Reviews service errors.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ReviewsServiceError {
    #[error("rating must be between 1 and 5")]
    RatingOutOfRange,

    #[error("review text cannot be empty")]
    EmptyBody,

    #[error("product not found")]
    ProductNotFound,

    #[error("storage error")]
    Store(#[from] StoreError),
}
