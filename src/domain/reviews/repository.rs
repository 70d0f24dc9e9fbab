//! Reviews repository.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::catalog::models::ProductUuid,
    domain::reviews::models::Review,
    store::StoreError,
};

/// Access to the `reviews` collection.
#[automock]
#[async_trait]
pub trait ReviewsRepository: Send + Sync {
    /// Fetch a product's reviews, newest first.
    async fn reviews(&self, product: ProductUuid) -> Result<Vec<Review>, StoreError>;

    /// Persist a new review.
    async fn insert(&self, review: Review) -> Result<(), StoreError>;
}
