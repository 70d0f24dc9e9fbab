//! Cart lines repository.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::carts::models::{CartLine, CartLineUuid},
    session::UserUuid,
    store::StoreError,
};

/// Read/write access to the `cart_items` collection. All operations are
/// scoped to one user; last write wins when two sessions race.
#[automock]
#[async_trait]
pub trait CartLinesRepository: Send + Sync {
    /// Fetch every line of a user's cart.
    async fn lines(&self, user: UserUuid) -> Result<Vec<CartLine>, StoreError>;

    /// Insert a new line.
    async fn insert(&self, line: CartLine) -> Result<(), StoreError>;

    /// Overwrite a line's quantity.
    async fn set_quantity(
        &self,
        user: UserUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<(), StoreError>;

    /// Delete one line.
    async fn delete(&self, user: UserUuid, line: CartLineUuid) -> Result<(), StoreError>;

    /// Delete every line of a user's cart.
    async fn clear(&self, user: UserUuid) -> Result<(), StoreError>;
}
