//! Orders and addresses repositories.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::checkout::models::{Address, Order},
    session::UserUuid,
    store::StoreError,
};

/// Write-once access to the `orders` collection.
#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Persist a new order. Orders are never updated through this core.
    async fn insert(&self, order: Order) -> Result<(), StoreError>;

    /// Fetch a user's order history, most recent first.
    async fn orders(&self, user: UserUuid) -> Result<Vec<Order>, StoreError>;
}

/// Read access to the `addresses` collection.
#[automock]
#[async_trait]
pub trait AddressesRepository: Send + Sync {
    /// Fetch a user's saved addresses.
    async fn addresses(&self, user: UserUuid) -> Result<Vec<Address>, StoreError>;
}
