//! Catalog repository.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::catalog::models::{Category, CategoryUuid, Product, ProductUuid},
    store::StoreError,
};

/// Read access to the `products` and `categories` collections.
#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Fetch a single product.
    async fn product(&self, uuid: ProductUuid) -> Result<Product, StoreError>;

    /// Fetch every product.
    async fn products(&self) -> Result<Vec<Product>, StoreError>;

    /// Fetch the products of one category.
    async fn products_in_category(
        &self,
        category: CategoryUuid,
    ) -> Result<Vec<Product>, StoreError>;

    /// Fetch every category.
    async fn categories(&self) -> Result<Vec<Category>, StoreError>;
}
