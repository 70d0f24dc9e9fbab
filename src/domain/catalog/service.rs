//! Catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::catalog::{
        errors::CatalogServiceError,
        models::{Category, CategoryUuid, Product, ProductUuid},
        repository::ProductsRepository,
    },
    store::{RetryPolicy, retry_read},
};

/// Catalog reads over the external store, with bounded retry since every
/// operation here is an idempotent read.
#[derive(Clone)]
pub struct StoreCatalogService {
    products: Arc<dyn ProductsRepository>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for StoreCatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCatalogService")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl StoreCatalogService {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsRepository>, retry: RetryPolicy) -> Self {
        Self { products, retry }
    }
}

#[async_trait]
impl CatalogService for StoreCatalogService {
    #[tracing::instrument(name = "catalog.service.product", skip(self), err)]
    async fn product(&self, uuid: ProductUuid) -> Result<Product, CatalogServiceError> {
        let product = retry_read(self.retry, || self.products.product(uuid)).await?;

        Ok(product)
    }

    #[tracing::instrument(name = "catalog.service.products", skip(self), err)]
    async fn products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let products = retry_read(self.retry, || self.products.products()).await?;

        Ok(products)
    }

    #[tracing::instrument(name = "catalog.service.products_in_category", skip(self), err)]
    async fn products_in_category(
        &self,
        category: CategoryUuid,
    ) -> Result<Vec<Product>, CatalogServiceError> {
        let products =
            retry_read(self.retry, || self.products.products_in_category(category)).await?;

        Ok(products)
    }

    #[tracing::instrument(name = "catalog.service.categories", skip(self), err)]
    async fn categories(&self) -> Result<Vec<Category>, CatalogServiceError> {
        let categories = retry_read(self.retry, || self.products.categories()).await?;

        Ok(categories)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieve a single product.
    async fn product(&self, uuid: ProductUuid) -> Result<Product, CatalogServiceError>;

    /// Retrieve the full catalog.
    async fn products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve the products of one category.
    async fn products_in_category(
        &self,
        category: CategoryUuid,
    ) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve every category.
    async fn categories(&self) -> Result<Vec<Category>, CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use crate::domain::catalog::repository::MockProductsRepository;
    use crate::store::StoreError;

    use super::*;

    fn immediate_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            initial_backoff: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let mut repo = MockProductsRepository::new();

        repo.expect_product()
            .returning(|_| Err(StoreError::NotFound));

        let service = StoreCatalogService::new(Arc::new(repo), immediate_retry());

        let result = service.product(ProductUuid::generate()).await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn transient_failure_is_retried() -> TestResult {
        let mut repo = MockProductsRepository::new();

        repo.expect_categories()
            .times(1)
            .returning(|| Err(StoreError::unavailable("timeout")));

        repo.expect_categories().times(1).returning(|| Ok(vec![]));

        let service = StoreCatalogService::new(Arc::new(repo), immediate_retry());

        let categories = service.categories().await?;

        assert!(categories.is_empty());

        Ok(())
    }
}
