//! Carts service.
//!
//! Every mutation reloads the full line list afterwards and returns a cart
//! with freshly derived aggregates, so concurrent sessions converge on the
//! store's last write instead of drifting on locally patched totals.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::{
    domain::carts::{
        errors::CartsServiceError,
        models::{Cart, CartLine, CartLineUuid, LineKey, NewCartLine, normalize_variant},
        repository::CartLinesRepository,
    },
    domain::catalog::{
        models::{Product, ProductUuid},
        repository::ProductsRepository,
    },
    session::Session,
    store::StoreError,
};

#[derive(Clone)]
pub struct StoreCartsService {
    lines: Arc<dyn CartLinesRepository>,
    products: Arc<dyn ProductsRepository>,
}

impl std::fmt::Debug for StoreCartsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCartsService").finish_non_exhaustive()
    }
}

impl StoreCartsService {
    #[must_use]
    pub fn new(lines: Arc<dyn CartLinesRepository>, products: Arc<dyn ProductsRepository>) -> Self {
        Self { lines, products }
    }

    async fn reload(&self, session: &Session) -> Result<Cart, CartsServiceError> {
        let lines = self.lines.lines(session.user).await?;

        Ok(Cart::from_lines(lines))
    }

    async fn find_line(
        &self,
        session: &Session,
        key: &LineKey,
    ) -> Result<Option<CartLine>, CartsServiceError> {
        let lines = self.lines.lines(session.user).await?;

        Ok(lines.into_iter().find(|line| &line.key() == key))
    }

    fn validate_selection(product: &Product, new: &NewCartLine) -> Result<(), CartsServiceError> {
        let color_missing = !product.colors.is_empty() && normalize_variant(&new.color).is_empty();
        let size_missing = !product.sizes.is_empty() && normalize_variant(&new.size).is_empty();

        if color_missing || size_missing {
            return Err(CartsServiceError::MissingSelection);
        }

        Ok(())
    }
}

#[async_trait]
impl CartsService for StoreCartsService {
    #[tracing::instrument(name = "carts.service.cart", skip(self, session), fields(user = %session.user), err)]
    async fn cart(&self, session: &Session) -> Result<Cart, CartsServiceError> {
        self.reload(session).await
    }

    #[tracing::instrument(
        name = "carts.service.add_line",
        skip(self, session, new),
        fields(user = %session.user, product = %new.product, quantity = new.quantity),
        err
    )]
    async fn add_line(
        &self,
        session: &Session,
        new: NewCartLine,
    ) -> Result<Cart, CartsServiceError> {
        if new.quantity == 0 {
            return Err(CartsServiceError::ZeroQuantity);
        }

        let product = match self.products.product(new.product).await {
            Ok(product) => product,
            Err(StoreError::NotFound) => return Err(CartsServiceError::ProductNotFound),
            Err(error) => return Err(error.into()),
        };

        Self::validate_selection(&product, &new)?;

        let key = LineKey::new(new.product, &new.color, &new.size);
        let existing = self.find_line(session, &key).await?;

        let merged_quantity = existing
            .as_ref()
            .map_or(0, |line| line.quantity)
            .saturating_add(new.quantity);

        if merged_quantity > product.stock {
            return Err(CartsServiceError::InsufficientStock {
                available: product.stock,
            });
        }

        match existing {
            // Additive merge onto the existing line.
            Some(line) => {
                self.lines
                    .set_quantity(session.user, line.uuid, merged_quantity)
                    .await?;
            }
            None => {
                let line = CartLine {
                    uuid: CartLineUuid::generate(),
                    user: session.user,
                    product: product.uuid,
                    name: product.name.clone(),
                    unit_price: new.unit_price,
                    image: product.images.first().cloned(),
                    quantity: new.quantity,
                    color: key.color.clone(),
                    size: key.size.clone(),
                };

                self.lines.insert(line).await?;
            }
        }

        self.reload(session).await
    }

    #[tracing::instrument(
        name = "carts.service.update_quantity",
        skip(self, session),
        fields(user = %session.user, %product, quantity),
        err
    )]
    async fn update_quantity(
        &self,
        session: &Session,
        product: ProductUuid,
        color: &str,
        size: &str,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError> {
        let key = LineKey::new(product, color, size);

        let line = self
            .find_line(session, &key)
            .await?
            .ok_or(CartsServiceError::LineNotFound)?;

        // Direct overwrite; stock verification is the caller's concern here.
        self.lines
            .set_quantity(session.user, line.uuid, quantity)
            .await?;

        self.reload(session).await
    }

    #[tracing::instrument(
        name = "carts.service.remove_line",
        skip(self, session),
        fields(user = %session.user, %product),
        err
    )]
    async fn remove_line(
        &self,
        session: &Session,
        product: ProductUuid,
        color: &str,
        size: &str,
    ) -> Result<Cart, CartsServiceError> {
        let key = LineKey::new(product, color, size);

        // Removing an absent line is a no-op, not an error.
        if let Some(line) = self.find_line(session, &key).await? {
            self.lines.delete(session.user, line.uuid).await?;
        }

        self.reload(session).await
    }

    #[tracing::instrument(name = "carts.service.clear", skip(self, session), fields(user = %session.user))]
    async fn clear(&self, session: &Session) -> Result<Cart, CartsServiceError> {
        // Liveness over consistency: when the delete fails the user still
        // sees an empty cart; the stale rows surface on the next reload.
        if let Err(error) = self.lines.clear(session.user).await {
            warn!(user = %session.user, %error, "cart clear failed; presenting empty cart");

            return Ok(Cart::empty());
        }

        self.reload(session).await
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart with derived aggregates.
    async fn cart(&self, session: &Session) -> Result<Cart, CartsServiceError>;

    /// Add a product variant to the cart. Quantities merge additively when
    /// the (product, color, size) key already exists.
    async fn add_line(&self, session: &Session, new: NewCartLine)
    -> Result<Cart, CartsServiceError>;

    /// Overwrite a line's quantity.
    async fn update_quantity(
        &self,
        session: &Session,
        product: ProductUuid,
        color: &str,
        size: &str,
        quantity: u32,
    ) -> Result<Cart, CartsServiceError>;

    /// Remove a line. A missing line is a no-op.
    async fn remove_line(
        &self,
        session: &Session,
        product: ProductUuid,
        color: &str,
        size: &str,
    ) -> Result<Cart, CartsServiceError>;

    /// Empty the cart.
    async fn clear(&self, session: &Session) -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::carts::repository::MockCartLinesRepository,
        domain::catalog::models::{CategoryUuid, Product, ProductUuid},
        session::UserUuid,
        store::memory::MemoryStore,
    };

    use super::*;

    fn seeded_product(stock: u32) -> Product {
        Product {
            uuid: ProductUuid::generate(),
            name: "Satin Dress".to_owned(),
            price: 200_000,
            stock,
            sold: 0,
            category: CategoryUuid::generate(),
            flat_discount_price: None,
            colors: vec!["Black".to_owned(), "Red".to_owned()],
            sizes: vec!["S".to_owned(), "M".to_owned()],
            images: vec!["dress.webp".to_owned()],
        }
    }

    fn service_over(store: &Arc<MemoryStore>) -> StoreCartsService {
        StoreCartsService::new(store.clone(), store.clone())
    }

    fn add_request(product: &Product, quantity: u32) -> NewCartLine {
        NewCartLine {
            product: product.uuid,
            quantity,
            color: "Red".to_owned(),
            size: "M".to_owned(),
            unit_price: 200_000,
        }
    }

    #[tokio::test]
    async fn same_key_adds_merge_into_one_line() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(10);
        store.put_product(product.clone());

        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        service.add_line(&session, add_request(&product, 2)).await?;

        let cart = service
            .add_line(
                &session,
                NewCartLine {
                    // Different casing and padding must hit the same line.
                    color: "red ".to_owned(),
                    size: " m".to_owned(),
                    ..add_request(&product, 3)
                },
            )
            .await?;

        assert_eq!(cart.lines.len(), 1, "adds with one key must merge");
        assert_eq!(cart.item_count, 5);
        assert_eq!(cart.subtotal, 1_000_000);

        Ok(())
    }

    #[tokio::test]
    async fn different_sizes_stay_separate_lines() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(10);
        store.put_product(product.clone());

        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        service.add_line(&session, add_request(&product, 1)).await?;

        let cart = service
            .add_line(
                &session,
                NewCartLine {
                    size: "S".to_owned(),
                    ..add_request(&product, 1)
                },
            )
            .await?;

        assert_eq!(cart.lines.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn add_beyond_stock_is_rejected() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(4);
        store.put_product(product.clone());

        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        service.add_line(&session, add_request(&product, 3)).await?;

        let result = service.add_line(&session, add_request(&product, 2)).await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::InsufficientStock { available: 4 })
            ),
            "expected InsufficientStock, got {result:?}"
        );

        // The failed add must not have touched the cart.
        let cart = service.cart(&session).await?;

        assert_eq!(cart.item_count, 3);

        Ok(())
    }

    #[tokio::test]
    async fn missing_variant_selection_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(10);
        store.put_product(product.clone());

        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        let result = service
            .add_line(
                &session,
                NewCartLine {
                    color: "  ".to_owned(),
                    ..add_request(&product, 1)
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::MissingSelection)),
            "expected MissingSelection, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_quantity_overwrites_instead_of_merging() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(10);
        store.put_product(product.clone());

        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        service.add_line(&session, add_request(&product, 2)).await?;

        let cart = service
            .update_quantity(&session, product.uuid, "Red", "M", 7)
            .await?;

        assert_eq!(cart.item_count, 7, "update must replace, not add");

        Ok(())
    }

    #[tokio::test]
    async fn remove_missing_line_is_a_noop() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(10);
        store.put_product(product.clone());

        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        service.add_line(&session, add_request(&product, 2)).await?;

        let cart = service
            .remove_line(&session, ProductUuid::generate(), "Red", "M")
            .await?;

        assert_eq!(cart.lines.len(), 1, "cart must be unchanged");
        assert_eq!(cart.item_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn remove_line_deletes_by_key() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(10);
        store.put_product(product.clone());

        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        service.add_line(&session, add_request(&product, 2)).await?;

        let cart = service
            .remove_line(&session, product.uuid, "RED", "m ")
            .await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_scoped_per_user() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(10);
        store.put_product(product.clone());

        let service = service_over(&store);
        let alice = Session::new(UserUuid::generate());
        let bob = Session::new(UserUuid::generate());

        service.add_line(&alice, add_request(&product, 2)).await?;

        let bobs_cart = service.cart(&bob).await?;

        assert!(bobs_cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_failure_still_presents_empty_cart() {
        let mut lines = MockCartLinesRepository::new();

        lines
            .expect_clear()
            .returning(|_| Err(StoreError::unavailable("store offline")));

        let store = Arc::new(MemoryStore::new());
        let service = StoreCartsService::new(Arc::new(lines), store);
        let session = Session::new(UserUuid::generate());

        let cart = service.clear(&session).await.unwrap_or_default();

        assert!(cart.is_empty(), "clear must locally empty the cart");
    }

    #[tokio::test]
    async fn clear_empties_the_store() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let product = seeded_product(10);
        store.put_product(product.clone());

        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        service.add_line(&session, add_request(&product, 2)).await?;
        service.clear(&session).await?;

        let cart = service.cart(&session).await?;

        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_cannot_be_added() {
        let store = Arc::new(MemoryStore::new());
        let service = service_over(&store);
        let session = Session::new(UserUuid::generate());

        let result = service
            .add_line(
                &session,
                NewCartLine {
                    product: ProductUuid::generate(),
                    quantity: 1,
                    color: "Red".to_owned(),
                    size: "M".to_owned(),
                    unit_price: 100,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound)),
            "expected ProductNotFound, got {result:?}"
        );
    }
}
