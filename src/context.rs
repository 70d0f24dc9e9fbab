//! Storefront Context

use std::sync::Arc;

use crate::{
    config::StorefrontConfig,
    domain::campaigns::{
        repository::CampaignsRepository,
        service::{CampaignsService, StoreCampaignsService},
    },
    domain::carts::{
        repository::CartLinesRepository,
        service::{CartsService, StoreCartsService},
    },
    domain::catalog::{
        repository::ProductsRepository,
        service::{CatalogService, StoreCatalogService},
    },
    domain::checkout::{
        repository::{AddressesRepository, OrdersRepository},
        service::{CheckoutService, StoreCheckoutService},
    },
    domain::reviews::{
        repository::ReviewsRepository,
        service::{ReviewsService, StoreReviewsService},
    },
    domain::vouchers::{
        repository::VouchersRepository,
        service::{StoreVouchersService, VouchersService},
    },
    store::RetryPolicy,
};

/// The repository handles the context is wired from. One handle per
/// collection; a single client may back all of them.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductsRepository>,
    pub campaigns: Arc<dyn CampaignsRepository>,
    pub cart_lines: Arc<dyn CartLinesRepository>,
    pub vouchers: Arc<dyn VouchersRepository>,
    pub orders: Arc<dyn OrdersRepository>,
    pub addresses: Arc<dyn AddressesRepository>,
    pub reviews: Arc<dyn ReviewsRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

impl Repositories {
    /// Wires every collection to one store implementing all the
    /// repository traits.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ProductsRepository
            + CampaignsRepository
            + CartLinesRepository
            + VouchersRepository
            + OrdersRepository
            + AddressesRepository
            + ReviewsRepository
            + 'static,
    {
        Self {
            products: store.clone(),
            campaigns: store.clone(),
            cart_lines: store.clone(),
            vouchers: store.clone(),
            orders: store.clone(),
            addresses: store.clone(),
            reviews: store,
        }
    }
}

/// Storefront Context
#[derive(Clone)]
pub struct StorefrontContext {
    pub catalog: Arc<dyn CatalogService>,
    pub campaigns: Arc<dyn CampaignsService>,
    pub carts: Arc<dyn CartsService>,
    pub vouchers: Arc<dyn VouchersService>,
    pub checkout: Arc<dyn CheckoutService>,
    pub reviews: Arc<dyn ReviewsService>,
}

impl std::fmt::Debug for StorefrontContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontContext").finish_non_exhaustive()
    }
}

impl StorefrontContext {
    /// Builds the full service graph over the given repositories.
    #[must_use]
    pub fn new(repositories: &Repositories, config: &StorefrontConfig) -> Self {
        let retry = RetryPolicy::from_config(config);

        let vouchers: Arc<dyn VouchersService> = Arc::new(StoreVouchersService::new(
            repositories.vouchers.clone(),
            repositories.products.clone(),
            retry,
        ));

        Self {
            catalog: Arc::new(StoreCatalogService::new(
                repositories.products.clone(),
                retry,
            )),
            campaigns: Arc::new(StoreCampaignsService::new(
                repositories.campaigns.clone(),
                repositories.products.clone(),
                retry,
            )),
            carts: Arc::new(StoreCartsService::new(
                repositories.cart_lines.clone(),
                repositories.products.clone(),
            )),
            checkout: Arc::new(StoreCheckoutService::new(
                repositories.cart_lines.clone(),
                repositories.products.clone(),
                repositories.addresses.clone(),
                repositories.orders.clone(),
                vouchers.clone(),
                config.free_shipping_threshold,
            )),
            reviews: Arc::new(StoreReviewsService::new(
                repositories.reviews.clone(),
                repositories.products.clone(),
                retry,
            )),
            vouchers,
        }
    }
}
