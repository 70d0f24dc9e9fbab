//! Vouchers service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::warn;

use crate::{
    domain::carts::models::Cart,
    domain::catalog::{models::Product, repository::ProductsRepository},
    domain::vouchers::{
        eligibility,
        errors::VouchersServiceError,
        models::{Voucher, VoucherScope, VoucherUuid, normalize_code},
        records::VoucherRecord,
        repository::VouchersRepository,
    },
    session::Session,
    store::{RetryPolicy, retry_read},
};

#[derive(Clone)]
pub struct StoreVouchersService {
    vouchers: Arc<dyn VouchersRepository>,
    products: Arc<dyn ProductsRepository>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for StoreVouchersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreVouchersService")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl StoreVouchersService {
    #[must_use]
    pub fn new(
        vouchers: Arc<dyn VouchersRepository>,
        products: Arc<dyn ProductsRepository>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            vouchers,
            products,
            retry,
        }
    }

    fn decode(record: VoucherRecord) -> Option<Voucher> {
        let uuid = record.uuid;

        match Voucher::try_from(record) {
            Ok(voucher) => Some(voucher),
            Err(error) => {
                warn!(voucher = %uuid, %error, "skipping malformed voucher record");
                None
            }
        }
    }

    /// Loads the catalog products needed for category-scope checks. Only
    /// fetched when some voucher actually scopes by category.
    async fn scope_catalog(
        &self,
        vouchers: &[Voucher],
    ) -> Result<Vec<Product>, VouchersServiceError> {
        let needs_categories = vouchers
            .iter()
            .any(|voucher| matches!(voucher.scope, VoucherScope::Categories(_)));

        if !needs_categories {
            return Ok(Vec::new());
        }

        let products = retry_read(self.retry, || self.products.products()).await?;

        Ok(products)
    }
}

#[async_trait]
impl VouchersService for StoreVouchersService {
    #[tracing::instrument(
        name = "vouchers.service.eligible_vouchers",
        skip(self, session, cart),
        fields(user = %session.user, subtotal = cart.subtotal),
        err
    )]
    async fn eligible_vouchers(
        &self,
        session: &Session,
        cart: &Cart,
        now: Timestamp,
    ) -> Result<Vec<Voucher>, VouchersServiceError> {
        let records = retry_read(self.retry, || self.vouchers.vouchers()).await?;

        let vouchers: Vec<Voucher> = records.into_iter().filter_map(Self::decode).collect();
        let catalog = self.scope_catalog(&vouchers).await?;

        let usable = eligibility::eligible(&vouchers, cart, catalog.as_slice(), now, session.user);

        Ok(usable.into_iter().cloned().collect())
    }

    #[tracing::instrument(
        name = "vouchers.service.voucher_by_code",
        skip(self, session, cart),
        fields(user = %session.user),
        err
    )]
    async fn voucher_by_code(
        &self,
        session: &Session,
        code: &str,
        cart: &Cart,
        now: Timestamp,
    ) -> Result<Voucher, VouchersServiceError> {
        let normalized = normalize_code(code);

        let record = retry_read(self.retry, || self.vouchers.voucher_by_code(&normalized))
            .await?
            .ok_or(VouchersServiceError::NotFound)?;

        let voucher = Self::decode(record).ok_or(VouchersServiceError::NotFound)?;

        let catalog = self
            .scope_catalog(std::slice::from_ref(&voucher))
            .await?;

        eligibility::check(&voucher, cart, catalog.as_slice(), now, session.user)?;

        Ok(voucher)
    }

    #[tracing::instrument(name = "vouchers.service.record_redemption", skip(self), err)]
    async fn record_redemption(&self, voucher: VoucherUuid) -> Result<(), VouchersServiceError> {
        self.vouchers.increment_used(voucher).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait VouchersService: Send + Sync {
    /// The vouchers this user could apply to this cart right now.
    async fn eligible_vouchers(
        &self,
        session: &Session,
        cart: &Cart,
        now: Timestamp,
    ) -> Result<Vec<Voucher>, VouchersServiceError>;

    /// Resolves a user-entered code against the cart, case-insensitively.
    /// Failures carry the specific reason (not found, expired, below
    /// minimum, ...) for the UI to surface verbatim.
    async fn voucher_by_code(
        &self,
        session: &Session,
        code: &str,
        cart: &Cart,
        now: Timestamp,
    ) -> Result<Voucher, VouchersServiceError>;

    /// Records one redemption. Called best-effort after order creation.
    async fn record_redemption(&self, voucher: VoucherUuid) -> Result<(), VouchersServiceError>;
}
