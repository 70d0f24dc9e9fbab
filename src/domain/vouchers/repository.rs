//! Vouchers repository.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::vouchers::{models::VoucherUuid, records::VoucherRecord},
    store::StoreError,
};

/// Access to the `vouchers` collection.
#[automock]
#[async_trait]
pub trait VouchersRepository: Send + Sync {
    /// Fetch every voucher.
    async fn vouchers(&self) -> Result<Vec<VoucherRecord>, StoreError>;

    /// Fetch a voucher by normalized (lowercase) code.
    async fn voucher_by_code(&self, code: &str) -> Result<Option<VoucherRecord>, StoreError>;

    /// Record one redemption (`used += 1`).
    async fn increment_used(&self, voucher: VoucherUuid) -> Result<(), StoreError>;
}
