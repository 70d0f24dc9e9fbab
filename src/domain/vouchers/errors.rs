//! Vouchers service errors.

use thiserror::Error;

use crate::{domain::vouchers::eligibility::Ineligibility, store::StoreError};

#[derive(Debug, Error)]
pub enum VouchersServiceError {
    #[error("voucher code not found")]
    NotFound,

    /// The code exists but cannot be used; the inner reason is user-facing.
    #[error(transparent)]
    Ineligible(#[from] Ineligibility),

    #[error("storage error")]
    Store(#[from] StoreError),
}
