//! Campaigns service errors.

use thiserror::Error;

use crate::{money::PriceError, store::StoreError};

#[derive(Debug, Error)]
pub enum CampaignsServiceError {
    #[error("price resolution failed")]
    Price(#[from] PriceError),

    #[error("storage error")]
    Store(#[from] StoreError),
}
