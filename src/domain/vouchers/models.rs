//! Voucher Models

use jiff::Timestamp;

use crate::{
    domain::catalog::models::{CategoryUuid, ProductUuid},
    money::{Discount, Minor, PriceError, discount_amount},
    session::UserUuid,
    uuids::TypedUuid,
};

/// Voucher UUID
pub type VoucherUuid = TypedUuid<Voucher>;

/// How broadly a voucher's discount applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoucherScope {
    /// Applies to any cart.
    All,

    /// Applies when at least one cart line's product category is listed.
    Categories(Vec<CategoryUuid>),

    /// Applies when at least one cart line's product is listed.
    Products(Vec<ProductUuid>),
}

/// Voucher Model
#[derive(Debug, Clone)]
pub struct Voucher {
    pub uuid: VoucherUuid,
    /// Normalized lowercase; matched case-insensitively.
    pub code: String,
    pub discount: Discount,
    /// Upper bound on the amount this voucher can take off.
    pub max_discount: Option<Minor>,
    /// Subtotal required before the voucher becomes usable.
    pub min_order_value: Option<Minor>,
    /// Total number of redemptions allowed.
    pub quantity: u32,
    /// Redemptions so far; must stay below `quantity` to remain usable.
    pub used: u32,
    /// Open-ended when absent.
    pub valid_from: Option<Timestamp>,
    /// Open-ended when absent.
    pub valid_to: Option<Timestamp>,
    pub scope: VoucherScope,
    /// When set, only this user may redeem.
    pub user: Option<UserUuid>,
    pub active: bool,
}

impl Voucher {
    /// The discount this voucher takes off a subtotal: the raw percent or
    /// fixed amount, capped at `max_discount` when one is set.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Conversion`] when the percentage maths cannot
    /// be represented in minor units.
    pub fn discount_against(&self, subtotal: Minor) -> Result<Minor, PriceError> {
        let raw = discount_amount(subtotal, &self.discount)?;

        Ok(match self.max_discount {
            Some(cap) => raw.min(cap),
            None => raw,
        })
    }
}

/// Normalizes a voucher code for comparison and storage.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_lowercase()
}

/// The set of vouchers a user has applied to the current checkout.
///
/// Stacking is allowed; applying the same voucher twice is an idempotent
/// no-op rather than an error.
#[derive(Debug, Clone, Default)]
pub struct AppliedVouchers {
    vouchers: Vec<Voucher>,
}

impl AppliedVouchers {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a voucher. Returns `false` when it was already applied.
    pub fn apply(&mut self, voucher: Voucher) -> bool {
        if self.vouchers.iter().any(|v| v.uuid == voucher.uuid) {
            return false;
        }

        self.vouchers.push(voucher);

        true
    }

    /// Removes a voucher by id, returning it when it was applied.
    pub fn remove(&mut self, uuid: VoucherUuid) -> Option<Voucher> {
        let index = self.vouchers.iter().position(|v| v.uuid == uuid)?;

        Some(self.vouchers.remove(index))
    }

    /// The applied vouchers in application order.
    #[must_use]
    pub fn vouchers(&self) -> &[Voucher] {
        &self.vouchers
    }

    /// Whether nothing is applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vouchers.is_empty()
    }

    /// Sum of every applied voucher's capped discount against the subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Conversion`] when the percentage maths cannot
    /// be represented in minor units.
    pub fn total_discount(&self, subtotal: Minor) -> Result<Minor, PriceError> {
        self.vouchers
            .iter()
            .try_fold(0_i64, |acc, voucher| {
                Ok(acc.saturating_add(voucher.discount_against(subtotal)?))
            })
    }
}
