//! Voucher Records

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    domain::vouchers::models::{Voucher, VoucherScope, normalize_code},
    money::DiscountDecodeError,
};

use crate::money::Discount;

/// Voucher Record
///
/// The store keeps the scope as a tag string plus one undifferentiated id
/// list; which kind of id the list holds depends on the tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoucherRecord {
    pub uuid: Uuid,
    pub code: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub max_discount: Option<i64>,
    pub min_order_value: Option<i64>,
    pub quantity: u32,
    pub used: u32,
    pub valid_from: Option<Timestamp>,
    pub valid_to: Option<Timestamp>,
    pub applies_to: String,
    pub applied_items: Vec<Uuid>,
    pub user_uuid: Option<Uuid>,
    pub active: bool,
}

/// Errors decoding voucher records into models.
#[derive(Debug, Error)]
pub enum VoucherDecodeError {
    /// The record's scope tag is not one this core knows.
    #[error("voucher {uuid} has unknown scope `{scope}`")]
    UnknownScope { uuid: Uuid, scope: String },

    /// The record's discount columns could not be decoded.
    #[error("voucher {uuid} carries an unusable discount")]
    Discount {
        uuid: Uuid,
        #[source]
        source: DiscountDecodeError,
    },
}

impl TryFrom<VoucherRecord> for Voucher {
    type Error = VoucherDecodeError;

    fn try_from(record: VoucherRecord) -> Result<Self, Self::Error> {
        let discount = Discount::decode(&record.discount_type, record.discount_value)
            .map_err(|source| VoucherDecodeError::Discount {
                uuid: record.uuid,
                source,
            })?;

        let scope = match record.applies_to.trim() {
            "all" => VoucherScope::All,
            "specific_categories" => VoucherScope::Categories(
                record.applied_items.iter().copied().map(Into::into).collect(),
            ),
            "specific_products" => VoucherScope::Products(
                record.applied_items.iter().copied().map(Into::into).collect(),
            ),
            other => {
                return Err(VoucherDecodeError::UnknownScope {
                    uuid: record.uuid,
                    scope: other.to_owned(),
                });
            }
        };

        Ok(Self {
            uuid: record.uuid.into(),
            code: normalize_code(&record.code),
            discount,
            max_discount: record.max_discount,
            min_order_value: record.min_order_value,
            quantity: record.quantity,
            used: record.used,
            valid_from: record.valid_from,
            valid_to: record.valid_to,
            scope,
            user: record.user_uuid.map(Into::into),
            active: record.active,
        })
    }
}
