//! Campaign Models

use jiff::Timestamp;

use crate::{
    domain::catalog::models::{Product, ProductUuid},
    money::{Discount, Minor},
    uuids::TypedUuid,
};

/// Campaign UUID
pub type CampaignUuid = TypedUuid<Campaign>;

/// Campaign Model
///
/// Only consulted when `active` is set and the clock lies inside
/// `[starts_at, ends_at]`; see [`crate::domain::campaigns::schedule`].
#[derive(Debug, Clone)]
pub struct Campaign {
    pub uuid: CampaignUuid,
    pub name: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub active: bool,
    /// Applied to members no rule matches.
    pub default_discount: Discount,
}

/// Links one product into one campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignMembership {
    pub campaign: CampaignUuid,
    pub product: ProductUuid,
}

/// A campaign member with its resolved sale price.
#[derive(Debug, Clone)]
pub struct SaleItem {
    pub product: Product,
    pub campaign: CampaignUuid,
    /// Price after applying the matched rule or the campaign default.
    pub sale_price: Minor,
}

impl SaleItem {
    /// Whether the resolved price actually undercuts the base price. The
    /// price resolver passes zero-valued discounts through unchanged, so
    /// this is the check for badging an item as on sale.
    #[must_use]
    pub const fn is_discounted(&self) -> bool {
        self.sale_price < self.product.price
    }
}
