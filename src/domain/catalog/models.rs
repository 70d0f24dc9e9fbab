//! Catalog Models

use serde::{Deserialize, Serialize};

use crate::{money::Minor, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Category UUID
pub type CategoryUuid = TypedUuid<Category>;

/// Product Model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub uuid: ProductUuid,
    pub name: String,
    /// Base price in minor units.
    pub price: Minor,
    pub stock: u32,
    pub sold: u32,
    pub category: CategoryUuid,
    /// Administrator-set flat sale price, independent of campaigns.
    pub flat_discount_price: Option<Minor>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub images: Vec<String>,
}

impl Product {
    /// The price to show outside any campaign: the flat discount price when
    /// one is set and actually lower than the base price, else the base
    /// price.
    #[must_use]
    pub fn effective_base_price(&self) -> Minor {
        match self.flat_discount_price {
            Some(flat) if flat < self.price => flat,
            _ => self.price,
        }
    }

    /// Whether the product is out of stock.
    #[must_use]
    pub const fn sold_out(&self) -> bool {
        self.stock == 0
    }
}

/// Category Model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub uuid: CategoryUuid,
    pub name: String,
}
