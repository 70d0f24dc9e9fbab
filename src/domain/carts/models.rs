//! Cart Models

use crate::{
    domain::catalog::models::ProductUuid,
    money::Minor,
    session::UserUuid,
    uuids::TypedUuid,
};

/// Cart line UUID
pub type CartLineUuid = TypedUuid<CartLine>;

/// Normalizes a color or size for identity comparison: trimmed and
/// lower-cased, so "Red" and "red " land on the same line.
#[must_use]
pub fn normalize_variant(value: &str) -> String {
    value.trim().to_lowercase()
}

/// The identity of a cart line within one user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product: ProductUuid,
    pub color: String,
    pub size: String,
}

impl LineKey {
    /// Builds a key, normalizing the variant parts.
    #[must_use]
    pub fn new(product: ProductUuid, color: &str, size: &str) -> Self {
        Self {
            product,
            color: normalize_variant(color),
            size: normalize_variant(size),
        }
    }
}

/// One (product, color, size) entry in a user's cart, with the name, price
/// and image snapshotted at the time of add.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub uuid: CartLineUuid,
    pub user: UserUuid,
    pub product: ProductUuid,
    pub name: String,
    /// Locked-in unit price the user saw when adding.
    pub unit_price: Minor,
    pub image: Option<String>,
    pub quantity: u32,
    /// Normalized; part of the line identity.
    pub color: String,
    /// Normalized; part of the line identity.
    pub size: String,
}

impl CartLine {
    /// This line's identity key.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product, &self.color, &self.size)
    }
}

/// A request to put a product variant in the cart.
#[derive(Debug, Clone)]
pub struct NewCartLine {
    pub product: ProductUuid,
    pub quantity: u32,
    pub color: String,
    pub size: String,
    /// The displayed unit price to lock in (sale price if the product was
    /// shown on sale).
    pub unit_price: Minor,
}

/// A user's cart with its derived aggregates.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub lines: Vec<CartLine>,
    /// Sum of line quantities.
    pub item_count: u32,
    /// Sum of `unit_price * quantity` over all lines.
    pub subtotal: Minor,
}

impl Cart {
    /// Rederives the aggregates from an authoritative line list. This is
    /// the only way a `Cart` is built; the aggregates are never mutated in
    /// place.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let item_count = lines.iter().map(|line| line.quantity).sum();

        let subtotal = lines
            .iter()
            .map(|line| line.unit_price.saturating_mul(Minor::from(line.quantity)))
            .sum();

        Self {
            lines,
            item_count,
            subtotal,
        }
    }

    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Finds the line with the given identity, if present.
    #[must_use]
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.key() == key)
    }
}
