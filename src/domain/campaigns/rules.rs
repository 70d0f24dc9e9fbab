//! Conditional discount rules.
//!
//! Rules override a campaign's default discount for products matching their
//! filters. Rule order comes from the store and is significant: matching is
//! strictly first-match-wins, with no specificity scoring.

use crate::{
    domain::campaigns::models::CampaignUuid,
    domain::catalog::models::{CategoryUuid, Product},
    money::Discount,
    uuids::TypedUuid,
};

/// Rule UUID
pub type RuleUuid = TypedUuid<Rule>;

/// A threshold comparison against a product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl Comparison {
    /// Parses the operator symbol the store records use. Returns `None` for
    /// anything unrecognised; the decode boundary treats that as "no
    /// condition" to preserve the store's permissive matching.
    #[must_use]
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Gte),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            "==" | "=" => Some(Self::Eq),
            _ => None,
        }
    }

    /// Evaluates `lhs <op> rhs`.
    #[must_use]
    pub const fn evaluate(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Gt => lhs > rhs,
            Self::Gte => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Lte => lhs <= rhs,
            Self::Eq => lhs == rhs,
        }
    }
}

/// An operator plus threshold, applied to one product attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub op: Comparison,
    pub threshold: i64,
}

impl Condition {
    /// Whether the attribute value satisfies this condition.
    #[must_use]
    pub const fn holds(&self, actual: i64) -> bool {
        self.op.evaluate(actual, self.threshold)
    }
}

/// A conditional discount override within a campaign.
#[derive(Debug, Clone)]
pub struct Rule {
    pub uuid: RuleUuid,
    pub campaign: CampaignUuid,
    /// When set, the rule only matches products of this category.
    pub category: Option<CategoryUuid>,
    pub stock: Option<Condition>,
    pub price: Option<Condition>,
    pub sold: Option<Condition>,
    pub discount: Discount,
}

impl Rule {
    /// Whether every present filter holds for the product. Absent filters
    /// pass.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if self
            .category
            .is_some_and(|category| category != product.category)
        {
            return false;
        }

        let checks = [
            (self.stock, i64::from(product.stock)),
            (self.price, product.price),
            (self.sold, i64::from(product.sold)),
        ];

        checks
            .iter()
            .all(|(condition, actual)| condition.is_none_or(|c| c.holds(*actual)))
    }
}

/// Finds the discount rule for a `(campaign, product)` pair: the first rule
/// in source order belonging to the campaign whose filters all hold.
/// `None` means the caller falls back to the campaign's default discount.
#[must_use]
pub fn match_rule<'a>(
    rules: &'a [Rule],
    campaign: CampaignUuid,
    product: &Product,
) -> Option<&'a Rule> {
    rules
        .iter()
        .filter(|rule| rule.campaign == campaign)
        .find(|rule| rule.matches(product))
}
