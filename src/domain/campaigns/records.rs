//! Campaign Records
//!
//! Wire shapes as the external store returns them: discount types and
//! comparison operators are strings, filters are optional column pairs.
//! Decoding into the typed models happens exactly once, here; the rest of
//! the crate never re-checks these fields.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::{
    domain::campaigns::{
        models::{Campaign, CampaignMembership},
        rules::{Comparison, Condition, Rule},
    },
    money::{Discount, DiscountDecodeError},
};

/// Campaign Record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub uuid: Uuid,
    pub name: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub active: bool,
    pub discount_type: String,
    pub discount_value: f64,
}

/// Rule Record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleRecord {
    pub uuid: Uuid,
    pub campaign_uuid: Uuid,
    pub category_uuid: Option<Uuid>,
    pub stock_op: Option<String>,
    pub stock_value: Option<i64>,
    pub price_op: Option<String>,
    pub price_value: Option<i64>,
    pub sold_op: Option<String>,
    pub sold_value: Option<i64>,
    pub discount_type: String,
    pub discount_value: f64,
}

/// Membership Record
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MembershipRecord {
    pub campaign_uuid: Uuid,
    pub product_uuid: Uuid,
}

/// Errors decoding campaign records into models.
#[derive(Debug, Error)]
pub enum RecordDecodeError {
    /// The campaign window ends before it starts.
    #[error("campaign {uuid} has an inverted time window")]
    InvertedWindow { uuid: Uuid },

    /// The record's discount columns could not be decoded.
    #[error("record {uuid} carries an unusable discount")]
    Discount {
        uuid: Uuid,
        #[source]
        source: DiscountDecodeError,
    },
}

impl TryFrom<CampaignRecord> for Campaign {
    type Error = RecordDecodeError;

    fn try_from(record: CampaignRecord) -> Result<Self, Self::Error> {
        if record.starts_at >= record.ends_at {
            return Err(RecordDecodeError::InvertedWindow { uuid: record.uuid });
        }

        let default_discount = Discount::decode(&record.discount_type, record.discount_value)
            .map_err(|source| RecordDecodeError::Discount {
                uuid: record.uuid,
                source,
            })?;

        Ok(Self {
            uuid: record.uuid.into(),
            name: record.name,
            starts_at: record.starts_at,
            ends_at: record.ends_at,
            active: record.active,
            default_discount,
        })
    }
}

impl TryFrom<RuleRecord> for Rule {
    type Error = RecordDecodeError;

    fn try_from(record: RuleRecord) -> Result<Self, Self::Error> {
        let discount = Discount::decode(&record.discount_type, record.discount_value)
            .map_err(|source| RecordDecodeError::Discount {
                uuid: record.uuid,
                source,
            })?;

        Ok(Self {
            uuid: record.uuid.into(),
            campaign: record.campaign_uuid.into(),
            category: record.category_uuid.map(Into::into),
            stock: decode_condition(record.uuid, "stock", record.stock_op.as_deref(), record.stock_value),
            price: decode_condition(record.uuid, "price", record.price_op.as_deref(), record.price_value),
            sold: decode_condition(record.uuid, "sold", record.sold_op.as_deref(), record.sold_value),
            discount,
        })
    }
}

impl From<MembershipRecord> for CampaignMembership {
    fn from(record: MembershipRecord) -> Self {
        Self {
            campaign: record.campaign_uuid.into(),
            product: record.product_uuid.into(),
        }
    }
}

/// Builds a condition from an optional operator/threshold column pair.
///
/// A half-set pair or an unrecognised operator symbol yields no condition,
/// which matches everything. The store has historically held such rows and
/// treats them as always-true, so tightening this would silently change
/// live prices; the decode is kept permissive and logged instead.
fn decode_condition(
    rule: Uuid,
    field: &str,
    op: Option<&str>,
    threshold: Option<i64>,
) -> Option<Condition> {
    let (symbol, threshold) = match (op, threshold) {
        (Some(symbol), Some(threshold)) => (symbol, threshold),
        (None, None) => return None,
        _ => {
            warn!(%rule, field, "half-set rule condition treated as always-true");
            return None;
        }
    };

    match Comparison::parse(symbol) {
        Some(op) => Some(Condition { op, threshold }),
        None => {
            warn!(%rule, field, symbol, "unknown rule operator treated as always-true");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::domain::catalog::models::{CategoryUuid, Product, ProductUuid};

    use super::*;

    fn campaign_record() -> CampaignRecord {
        CampaignRecord {
            uuid: Uuid::now_v7(),
            name: "Summer Flash".to_owned(),
            starts_at: Timestamp::UNIX_EPOCH,
            ends_at: Timestamp::UNIX_EPOCH + jiff::Span::new().hours(24),
            active: true,
            discount_type: "percent".to_owned(),
            discount_value: 20.0,
        }
    }

    fn rule_record() -> RuleRecord {
        RuleRecord {
            uuid: Uuid::now_v7(),
            campaign_uuid: Uuid::now_v7(),
            category_uuid: None,
            stock_op: None,
            stock_value: None,
            price_op: None,
            price_value: None,
            sold_op: None,
            sold_value: None,
            discount_type: "fixed".to_owned(),
            discount_value: 10_000.0,
        }
    }

    #[test]
    fn campaign_decodes() -> TestResult {
        let campaign = Campaign::try_from(campaign_record())?;

        assert_eq!(campaign.default_discount, Discount::percent(20));
        assert!(campaign.active);

        Ok(())
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut record = campaign_record();
        record.ends_at = record.starts_at;

        let result = Campaign::try_from(record);

        assert!(matches!(
            result,
            Err(RecordDecodeError::InvertedWindow { .. })
        ));
    }

    #[test]
    fn unknown_discount_type_is_rejected() {
        let mut record = campaign_record();
        record.discount_type = "mystery".to_owned();

        let result = Campaign::try_from(record);

        assert!(matches!(result, Err(RecordDecodeError::Discount { .. })));
    }

    #[test]
    fn rule_conditions_decode() -> TestResult {
        let mut record = rule_record();
        record.stock_op = Some("<".to_owned());
        record.stock_value = Some(10);

        let rule = Rule::try_from(record)?;

        assert_eq!(
            rule.stock,
            Some(Condition {
                op: Comparison::Lt,
                threshold: 10,
            })
        );
        assert_eq!(rule.price, None);

        Ok(())
    }

    #[test]
    fn unknown_operator_decodes_to_matching_rule() -> TestResult {
        let mut record = rule_record();
        record.stock_op = Some("~=".to_owned());
        record.stock_value = Some(10);

        let rule = Rule::try_from(record)?;

        // The permissive default: the condition drops out entirely.
        assert_eq!(rule.stock, None);

        let product = Product {
            uuid: ProductUuid::generate(),
            name: "Silk Scarf".to_owned(),
            price: 45_000,
            stock: 999,
            sold: 0,
            category: CategoryUuid::generate(),
            flat_discount_price: None,
            colors: vec![],
            sizes: vec![],
            images: vec![],
        };

        assert!(rule.matches(&product), "permissive rule must match");

        Ok(())
    }

    #[test]
    fn half_set_condition_is_dropped() -> TestResult {
        let mut record = rule_record();
        record.price_op = Some(">".to_owned());

        let rule = Rule::try_from(record)?;

        assert_eq!(rule.price, None);

        Ok(())
    }
}
