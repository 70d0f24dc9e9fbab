//! Campaigns service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::warn;

use crate::{
    domain::campaigns::{
        errors::CampaignsServiceError,
        models::{Campaign, CampaignUuid, SaleItem},
        records::{CampaignRecord, RuleRecord},
        rules::{Rule, match_rule},
        schedule,
    },
    domain::catalog::{models::Product, repository::ProductsRepository},
    money::resolve_price,
    store::{RetryPolicy, StoreError, retry_read},
};

use super::repository::CampaignsRepository;

/// Campaign reads and sale-price resolution over the external store.
///
/// Malformed admin records (bad discount columns, inverted windows) are
/// skipped with a warning rather than failing the whole sale surface; the
/// permissive operator decode is handled further down, in the record layer.
#[derive(Clone)]
pub struct StoreCampaignsService {
    campaigns: Arc<dyn CampaignsRepository>,
    products: Arc<dyn ProductsRepository>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for StoreCampaignsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCampaignsService")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl StoreCampaignsService {
    #[must_use]
    pub fn new(
        campaigns: Arc<dyn CampaignsRepository>,
        products: Arc<dyn ProductsRepository>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            campaigns,
            products,
            retry,
        }
    }

    /// Decodes a campaign record, logging and discarding malformed ones.
    fn decode_campaign(record: CampaignRecord) -> Option<Campaign> {
        let uuid = record.uuid;

        match Campaign::try_from(record) {
            Ok(campaign) => Some(campaign),
            Err(error) => {
                warn!(campaign = %uuid, %error, "skipping malformed campaign record");
                None
            }
        }
    }

    /// Decodes rule records preserving their stored order.
    fn decode_rules(records: Vec<RuleRecord>) -> Vec<Rule> {
        records
            .into_iter()
            .filter_map(|record| {
                let uuid = record.uuid;

                match Rule::try_from(record) {
                    Ok(rule) => Some(rule),
                    Err(error) => {
                        warn!(rule = %uuid, %error, "skipping malformed rule record");
                        None
                    }
                }
            })
            .collect()
    }

    /// Resolves one member product's sale price under a campaign.
    fn price_member(
        campaign: &Campaign,
        rules: &[Rule],
        product: Product,
    ) -> Result<SaleItem, CampaignsServiceError> {
        let discount = match_rule(rules, campaign.uuid, &product)
            .map_or(&campaign.default_discount, |rule| &rule.discount);

        let sale_price = resolve_price(product.price, discount)?;

        Ok(SaleItem {
            product,
            campaign: campaign.uuid,
            sale_price,
        })
    }
}

#[async_trait]
impl CampaignsService for StoreCampaignsService {
    #[tracing::instrument(name = "campaigns.service.active_campaigns", skip(self), err)]
    async fn active_campaigns(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Campaign>, CampaignsServiceError> {
        let records = retry_read(self.retry, || self.campaigns.campaigns()).await?;

        Ok(records
            .into_iter()
            .filter_map(Self::decode_campaign)
            .filter(|campaign| schedule::is_active(campaign, now))
            .collect())
    }

    #[tracing::instrument(name = "campaigns.service.sale_items", skip(self), err)]
    async fn sale_items(&self, now: Timestamp) -> Result<Vec<SaleItem>, CampaignsServiceError> {
        let campaigns = self.active_campaigns(now).await?;

        let mut items = Vec::new();

        for campaign in campaigns {
            let rules = retry_read(self.retry, || self.campaigns.rules(campaign.uuid)).await?;
            let rules = Self::decode_rules(rules);

            let memberships =
                retry_read(self.retry, || self.campaigns.memberships(campaign.uuid)).await?;

            for membership in memberships {
                let product = match self.products.product(membership.product_uuid.into()).await {
                    Ok(product) => product,
                    Err(StoreError::NotFound) => {
                        warn!(
                            product = %membership.product_uuid,
                            campaign = %campaign.uuid,
                            "campaign member no longer in catalog; skipping"
                        );
                        continue;
                    }
                    Err(error) => return Err(error.into()),
                };

                items.push(Self::price_member(&campaign, &rules, product)?);
            }
        }

        Ok(items)
    }

    #[tracing::instrument(
        name = "campaigns.service.sale_price",
        skip(self, product),
        fields(product = %product.uuid),
        err
    )]
    async fn sale_price(
        &self,
        product: &Product,
        now: Timestamp,
    ) -> Result<Option<SaleItem>, CampaignsServiceError> {
        let memberships = retry_read(self.retry, || {
            self.campaigns.memberships_for_product(product.uuid)
        })
        .await?;

        for membership in memberships {
            let campaign_uuid: CampaignUuid = membership.campaign_uuid.into();

            let record = match self.campaigns.campaign(campaign_uuid).await {
                Ok(record) => record,
                Err(StoreError::NotFound) => continue,
                Err(error) => return Err(error.into()),
            };

            let Some(campaign) = Self::decode_campaign(record) else {
                continue;
            };

            if !schedule::is_active(&campaign, now) {
                continue;
            }

            let rules = retry_read(self.retry, || self.campaigns.rules(campaign.uuid)).await?;
            let rules = Self::decode_rules(rules);

            let item = Self::price_member(&campaign, &rules, product.clone())?;

            return Ok(Some(item));
        }

        Ok(None)
    }
}

#[automock]
#[async_trait]
pub trait CampaignsService: Send + Sync {
    /// The campaigns applying at `now`: active flag set and window open.
    async fn active_campaigns(
        &self,
        now: Timestamp,
    ) -> Result<Vec<Campaign>, CampaignsServiceError>;

    /// Every member of every active campaign with its resolved sale price.
    async fn sale_items(&self, now: Timestamp) -> Result<Vec<SaleItem>, CampaignsServiceError>;

    /// The sale price for one product under the first active campaign it
    /// belongs to, or `None` when no active campaign covers it. Callers
    /// fall back to [`Product::effective_base_price`].
    async fn sale_price(
        &self,
        product: &Product,
        now: Timestamp,
    ) -> Result<Option<SaleItem>, CampaignsServiceError>;
}
