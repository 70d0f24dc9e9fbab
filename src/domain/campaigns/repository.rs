//! Campaigns repository.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::campaigns::{
        models::CampaignUuid,
        records::{CampaignRecord, MembershipRecord, RuleRecord},
    },
    domain::catalog::models::ProductUuid,
    store::StoreError,
};

/// Read access to the `flashsale`, `flashsale_rules` and
/// `flashsale_products` collections.
#[automock]
#[async_trait]
pub trait CampaignsRepository: Send + Sync {
    /// Fetch every campaign.
    async fn campaigns(&self) -> Result<Vec<CampaignRecord>, StoreError>;

    /// Fetch one campaign.
    async fn campaign(&self, uuid: CampaignUuid) -> Result<CampaignRecord, StoreError>;

    /// Fetch a campaign's rules, in their stored order. That order is the
    /// matching order.
    async fn rules(&self, campaign: CampaignUuid) -> Result<Vec<RuleRecord>, StoreError>;

    /// Fetch a campaign's product memberships.
    async fn memberships(&self, campaign: CampaignUuid)
    -> Result<Vec<MembershipRecord>, StoreError>;

    /// Fetch the memberships naming one product.
    async fn memberships_for_product(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<MembershipRecord>, StoreError>;
}
