//! In-memory store.
//!
//! Backs every repository trait with plain maps behind one lock. Used by
//! the test suites and demos in place of the hosted store; behavior is
//! last-write-wins, like the real one.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::{
    domain::campaigns::{
        models::CampaignUuid,
        records::{CampaignRecord, MembershipRecord, RuleRecord},
        repository::CampaignsRepository,
    },
    domain::carts::{
        models::{CartLine, CartLineUuid},
        repository::CartLinesRepository,
    },
    domain::catalog::{
        models::{Category, CategoryUuid, Product, ProductUuid},
        repository::ProductsRepository,
    },
    domain::checkout::{
        models::{Address, Order},
        repository::{AddressesRepository, OrdersRepository},
    },
    domain::reviews::{models::Review, repository::ReviewsRepository},
    domain::vouchers::{
        models::{VoucherUuid, normalize_code},
        records::VoucherRecord,
        repository::VouchersRepository,
    },
    session::UserUuid,
    store::StoreError,
};

#[derive(Default)]
struct Collections {
    products: FxHashMap<ProductUuid, Product>,
    categories: FxHashMap<CategoryUuid, Category>,
    campaigns: FxHashMap<Uuid, CampaignRecord>,
    /// Stored order is matching order.
    rules: Vec<RuleRecord>,
    memberships: Vec<MembershipRecord>,
    cart_lines: Vec<CartLine>,
    vouchers: FxHashMap<Uuid, VoucherRecord>,
    orders: Vec<Order>,
    addresses: Vec<Address>,
    reviews: Vec<Review>,
}

/// In-memory implementation of every repository trait.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn put_product(&self, product: Product) {
        self.write().products.insert(product.uuid, product);
    }

    pub fn put_category(&self, category: Category) {
        self.write().categories.insert(category.uuid, category);
    }

    pub fn put_campaign(&self, campaign: CampaignRecord) {
        self.write().campaigns.insert(campaign.uuid, campaign);
    }

    /// Appends a rule; insertion order is the matching order.
    pub fn put_rule(&self, rule: RuleRecord) {
        self.write().rules.push(rule);
    }

    pub fn put_membership(&self, membership: MembershipRecord) {
        self.write().memberships.push(membership);
    }

    pub fn put_voucher(&self, voucher: VoucherRecord) {
        self.write().vouchers.insert(voucher.uuid, voucher);
    }

    pub fn put_address(&self, address: Address) {
        self.write().addresses.push(address);
    }
}

#[async_trait]
impl ProductsRepository for MemoryStore {
    async fn product(&self, uuid: ProductUuid) -> Result<Product, StoreError> {
        self.read()
            .products
            .get(&uuid)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn products(&self) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<_> = self.read().products.values().cloned().collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(products)
    }

    async fn products_in_category(
        &self,
        category: CategoryUuid,
    ) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<_> = self
            .read()
            .products
            .values()
            .filter(|product| product.category == category)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(products)
    }

    async fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut categories: Vec<_> = self.read().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(categories)
    }
}

#[async_trait]
impl CampaignsRepository for MemoryStore {
    async fn campaigns(&self) -> Result<Vec<CampaignRecord>, StoreError> {
        let mut campaigns: Vec<_> = self.read().campaigns.values().cloned().collect();
        campaigns.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));

        Ok(campaigns)
    }

    async fn campaign(&self, uuid: CampaignUuid) -> Result<CampaignRecord, StoreError> {
        self.read()
            .campaigns
            .get(&uuid.into_uuid())
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn rules(&self, campaign: CampaignUuid) -> Result<Vec<RuleRecord>, StoreError> {
        Ok(self
            .read()
            .rules
            .iter()
            .filter(|rule| rule.campaign_uuid == campaign.into_uuid())
            .cloned()
            .collect())
    }

    async fn memberships(
        &self,
        campaign: CampaignUuid,
    ) -> Result<Vec<MembershipRecord>, StoreError> {
        Ok(self
            .read()
            .memberships
            .iter()
            .filter(|membership| membership.campaign_uuid == campaign.into_uuid())
            .copied()
            .collect())
    }

    async fn memberships_for_product(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<MembershipRecord>, StoreError> {
        Ok(self
            .read()
            .memberships
            .iter()
            .filter(|membership| membership.product_uuid == product.into_uuid())
            .copied()
            .collect())
    }
}

#[async_trait]
impl CartLinesRepository for MemoryStore {
    async fn lines(&self, user: UserUuid) -> Result<Vec<CartLine>, StoreError> {
        Ok(self
            .read()
            .cart_lines
            .iter()
            .filter(|line| line.user == user)
            .cloned()
            .collect())
    }

    async fn insert(&self, line: CartLine) -> Result<(), StoreError> {
        self.write().cart_lines.push(line);

        Ok(())
    }

    async fn set_quantity(
        &self,
        user: UserUuid,
        line: CartLineUuid,
        quantity: u32,
    ) -> Result<(), StoreError> {
        let mut inner = self.write();

        let found = inner
            .cart_lines
            .iter_mut()
            .find(|candidate| candidate.user == user && candidate.uuid == line)
            .ok_or(StoreError::NotFound)?;

        found.quantity = quantity;

        Ok(())
    }

    async fn delete(&self, user: UserUuid, line: CartLineUuid) -> Result<(), StoreError> {
        self.write()
            .cart_lines
            .retain(|candidate| !(candidate.user == user && candidate.uuid == line));

        Ok(())
    }

    async fn clear(&self, user: UserUuid) -> Result<(), StoreError> {
        self.write().cart_lines.retain(|line| line.user != user);

        Ok(())
    }
}

#[async_trait]
impl VouchersRepository for MemoryStore {
    async fn vouchers(&self) -> Result<Vec<VoucherRecord>, StoreError> {
        let mut vouchers: Vec<_> = self.read().vouchers.values().cloned().collect();
        vouchers.sort_by(|a, b| a.code.cmp(&b.code));

        Ok(vouchers)
    }

    async fn voucher_by_code(&self, code: &str) -> Result<Option<VoucherRecord>, StoreError> {
        Ok(self
            .read()
            .vouchers
            .values()
            .find(|voucher| normalize_code(&voucher.code) == code)
            .cloned())
    }

    async fn increment_used(&self, voucher: VoucherUuid) -> Result<(), StoreError> {
        let mut inner = self.write();

        let found = inner
            .vouchers
            .get_mut(&voucher.into_uuid())
            .ok_or(StoreError::NotFound)?;

        found.used += 1;

        Ok(())
    }
}

#[async_trait]
impl OrdersRepository for MemoryStore {
    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        self.write().orders.push(order);

        Ok(())
    }

    async fn orders(&self, user: UserUuid) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<_> = self
            .read()
            .orders
            .iter()
            .filter(|order| order.user == user)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));

        Ok(orders)
    }
}

#[async_trait]
impl AddressesRepository for MemoryStore {
    async fn addresses(&self, user: UserUuid) -> Result<Vec<Address>, StoreError> {
        Ok(self
            .read()
            .addresses
            .iter()
            .filter(|address| address.user == user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReviewsRepository for MemoryStore {
    async fn reviews(&self, product: ProductUuid) -> Result<Vec<Review>, StoreError> {
        let mut reviews: Vec<_> = self
            .read()
            .reviews
            .iter()
            .filter(|review| review.product == product)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(reviews)
    }

    async fn insert(&self, review: Review) -> Result<(), StoreError> {
        self.write().reviews.push(review);

        Ok(())
    }
}
