//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::warn;

use crate::{
    domain::carts::{models::Cart, repository::CartLinesRepository},
    domain::catalog::repository::ProductsRepository,
    domain::checkout::{
        errors::CheckoutServiceError,
        models::{CheckoutRequest, Order, OrderStatus, OrderUuid, ShippingMethod},
        repository::{AddressesRepository, OrdersRepository},
        totals::{self, CheckoutTotals},
    },
    domain::vouchers::{models::AppliedVouchers, service::VouchersService},
    money::Minor,
    session::Session,
    store::StoreError,
};

pub struct StoreCheckoutService {
    lines: Arc<dyn CartLinesRepository>,
    products: Arc<dyn ProductsRepository>,
    addresses: Arc<dyn AddressesRepository>,
    orders: Arc<dyn OrdersRepository>,
    vouchers: Arc<dyn VouchersService>,
    free_shipping_threshold: Minor,
}

impl std::fmt::Debug for StoreCheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCheckoutService")
            .field("free_shipping_threshold", &self.free_shipping_threshold)
            .finish_non_exhaustive()
    }
}

impl StoreCheckoutService {
    #[must_use]
    pub fn new(
        lines: Arc<dyn CartLinesRepository>,
        products: Arc<dyn ProductsRepository>,
        addresses: Arc<dyn AddressesRepository>,
        orders: Arc<dyn OrdersRepository>,
        vouchers: Arc<dyn VouchersService>,
        free_shipping_threshold: Minor,
    ) -> Self {
        Self {
            lines,
            products,
            addresses,
            orders,
            vouchers,
            free_shipping_threshold,
        }
    }

    async fn authoritative_cart(&self, session: &Session) -> Result<Cart, CheckoutServiceError> {
        let lines = self.lines.lines(session.user).await?;

        Ok(Cart::from_lines(lines))
    }

    /// Re-validates every line against live stock. A line that passed when
    /// it was added can still fail here after someone else bought the rest.
    async fn verify_stock(&self, cart: &Cart) -> Result<(), CheckoutServiceError> {
        for line in &cart.lines {
            let product = match self.products.product(line.product).await {
                Ok(product) => product,
                Err(StoreError::NotFound) => {
                    return Err(CheckoutServiceError::ProductUnavailable {
                        product: line.product,
                    });
                }
                Err(error) => return Err(error.into()),
            };

            if product.sold_out() {
                return Err(CheckoutServiceError::ProductUnavailable {
                    product: line.product,
                });
            }

            if line.quantity > product.stock {
                return Err(CheckoutServiceError::InsufficientStock {
                    product: line.product,
                    available: product.stock,
                });
            }
        }

        Ok(())
    }
}

#[async_trait]
impl CheckoutService for StoreCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.totals",
        skip(self, session, applied, method),
        fields(user = %session.user),
        err
    )]
    async fn totals(
        &self,
        session: &Session,
        applied: &AppliedVouchers,
        method: &ShippingMethod,
    ) -> Result<CheckoutTotals, CheckoutServiceError> {
        let cart = self.authoritative_cart(session).await?;

        Ok(totals::totals(
            &cart,
            applied,
            method,
            self.free_shipping_threshold,
        )?)
    }

    #[tracing::instrument(
        name = "checkout.service.submit_order",
        skip(self, session, applied, checkout),
        fields(user = %session.user, order_uuid = tracing::field::Empty),
        err
    )]
    async fn submit_order(
        &self,
        session: &Session,
        applied: &AppliedVouchers,
        checkout: CheckoutRequest,
        now: Timestamp,
    ) -> Result<Order, CheckoutServiceError> {
        let cart = self.authoritative_cart(session).await?;

        if cart.is_empty() {
            return Err(CheckoutServiceError::EmptyCart);
        }

        self.verify_stock(&cart).await?;

        let address = self
            .addresses
            .addresses(session.user)
            .await?
            .into_iter()
            .find(|address| address.uuid == checkout.address)
            .ok_or(CheckoutServiceError::AddressNotFound)?;

        let breakdown = totals::totals(
            &cart,
            applied,
            &checkout.shipping_method,
            self.free_shipping_threshold,
        )?;

        let order = Order {
            uuid: OrderUuid::generate(),
            user: session.user,
            lines: cart.lines.into_iter().map(Into::into).collect(),
            subtotal: breakdown.subtotal,
            discount: breakdown.discount,
            shipping_fee: breakdown.shipping_fee,
            total: breakdown.total,
            address,
            shipping_method: checkout.shipping_method,
            payment: checkout.payment,
            vouchers: applied.vouchers().iter().map(|v| v.uuid).collect(),
            status: OrderStatus::Pending,
            placed_at: now,
        };

        tracing::Span::current().record("order_uuid", tracing::field::display(order.uuid));

        self.orders.insert(order.clone()).await?;

        // Redemption bookkeeping is best-effort: the order already exists,
        // and the store offers no transaction spanning both collections. A
        // failure leaves the voucher under-counted, which we log and accept.
        for voucher in applied.vouchers() {
            if let Err(error) = self.vouchers.record_redemption(voucher.uuid).await {
                warn!(
                    order = %order.uuid,
                    voucher = %voucher.uuid,
                    %error,
                    "voucher redemption not recorded for placed order"
                );
            }
        }

        // Same liveness choice as cart clear: the order is placed, a stale
        // cart row must not fail the checkout.
        if let Err(error) = self.lines.clear(session.user).await {
            warn!(order = %order.uuid, %error, "cart not cleared after order");
        }

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// The payable breakdown for the user's current cart.
    async fn totals(
        &self,
        session: &Session,
        applied: &AppliedVouchers,
        method: &ShippingMethod,
    ) -> Result<CheckoutTotals, CheckoutServiceError>;

    /// Validates the cart against live stock and the chosen address, then
    /// persists a `Pending` order snapshotting lines, totals, and methods.
    async fn submit_order(
        &self,
        session: &Session,
        applied: &AppliedVouchers,
        checkout: CheckoutRequest,
        now: Timestamp,
    ) -> Result<Order, CheckoutServiceError>;
}
