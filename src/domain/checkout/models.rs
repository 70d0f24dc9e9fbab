//! Checkout Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::carts::models::CartLine,
    domain::catalog::models::ProductUuid,
    domain::vouchers::models::VoucherUuid,
    money::Minor,
    session::UserUuid,
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;

/// Shipping method UUID
pub type ShippingMethodUuid = TypedUuid<ShippingMethod>;

/// A delivery address on file for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub uuid: AddressUuid,
    pub user: UserUuid,
    pub recipient: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

/// A shipping option with its flat price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub uuid: ShippingMethodUuid,
    pub name: String,
    /// Flat fee in minor units, waived above the free-shipping threshold.
    pub price: Minor,
}

/// How the order will be paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    CashOnDelivery,
    BankTransfer,
    Card,
}

/// Order lifecycle states. Orders leave this core as `Pending`; later
/// transitions belong to the administrative surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

/// A cart line frozen into an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: ProductUuid,
    pub name: String,
    pub unit_price: Minor,
    pub quantity: u32,
    pub color: String,
    pub size: String,
    pub image: Option<String>,
}

impl From<CartLine> for OrderLine {
    fn from(line: CartLine) -> Self {
        Self {
            product: line.product,
            name: line.name,
            unit_price: line.unit_price,
            quantity: line.quantity,
            color: line.color,
            size: line.size,
            image: line.image,
        }
    }
}

/// A placed order: an immutable snapshot of the cart and its totals at
/// submission time. This core creates it once and never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user: UserUuid,
    pub lines: Vec<OrderLine>,
    pub subtotal: Minor,
    pub discount: Minor,
    pub shipping_fee: Minor,
    pub total: Minor,
    pub address: Address,
    pub shipping_method: ShippingMethod,
    pub payment: PaymentMethod,
    /// Vouchers that contributed to `discount`.
    pub vouchers: Vec<VoucherUuid>,
    pub status: OrderStatus,
    pub placed_at: Timestamp,
}

/// What the user picked on the checkout page.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub address: AddressUuid,
    pub shipping_method: ShippingMethod,
    pub payment: PaymentMethod,
}
