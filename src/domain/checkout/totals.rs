//! Checkout totals.
//!
//! Pure arithmetic over amounts the services have already loaded.

use crate::{
    domain::carts::models::Cart,
    domain::checkout::models::ShippingMethod,
    domain::vouchers::models::AppliedVouchers,
    money::{Minor, PriceError},
};

/// The full payable breakdown shown on the checkout page and frozen into
/// the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutTotals {
    pub subtotal: Minor,
    pub discount: Minor,
    pub shipping_fee: Minor,
    pub total: Minor,
}

/// The shipping fee for an order: zero once the post-discount subtotal
/// reaches the free-shipping threshold, otherwise the method's flat price.
#[must_use]
pub fn shipping_fee(
    subtotal: Minor,
    discount: Minor,
    method: &ShippingMethod,
    free_threshold: Minor,
) -> Minor {
    if subtotal.saturating_sub(discount) >= free_threshold {
        0
    } else {
        method.price
    }
}

/// The payable total. Clamped at zero: a voucher worth more than the order
/// produces a free order, never a negative charge.
#[must_use]
pub fn grand_total(subtotal: Minor, discount: Minor, shipping_fee: Minor) -> Minor {
    subtotal
        .saturating_sub(discount)
        .saturating_add(shipping_fee)
        .max(0)
}

/// Computes the full breakdown for a cart, applied vouchers and a chosen
/// shipping method.
///
/// # Errors
///
/// Returns [`PriceError::Conversion`] when voucher percentage maths cannot
/// be represented in minor units.
pub fn totals(
    cart: &Cart,
    applied: &AppliedVouchers,
    method: &ShippingMethod,
    free_threshold: Minor,
) -> Result<CheckoutTotals, PriceError> {
    let subtotal = cart.subtotal;
    let discount = applied.total_discount(subtotal)?;
    let shipping_fee = shipping_fee(subtotal, discount, method, free_threshold);

    Ok(CheckoutTotals {
        subtotal,
        discount,
        shipping_fee,
        total: grand_total(subtotal, discount, shipping_fee),
    })
}
