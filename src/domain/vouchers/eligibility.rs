//! Voucher eligibility.
//!
//! A pure predicate: no clocks, no store access. Checks run in a fixed
//! order and the first failure names the reason, so the UI can tell the
//! user exactly why a code was refused instead of a generic "invalid".

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::carts::models::Cart,
    domain::catalog::models::{CategoryUuid, Product, ProductUuid},
    domain::vouchers::models::{Voucher, VoucherScope},
    money::Minor,
    session::UserUuid,
};

/// Why a voucher cannot be used right now.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Ineligibility {
    #[error("this voucher is no longer active")]
    Inactive,

    #[error("this voucher is not valid yet")]
    NotYetValid,

    #[error("this voucher has expired")]
    Expired,

    #[error("this voucher has been fully redeemed")]
    Exhausted,

    #[error("order must reach {required} to use this voucher")]
    BelowMinimum { required: Minor },

    #[error("this voucher belongs to another account")]
    NotPermitted,

    #[error("this voucher does not apply to anything in your cart")]
    NotApplicable,
}

/// Product categories looked up for scope checks, keyed off the cart's
/// product references.
pub trait CategoryLookup {
    /// The category of a product in the cart, when known.
    fn category_of(&self, product: &ProductUuid) -> Option<CategoryUuid>;
}

impl CategoryLookup for [Product] {
    fn category_of(&self, product: &ProductUuid) -> Option<CategoryUuid> {
        self.iter()
            .find(|p| &p.uuid == product)
            .map(|p| p.category)
    }
}

/// Checks every eligibility gate for one voucher, in order: active flag,
/// validity window, usage quota, minimum order value, owner restriction,
/// applicability scope.
///
/// # Errors
///
/// Returns the first failing [`Ineligibility`].
pub fn check(
    voucher: &Voucher,
    cart: &Cart,
    categories: &(impl CategoryLookup + ?Sized),
    now: Timestamp,
    user: UserUuid,
) -> Result<(), Ineligibility> {
    if !voucher.active {
        return Err(Ineligibility::Inactive);
    }

    if voucher.valid_from.is_some_and(|from| from > now) {
        return Err(Ineligibility::NotYetValid);
    }

    if voucher.valid_to.is_some_and(|to| to < now) {
        return Err(Ineligibility::Expired);
    }

    if voucher.used >= voucher.quantity {
        return Err(Ineligibility::Exhausted);
    }

    if let Some(required) = voucher.min_order_value
        && cart.subtotal < required
    {
        return Err(Ineligibility::BelowMinimum { required });
    }

    if voucher.user.is_some_and(|owner| owner != user) {
        return Err(Ineligibility::NotPermitted);
    }

    match &voucher.scope {
        VoucherScope::All => Ok(()),
        VoucherScope::Products(targets) => {
            if cart.lines.iter().any(|line| targets.contains(&line.product)) {
                Ok(())
            } else {
                Err(Ineligibility::NotApplicable)
            }
        }
        VoucherScope::Categories(targets) => {
            let applies = cart.lines.iter().any(|line| {
                categories
                    .category_of(&line.product)
                    .is_some_and(|category| targets.contains(&category))
            });

            if applies {
                Ok(())
            } else {
                Err(Ineligibility::NotApplicable)
            }
        }
    }
}

/// Filters a voucher list down to those usable against the cart right now.
#[must_use]
pub fn eligible<'a>(
    vouchers: &'a [Voucher],
    cart: &Cart,
    categories: &(impl CategoryLookup + ?Sized),
    now: Timestamp,
    user: UserUuid,
) -> Vec<&'a Voucher> {
    vouchers
        .iter()
        .filter(|voucher| check(voucher, cart, categories, now, user).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{
        domain::carts::models::{CartLine, CartLineUuid},
        domain::catalog::models::ProductUuid,
        domain::vouchers::models::VoucherUuid,
        money::Discount,
    };

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap_or_default()
    }

    fn voucher() -> Voucher {
        Voucher {
            uuid: VoucherUuid::generate(),
            code: "flash50".to_owned(),
            discount: Discount::percent(50),
            max_discount: None,
            min_order_value: None,
            quantity: 10,
            used: 0,
            valid_from: None,
            valid_to: None,
            scope: VoucherScope::All,
            user: None,
            active: true,
        }
    }

    fn cart_with(product: ProductUuid, unit_price: i64, quantity: u32) -> Cart {
        Cart::from_lines(vec![CartLine {
            uuid: CartLineUuid::generate(),
            user: UserUuid::generate(),
            product,
            name: "Trench Coat".to_owned(),
            unit_price,
            image: None,
            quantity,
            color: "beige".to_owned(),
            size: "m".to_owned(),
        }])
    }

    fn catalog(product: ProductUuid, category: CategoryUuid) -> Vec<Product> {
        vec![Product {
            uuid: product,
            name: "Trench Coat".to_owned(),
            price: 100_000,
            stock: 5,
            sold: 0,
            category,
            flat_discount_price: None,
            colors: vec![],
            sizes: vec![],
            images: vec![],
        }]
    }

    #[test]
    fn open_ended_voucher_passes() {
        let product = ProductUuid::generate();
        let cart = cart_with(product, 100_000, 1);
        let products: Vec<Product> = vec![];

        let result = check(
            &voucher(),
            &cart,
            products.as_slice(),
            ts("2026-08-27T00:00:00Z"),
            UserUuid::generate(),
        );

        assert_eq!(result, Ok(()));
    }

    #[test]
    fn minimum_order_boundary_is_inclusive() {
        let product = ProductUuid::generate();
        let products: Vec<Product> = vec![];
        let user = UserUuid::generate();
        let now = ts("2026-08-27T00:00:00Z");

        let mut v = voucher();
        v.min_order_value = Some(500_000);

        let below = cart_with(product, 499_999, 1);
        let at = cart_with(product, 500_000, 1);

        assert_eq!(
            check(&v, &below, products.as_slice(), now, user),
            Err(Ineligibility::BelowMinimum { required: 500_000 })
        );
        assert_eq!(check(&v, &at, products.as_slice(), now, user), Ok(()));
    }

    #[test]
    fn validity_window_failures_are_distinct() {
        let product = ProductUuid::generate();
        let cart = cart_with(product, 100_000, 1);
        let products: Vec<Product> = vec![];
        let user = UserUuid::generate();

        let mut early = voucher();
        early.valid_from = Some(ts("2026-09-01T00:00:00Z"));

        let mut late = voucher();
        late.valid_to = Some(ts("2026-08-01T00:00:00Z"));

        let now = ts("2026-08-27T00:00:00Z");

        assert_eq!(
            check(&early, &cart, products.as_slice(), now, user),
            Err(Ineligibility::NotYetValid)
        );
        assert_eq!(
            check(&late, &cart, products.as_slice(), now, user),
            Err(Ineligibility::Expired)
        );
    }

    #[test]
    fn quota_exhaustion_blocks() {
        let product = ProductUuid::generate();
        let cart = cart_with(product, 100_000, 1);
        let products: Vec<Product> = vec![];

        let mut v = voucher();
        v.quantity = 5;
        v.used = 5;

        let result = check(
            &v,
            &cart,
            products.as_slice(),
            ts("2026-08-27T00:00:00Z"),
            UserUuid::generate(),
        );

        assert_eq!(result, Err(Ineligibility::Exhausted));
    }

    #[test]
    fn owner_restriction_blocks_other_users() {
        let product = ProductUuid::generate();
        let cart = cart_with(product, 100_000, 1);
        let products: Vec<Product> = vec![];
        let owner = UserUuid::generate();
        let now = ts("2026-08-27T00:00:00Z");

        let mut v = voucher();
        v.user = Some(owner);

        assert_eq!(
            check(&v, &cart, products.as_slice(), now, UserUuid::generate()),
            Err(Ineligibility::NotPermitted)
        );
        assert_eq!(check(&v, &cart, products.as_slice(), now, owner), Ok(()));
    }

    #[test]
    fn product_scope_needs_a_listed_product_in_cart() {
        let listed = ProductUuid::generate();
        let other = ProductUuid::generate();
        let products: Vec<Product> = vec![];
        let user = UserUuid::generate();
        let now = ts("2026-08-27T00:00:00Z");

        let mut v = voucher();
        v.scope = VoucherScope::Products(vec![listed]);

        assert_eq!(
            check(&v, &cart_with(listed, 100_000, 1), products.as_slice(), now, user),
            Ok(())
        );
        assert_eq!(
            check(&v, &cart_with(other, 100_000, 1), products.as_slice(), now, user),
            Err(Ineligibility::NotApplicable)
        );
    }

    #[test]
    fn category_scope_resolves_through_the_catalog() {
        let product = ProductUuid::generate();
        let outerwear = CategoryUuid::generate();
        let knitwear = CategoryUuid::generate();
        let user = UserUuid::generate();
        let now = ts("2026-08-27T00:00:00Z");
        let cart = cart_with(product, 100_000, 1);
        let products = catalog(product, outerwear);

        let mut v = voucher();
        v.scope = VoucherScope::Categories(vec![outerwear]);

        assert_eq!(check(&v, &cart, products.as_slice(), now, user), Ok(()));

        v.scope = VoucherScope::Categories(vec![knitwear]);

        assert_eq!(
            check(&v, &cart, products.as_slice(), now, user),
            Err(Ineligibility::NotApplicable)
        );
    }

    #[test]
    fn eligible_filters_a_mixed_list() {
        let product = ProductUuid::generate();
        let cart = cart_with(product, 100_000, 1);
        let products: Vec<Product> = vec![];
        let user = UserUuid::generate();
        let now = ts("2026-08-27T00:00:00Z");

        let good = voucher();

        let mut spent = voucher();
        spent.used = spent.quantity;

        let list = vec![good.clone(), spent];

        let usable = eligible(&list, &cart, products.as_slice(), now, user);

        assert_eq!(usable.len(), 1);
        assert_eq!(usable.first().map(|v| v.uuid), Some(good.uuid));
    }
}
