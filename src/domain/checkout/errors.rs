//! Checkout service errors.

use thiserror::Error;

use crate::{
    domain::catalog::models::ProductUuid,
    money::PriceError,
    store::StoreError,
};

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line's product is gone or out of stock at confirm time.
    #[error("product {product} is no longer available")]
    ProductUnavailable { product: ProductUuid },

    /// A cart line asks for more than is left at confirm time.
    #[error("only {available} of product {product} left in stock")]
    InsufficientStock { product: ProductUuid, available: u32 },

    #[error("address not found")]
    AddressNotFound,

    #[error("price calculation failed")]
    Price(#[from] PriceError),

    #[error("storage error")]
    Store(#[from] StoreError),
}
