//! Review Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    domain::catalog::models::ProductUuid,
    session::UserUuid,
    uuids::TypedUuid,
};

/// Review UUID
pub type ReviewUuid = TypedUuid<Review>;

/// Ratings run 1 to 5 stars inclusive.
pub const MIN_RATING: u8 = 1;
/// Ratings run 1 to 5 stars inclusive.
pub const MAX_RATING: u8 = 5;

/// Review Model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub uuid: ReviewUuid,
    pub product: ProductUuid,
    pub author: UserUuid,
    pub rating: u8,
    pub body: String,
    pub created_at: Timestamp,
}

/// A review being submitted.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub product: ProductUuid,
    pub rating: u8,
    pub body: String,
}

/// Mean rating across reviews, or `None` with no reviews.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }

    let sum: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();

    #[expect(clippy::cast_precision_loss, reason = "review counts stay tiny")]
    let count = reviews.len() as f64;

    Some(f64::from(sum) / count)
}
