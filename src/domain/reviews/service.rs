//! Reviews service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    domain::catalog::{models::ProductUuid, repository::ProductsRepository},
    domain::reviews::{
        errors::ReviewsServiceError,
        models::{MAX_RATING, MIN_RATING, NewReview, Review, ReviewUuid, average_rating},
        repository::ReviewsRepository,
    },
    session::Session,
    store::{RetryPolicy, StoreError, retry_read},
};

#[derive(Clone)]
pub struct StoreReviewsService {
    reviews: Arc<dyn ReviewsRepository>,
    products: Arc<dyn ProductsRepository>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for StoreReviewsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreReviewsService")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl StoreReviewsService {
    #[must_use]
    pub fn new(
        reviews: Arc<dyn ReviewsRepository>,
        products: Arc<dyn ProductsRepository>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            reviews,
            products,
            retry,
        }
    }
}

#[async_trait]
impl ReviewsService for StoreReviewsService {
    #[tracing::instrument(
        name = "reviews.service.submit",
        skip(self, session, review),
        fields(user = %session.user, product = %review.product),
        err
    )]
    async fn submit(
        &self,
        session: &Session,
        now: Timestamp,
        review: NewReview,
    ) -> Result<Review, ReviewsServiceError> {
        if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
            return Err(ReviewsServiceError::RatingOutOfRange);
        }

        let body = review.body.trim();

        if body.is_empty() {
            return Err(ReviewsServiceError::EmptyBody);
        }

        self.products
            .product(review.product)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => ReviewsServiceError::ProductNotFound,
                other => ReviewsServiceError::Store(other),
            })?;

        let review = Review {
            uuid: ReviewUuid::generate(),
            product: review.product,
            author: session.user,
            rating: review.rating,
            body: body.to_owned(),
            created_at: now,
        };

        self.reviews.insert(review.clone()).await?;

        Ok(review)
    }

    #[tracing::instrument(name = "reviews.service.product_reviews", skip(self), err)]
    async fn product_reviews(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<Review>, ReviewsServiceError> {
        let reviews = retry_read(self.retry, || self.reviews.reviews(product)).await?;

        Ok(reviews)
    }

    #[tracing::instrument(name = "reviews.service.rating", skip(self), err)]
    async fn rating(&self, product: ProductUuid) -> Result<Option<f64>, ReviewsServiceError> {
        let reviews = self.product_reviews(product).await?;

        Ok(average_rating(&reviews))
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// Submit a review for a product.
    async fn submit(
        &self,
        session: &Session,
        now: Timestamp,
        review: NewReview,
    ) -> Result<Review, ReviewsServiceError>;

    /// A product's reviews, newest first.
    async fn product_reviews(
        &self,
        product: ProductUuid,
    ) -> Result<Vec<Review>, ReviewsServiceError>;

    /// Mean star rating for a product, if it has any reviews.
    async fn rating(&self, product: ProductUuid) -> Result<Option<f64>, ReviewsServiceError>;
}
