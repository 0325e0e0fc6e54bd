use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::Identity;
use crate::errors::{AppError, AppResult};
use crate::models::reviews;
use crate::rating::{RatingSummary, RatingView};
use crate::review_flow::{ReviewSession, ReviewState};
use crate::state::AppState;

/// A provider's reviews, newest first, with their aggregate.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewList {
    pub reviews: Vec<reviews::Model>,
    pub rating: RatingView,
}

impl ReviewList {
    pub fn new(reviews: Vec<reviews::Model>) -> Self {
        let rating = RatingSummary::from_reviews(&reviews).into();
        Self { reviews, rating }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedReview {
    pub state: ReviewState,
    #[serde(flatten)]
    pub list: ReviewList,
}

pub async fn list(state: &AppState, provider_id: Uuid) -> AppResult<ReviewList> {
    let reviews = state.reviews.list_by_provider(provider_id).await?;
    Ok(ReviewList::new(reviews))
}

/// Drive `session` through one submission: insert, refetch, re-aggregate.
///
/// Preconditions are checked by the session before anything is written, so an
/// anonymous or self-reviewing viewer never causes a store call.
pub async fn submit(state: &AppState, session: &mut ReviewSession) -> AppResult<SubmittedReview> {
    let provider_id = session.provider_id();
    let payload = session.begin_submit()?;

    let reviewer = payload.user_id;
    let inserted = async {
        if state.providers.find_by_owner(provider_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Provider {provider_id} not found")));
        }
        Ok::<_, AppError>(state.reviews.insert(payload).await?)
    }
    .await;

    // The review exists once inserted. A failed refetch still completes the submission.
    let outcome = match inserted {
        Ok(created) => {
            info!(review_id = %created.id, %provider_id, %reviewer, "Review submitted");
            match state.reviews.list_by_provider(provider_id).await {
                Ok(refreshed) => Ok(refreshed),
                Err(e) => {
                    warn!(%provider_id, "Refetching reviews failed, using the cached list: {e}");
                    let mut reviews = Vec::with_capacity(session.reviews().len() + 1);
                    reviews.push(created);
                    reviews.extend_from_slice(session.reviews());
                    Ok(reviews)
                }
            }
        }
        Err(e) => {
            warn!(%provider_id, %reviewer, "Review submission failed: {e}");
            Err(e)
        }
    };

    session.complete(outcome)?;

    Ok(SubmittedReview {
        state: session.state(),
        list: ReviewList {
            reviews: session.reviews().to_vec(),
            rating: session.summary().into(),
        },
    })
}

/// Submit a review from a request body on behalf of `viewer`.
pub async fn submit_for(
    state: &AppState,
    viewer: Option<Identity>,
    provider_id: Uuid,
    rating: i32,
    comment: String,
) -> AppResult<SubmittedReview> {
    let mut session = ReviewSession::open(viewer, provider_id);
    session.set_rating(rating);
    session.set_comment(comment);
    submit(state, &mut session).await
}

/// Delete a review from the provider's dashboard. Only the reviewed provider may do this.
pub async fn delete(state: &AppState, identity: &Identity, review_id: Uuid) -> AppResult<ReviewList> {
    let review = state
        .reviews
        .find(review_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {review_id} not found")))?;

    if review.provider_id != identity.id {
        return Err(AppError::Forbidden(
            "You can only delete reviews on your own profile".to_string(),
        ));
    }

    if !state.reviews.delete(review_id).await? {
        return Err(AppError::NotFound(format!("Review {review_id} not found")));
    }
    info!(%review_id, provider_id = %identity.id, "Review deleted");

    list(state, identity.id).await
}
