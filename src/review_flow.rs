//! Lifecycle of a review left on a provider's public profile.
//!
//! ```text
//! Anonymous ──sign in──▶ Authenticated ──submit──▶ Submitting ──ok──▶ Submitted
//!                             ▲                        │
//!                             └────────── error ───────┘
//! OwnViewBlocked (viewer owns the profile, terminal)
//! ```

use serde::Serialize;
use uuid::Uuid;

use crate::auth::Identity;
use crate::errors::{AppError, AppResult};
use crate::models::reviews::{self, CreateReview};
use crate::rating::RatingSummary;

pub const DEFAULT_RATING: i32 = 5;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    Anonymous,
    Authenticated,
    OwnViewBlocked,
    Submitting,
    Submitted,
}

/// What the review form currently holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: i32,
    pub comment: String,
}

impl Default for ReviewDraft {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            comment: String::new(),
        }
    }
}

impl ReviewDraft {
    fn validate(&self) -> AppResult<()> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(AppError::validation(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}, got {}",
                self.rating
            )));
        }
        if self.comment.trim().is_empty() {
            return Err(AppError::validation("Comment is required"));
        }
        Ok(())
    }
}

/// One viewer's review form on one provider's profile.
#[derive(Debug)]
pub struct ReviewSession {
    provider_id: Uuid,
    viewer: Option<Identity>,
    state: ReviewState,
    draft: ReviewDraft,
    reviews: Vec<reviews::Model>,
    summary: RatingSummary,
    last_error: Option<String>,
}

impl ReviewSession {
    pub fn open(viewer: Option<Identity>, provider_id: Uuid) -> Self {
        let state = match &viewer {
            None => ReviewState::Anonymous,
            Some(v) if v.id == provider_id => ReviewState::OwnViewBlocked,
            Some(_) => ReviewState::Authenticated,
        };

        Self {
            provider_id,
            viewer,
            state,
            draft: ReviewDraft::default(),
            reviews: Vec::new(),
            summary: RatingSummary::EMPTY,
            last_error: None,
        }
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn provider_id(&self) -> Uuid {
        self.provider_id
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn reviews(&self) -> &[reviews::Model] {
        &self.reviews
    }

    pub fn summary(&self) -> RatingSummary {
        self.summary
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, ReviewState::Authenticated | ReviewState::Submitted)
    }

    pub fn set_rating(&mut self, rating: i32) {
        self.draft.rating = rating;
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.draft.comment = comment.into();
    }

    /// Seed the list shown under the form (initial page load).
    pub fn load(&mut self, reviews: Vec<reviews::Model>) {
        self.summary = RatingSummary::from_reviews(&reviews);
        self.reviews = reviews;
    }

    /// Move to `Submitting` and return the row to insert.
    ///
    /// Nothing changes when this fails, so no write may follow an error.
    pub fn begin_submit(&mut self) -> AppResult<CreateReview> {
        let viewer = match (self.state, &self.viewer) {
            (ReviewState::Anonymous, _) | (_, None) => return Err(AppError::AuthRequired),
            (ReviewState::OwnViewBlocked, _) => return Err(AppError::OwnViewBlocked),
            (ReviewState::Submitting, _) => {
                return Err(AppError::validation("A review is already being submitted"));
            }
            (_, Some(viewer)) => viewer,
        };

        self.draft.validate()?;

        let review = CreateReview {
            provider_id: self.provider_id,
            user_id: viewer.id,
            reviewer_name: viewer.display_name(),
            reviewer_avatar: Some(viewer.avatar_url.clone().unwrap_or_default()),
            rating: self.draft.rating,
            comment: self.draft.comment.clone(),
        };

        self.state = ReviewState::Submitting;
        self.last_error = None;
        Ok(review)
    }

    /// Finish a submission with the refetched review list, or the error that stopped it.
    pub fn complete(&mut self, outcome: AppResult<Vec<reviews::Model>>) -> AppResult<()> {
        if self.state != ReviewState::Submitting {
            return Err(AppError::validation("No review submission is in progress"));
        }

        match outcome {
            Ok(reviews) => {
                self.load(reviews);
                self.draft = ReviewDraft::default();
                self.state = ReviewState::Submitted;
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.state = ReviewState::Authenticated;
                Err(e)
            }
        }
    }
}
