//! Star-rating aggregation for provider profiles.

use serde::Serialize;

use crate::models::reviews;

/// Average rating and review count for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Mean rating rounded half-up to one decimal; `0.0` when there are no reviews.
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    pub const EMPTY: RatingSummary = RatingSummary { average: 0.0, count: 0 };

    /// Aggregate raw ratings. Values outside 1..=5 are averaged as given.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0i64, 0i64), |(sum, count), r| (sum + i64::from(r), count + 1));

        if count == 0 {
            return Self::EMPTY;
        }

        // Work in tenths so x.x5 always rounds up, independent of float representation.
        let tenths = (20 * sum + count).div_euclid(2 * count);

        Self {
            average: tenths as f64 / 10.0,
            count: count as usize,
        }
    }

    pub fn from_reviews(reviews: &[reviews::Model]) -> Self {
        Self::from_ratings(reviews.iter().map(|r| r.rating))
    }

    pub fn is_new(&self) -> bool {
        self.count == 0
    }

    /// What a profile shows next to the star: `"New"` or e.g. `"4.7"`.
    pub fn label(&self) -> String {
        if self.is_new() {
            "New".to_string()
        } else {
            format!("{:.1}", self.average)
        }
    }
}

impl Default for RatingSummary {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Serialized form used in API responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingView {
    pub average: f64,
    pub count: usize,
    pub label: String,
}

impl From<RatingSummary> for RatingView {
    fn from(s: RatingSummary) -> Self {
        Self {
            average: s.average,
            count: s.count,
            label: s.label(),
        }
    }
}
