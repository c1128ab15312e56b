//! Product review aggregation.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::types::coerce_price;

/// Reviews for one product plus their count and mean star rating.
///
/// Review bodies are passed through untouched. A review without a numeric
/// `reviewValue` counts as zero stars, and no reviews gives a rating of zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub reviews: Vec<Value>,
    pub count: usize,
    /// Mean of `reviewValue`, rounded to one decimal place.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_rating: Decimal,
}

impl ReviewSummary {
    #[must_use]
    pub fn new(reviews: Vec<Value>) -> Self {
        let total = reviews
            .iter()
            .map(|review| review.get("reviewValue").map_or(Decimal::ZERO, coerce_price))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let average_rating = total
            .checked_div(Decimal::from(reviews.len()))
            .map_or(Decimal::ZERO, |mean| mean.round_dp(1).normalize());

        Self {
            count: reviews.len(),
            reviews,
            average_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_average_rating() {
        let summary = ReviewSummary::new(vec![
            json!({"reviewValue": 5, "title": "Great"}),
            json!({"reviewValue": 4}),
            json!({"reviewValue": 4}),
        ]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average_rating, Decimal::new(43, 1));
    }

    #[test]
    fn test_missing_values_count_as_zero() {
        let summary = ReviewSummary::new(vec![json!({"reviewValue": 5}), json!({"comment": "?"})]);
        assert_eq!(summary.average_rating, Decimal::new(25, 1));
    }

    #[test]
    fn test_no_reviews() {
        let summary = ReviewSummary::new(Vec::new());
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_rating, Decimal::ZERO);
        assert_eq!(
            serde_json::to_value(&summary).ok(),
            Some(json!({"reviews": [], "count": 0, "averageRating": 0.0}))
        );
    }
}
