use serde::{Deserialize, Serialize};

use super::product::Product;
use super::rule::RuleId;

/// Coarse urgency label derived from a weighted score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    pub fn from_points(points: i32) -> Self {
        if points >= 25 {
            Self::High
        } else if points >= 15 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Numeric ranking attached to a recommendation. The two strategies
/// rank differently and the values are not comparable across them:
/// urgency ranks sort ascending, weighted points sort descending.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationScore {
    /// Summed priority of every matched rule; lower is shown first.
    Urgency { rank: i64 },
    /// Additive points across the scoring dimensions, with tier label.
    Weighted { points: i32, tier: PriorityTier },
}

/// One ranked product with human-readable justification. Ephemeral
/// output, never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    pub product: Product,
    pub reasons: Vec<String>,
    pub score: RecommendationScore,
    /// Rules that contributed to this entry; populated only by the
    /// deterministic strategy.
    pub matched_rules: Vec<RuleId>,
}

/// Full return of the weighted scorer: the ranked list plus the
/// aggregate figures and the descriptive analysis text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedRecommendationOutcome {
    pub recommendations: Vec<ProductRecommendation>,
    pub total_score: i32,
    pub excluded_products: Vec<String>,
    pub analysis_report: String,
}

#[cfg(test)]
mod tests {
    use super::PriorityTier;

    #[test]
    fn tier_thresholds() {
        assert_eq!(PriorityTier::from_points(25), PriorityTier::High);
        assert_eq!(PriorityTier::from_points(40), PriorityTier::High);
        assert_eq!(PriorityTier::from_points(24), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_points(15), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_points(14), PriorityTier::Low);
        assert_eq!(PriorityTier::from_points(1), PriorityTier::Low);
    }
}
