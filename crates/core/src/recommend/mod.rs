//! Survey-driven product recommendation.
//!
//! Two strategies share one interface and stay deliberately divergent:
//! the deterministic recommender accumulates rule urgency ranks, the
//! weighted scorer assigns capped additive points with a hard veto for
//! restriction conflicts. Both are pure functions of the profile and
//! the catalog/rule snapshots handed to them.

mod deterministic;
mod exclusion;
mod matcher;
mod report;
mod weighted;

pub use deterministic::DeterministicRecommender;
pub use exclusion::{taken_by_name_or_benefit, taken_by_vitamin_type, tokens_overlap};
pub use matcher::rule_matches;
pub use report::analysis_report;
pub use weighted::{WeightedScorer, RESTRICTION_PENALTY};

use crate::domain::product::Product;
use crate::domain::recommendation::ProductRecommendation;
use crate::domain::rule::VitaminRule;
use crate::domain::survey::SurveyProfile;

/// Default cap on returned recommendations for both strategies.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 8;

/// A recommendation strategy over in-memory snapshots. The weighted
/// implementation ignores the rule snapshot.
pub trait Recommender {
    fn name(&self) -> &'static str;

    fn recommend(
        &self,
        profile: &SurveyProfile,
        catalog: &[Product],
        rules: &[VitaminRule],
    ) -> Vec<ProductRecommendation>;
}
