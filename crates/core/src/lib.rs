pub mod config;
pub mod domain;
pub mod errors;
pub mod recommend;

pub use domain::product::{Product, ProductId};
pub use domain::recommendation::{
    PriorityTier, ProductRecommendation, RecommendationScore, WeightedRecommendationOutcome,
};
pub use domain::rule::{ConditionKey, ConditionValue, RuleCondition, RuleId, VitaminRule};
pub use domain::survey::{
    ActivityLevel, AgeGroup, Gender, Nutrition, StressLevel, SurveyProfile, UserId,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use recommend::{
    DeterministicRecommender, Recommender, WeightedScorer, DEFAULT_MAX_RECOMMENDATIONS,
};

// Re-exported so downstream crates share one chrono version through the
// domain types.
pub use chrono;
