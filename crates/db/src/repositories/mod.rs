use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use vitarec_core::domain::product::Product;
use vitarec_core::domain::rule::VitaminRule;
use vitarec_core::domain::survey::{SurveyProfile, UserId};

pub mod memory;
pub mod product;
pub mod rule;
pub mod survey;

pub use memory::{InMemoryProductCatalog, InMemorySurveyRepository, InMemoryVitaminRuleRepository};
pub use product::SqlProductCatalog;
pub use rule::SqlVitaminRuleRepository;
pub use survey::SqlSurveyRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Read side of the product catalog as the recommendation engines see
/// it. `save` exists for seeding and admin tooling.
#[async_trait]
pub trait ProductCatalogRepository: Send + Sync {
    async fn list_active(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn save(&self, product: Product) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait VitaminRuleRepository: Send + Sync {
    /// Active rules ordered by ascending priority, then creation order.
    async fn list_active(&self) -> Result<Vec<VitaminRule>, RepositoryError>;
    async fn save(&self, rule: VitaminRule) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait SurveyRepository: Send + Sync {
    async fn find_for_user(&self, user_id: &UserId) -> Result<Option<SurveyProfile>, RepositoryError>;
    /// Full-replace upsert: a resubmitted survey overwrites every field
    /// of the prior answers.
    async fn save(&self, profile: SurveyProfile) -> Result<(), RepositoryError>;
}

pub(crate) fn decode_tags(column: &str, raw: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(raw)
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

pub(crate) fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

pub(crate) fn decode_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::{connect_with_settings, migrations, DbPool};

    /// Named in-memory database so concurrently running tests stay
    /// isolated while every connection of one pool sees the same data.
    pub async fn migrated_pool(name: &str) -> DbPool {
        let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
        let pool =
            connect_with_settings(&url, 2, 5).await.expect("test pool should connect");
        migrations::run_pending(&pool).await.expect("migrations should apply");
        pool
    }
}
