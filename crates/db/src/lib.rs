pub mod connection;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use fixtures::{DemoSeedDataset, SeedResult, VerificationResult, DEMO_USER_ID};
pub use repositories::{
    ProductCatalogRepository, RepositoryError, SqlProductCatalog, SqlSurveyRepository,
    SqlVitaminRuleRepository, SurveyRepository, VitaminRuleRepository,
};
