use clap::ValueEnum;

use vitarec_core::config::{AppConfig, LoadOptions};
use vitarec_core::domain::survey::UserId;
use vitarec_core::{DeterministicRecommender, Recommender, WeightedScorer};
use vitarec_db::repositories::{
    ProductCatalogRepository, SqlProductCatalog, SqlSurveyRepository, SqlVitaminRuleRepository,
    SurveyRepository, VitaminRuleRepository,
};
use vitarec_db::connect_with_settings;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    Deterministic,
    Weighted,
}

pub fn run(user_id: &str, strategy: Strategy, max: Option<usize>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "recommend",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let max_recommendations = max.unwrap_or(config.recommendation.max_recommendations).max(1);

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;

        let profile = SqlSurveyRepository::new(pool.clone())
            .find_for_user(&UserId(user_id.to_owned()))
            .await
            .map_err(|error| ("db_read", error.to_string(), 5u8))?;

        let Some(profile) = profile.filter(|profile| profile.completed) else {
            pool.close().await;
            return Ok(serde_json::json!({
                "survey_completed": false,
                "recommendations": [],
            }));
        };

        let catalog = SqlProductCatalog::new(pool.clone());
        let rules = SqlVitaminRuleRepository::new(pool.clone());
        let (products, rule_set) = tokio::try_join!(catalog.list_active(), rules.list_active())
            .map_err(|error| ("db_read", error.to_string(), 5u8))?;

        let payload = match strategy {
            Strategy::Deterministic => {
                let engine: &dyn Recommender =
                    &DeterministicRecommender::new(max_recommendations);
                let recommendations = engine.recommend(&profile, &products, &rule_set);
                serde_json::json!({
                    "survey_completed": true,
                    "strategy": engine.name(),
                    "recommendations": recommendations,
                })
            }
            Strategy::Weighted => {
                let engine = WeightedScorer::new(max_recommendations);
                let outcome = engine.recommend_full(&profile, &products);
                serde_json::json!({
                    "survey_completed": true,
                    "strategy": engine.name(),
                    "recommendations": outcome.recommendations,
                    "total_score": outcome.total_score,
                    "excluded_products": outcome.excluded_products,
                    "analysis_report": outcome.analysis_report,
                })
            }
        };

        pool.close().await;
        Ok::<_, (&'static str, String, u8)>(payload)
    });

    match result {
        Ok(payload) => CommandResult::success_with_data(
            "recommend",
            format!("computed recommendations for `{user_id}`"),
            payload,
        ),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("recommend", error_class, message, exit_code)
        }
    }
}
