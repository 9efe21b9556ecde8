//! Survey intake and recommendation endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use vitarec_core::domain::recommendation::ProductRecommendation;
use vitarec_core::domain::survey::{
    ActivityLevel, AgeGroup, Gender, Nutrition, StressLevel, SurveyProfile, UserId,
};
use vitarec_core::errors::{ApplicationError, InterfaceError};
use vitarec_core::{DeterministicRecommender, WeightedScorer};
use vitarec_db::repositories::{
    ProductCatalogRepository, SqlProductCatalog, SqlSurveyRepository, SqlVitaminRuleRepository,
    SurveyRepository, VitaminRuleRepository,
};
use vitarec_db::{DbPool, RepositoryError};

#[derive(Clone)]
pub struct ApiState {
    pub db_pool: DbPool,
    pub max_recommendations: usize,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/survey", post(submit_survey))
        .route("/api/survey/recommendations/{user_id}", get(deterministic_recommendations))
        .route("/api/recommendations/enhanced/{user_id}", get(weighted_recommendations))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SurveySubmission {
    pub user_id: String,
    pub age_group: AgeGroup,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub stress_level: StressLevel,
    pub nutrition: Nutrition,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(default)]
    pub complaints: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default, alias = "vitamins_currently")]
    pub vitamins_current: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SurveyResponse {
    pub profile: SurveyProfile,
}

#[derive(Debug, Serialize)]
pub struct DeterministicResponse {
    pub recommendations: Vec<ProductRecommendation>,
    pub total: usize,
    pub survey_completed: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeightedParams {
    pub max: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct WeightedResponse {
    pub recommendations: Vec<ProductRecommendation>,
    pub total_score: i32,
    pub excluded_products: Vec<String>,
    pub analysis_report: String,
    pub survey_completed: bool,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = serde_json::json!({
            "error": self.0.user_message(),
            "correlation_id": self.0.correlation_id(),
        });
        (status, Json(body)).into_response()
    }
}

fn persistence_error(error: RepositoryError, correlation_id: &str) -> ApiError {
    ApiError(ApplicationError::Persistence(error.to_string()).into_interface(correlation_id))
}

pub async fn submit_survey(
    State(state): State<ApiState>,
    Json(submission): Json<SurveySubmission>,
) -> Result<Json<SurveyResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let profile = SurveyProfile {
        user_id: UserId(submission.user_id),
        age_group: submission.age_group,
        gender: submission.gender,
        activity_level: submission.activity_level,
        stress_level: submission.stress_level,
        nutrition: submission.nutrition,
        restrictions: submission.restrictions,
        complaints: submission.complaints,
        goals: submission.goals,
        vitamins_current: submission.vitamins_current,
        completed: true,
        completed_at: Some(Utc::now()),
    };

    SqlSurveyRepository::new(state.db_pool.clone())
        .save(profile.clone())
        .await
        .map_err(|error| persistence_error(error, &correlation_id))?;

    info!(
        event_name = "api.survey.submitted",
        correlation_id = %correlation_id,
        user_id = %profile.user_id.0,
        "survey profile stored"
    );

    Ok(Json(SurveyResponse { profile }))
}

/// Deterministic strategy. A missing or incomplete survey is a normal
/// terminal state and answers with an empty list, not an error.
pub async fn deterministic_recommendations(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
) -> Result<Json<DeterministicResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let profile = SqlSurveyRepository::new(state.db_pool.clone())
        .find_for_user(&UserId(user_id.clone()))
        .await
        .map_err(|error| persistence_error(error, &correlation_id))?;

    let Some(profile) = profile.filter(|profile| profile.completed) else {
        info!(
            event_name = "api.recommendations.no_survey",
            correlation_id = %correlation_id,
            user_id = %user_id,
            "no completed survey for user"
        );
        return Ok(Json(DeterministicResponse {
            recommendations: Vec::new(),
            total: 0,
            survey_completed: false,
        }));
    };

    let catalog = SqlProductCatalog::new(state.db_pool.clone());
    let rules = SqlVitaminRuleRepository::new(state.db_pool.clone());
    // Independent reads; fetch both concurrently.
    let (products, rule_set) = tokio::try_join!(catalog.list_active(), rules.list_active())
        .map_err(|error| persistence_error(error, &correlation_id))?;

    let recommendations = DeterministicRecommender::new(state.max_recommendations)
        .recommend(&profile, &products, &rule_set);

    info!(
        event_name = "api.recommendations.deterministic",
        correlation_id = %correlation_id,
        user_id = %user_id,
        total = recommendations.len(),
        "deterministic recommendations computed"
    );

    let total = recommendations.len();
    Ok(Json(DeterministicResponse { recommendations, total, survey_completed: true }))
}

pub async fn weighted_recommendations(
    State(state): State<ApiState>,
    Path(user_id): Path<String>,
    Query(params): Query<WeightedParams>,
) -> Result<Json<WeightedResponse>, ApiError> {
    let correlation_id = Uuid::new_v4().to_string();

    let profile = SqlSurveyRepository::new(state.db_pool.clone())
        .find_for_user(&UserId(user_id.clone()))
        .await
        .map_err(|error| persistence_error(error, &correlation_id))?;

    let Some(profile) = profile.filter(|profile| profile.completed) else {
        info!(
            event_name = "api.recommendations.no_survey",
            correlation_id = %correlation_id,
            user_id = %user_id,
            "no completed survey for user"
        );
        return Ok(Json(WeightedResponse {
            recommendations: Vec::new(),
            total_score: 0,
            excluded_products: Vec::new(),
            analysis_report: String::new(),
            survey_completed: false,
        }));
    };

    let products = SqlProductCatalog::new(state.db_pool.clone())
        .list_active()
        .await
        .map_err(|error| persistence_error(error, &correlation_id))?;

    let max = params.max.unwrap_or(state.max_recommendations);
    let outcome = WeightedScorer::new(max).recommend_full(&profile, &products);

    info!(
        event_name = "api.recommendations.weighted",
        correlation_id = %correlation_id,
        user_id = %user_id,
        total = outcome.recommendations.len(),
        total_score = outcome.total_score,
        "weighted recommendations computed"
    );

    Ok(Json(WeightedResponse {
        recommendations: outcome.recommendations,
        total_score: outcome.total_score,
        excluded_products: outcome.excluded_products,
        analysis_report: outcome.analysis_report,
        survey_completed: true,
    }))
}

#[cfg(test)]
mod tests {
    use axum::extract::{Path, Query, State};
    use axum::Json;

    use vitarec_core::domain::recommendation::RecommendationScore;
    use vitarec_core::domain::survey::UserId;
    use vitarec_db::repositories::SurveyRepository;
    use vitarec_db::{connect_with_settings, migrations, DemoSeedDataset, DEMO_USER_ID};

    use super::*;

    async fn seeded_state(name: &str) -> ApiState {
        let url = format!("sqlite:file:{name}?mode=memory&cache=shared");
        let pool = connect_with_settings(&url, 2, 5).await.expect("pool should connect");
        migrations::run_pending(&pool).await.expect("migrations should apply");
        DemoSeedDataset::load(&pool).await.expect("seed should load");
        ApiState { db_pool: pool, max_recommendations: 8 }
    }

    fn submission(user_id: &str) -> SurveySubmission {
        SurveySubmission {
            user_id: user_id.to_owned(),
            age_group: AgeGroup::From46To60,
            gender: Gender::Male,
            activity_level: ActivityLevel::Daily,
            stress_level: StressLevel::Low,
            nutrition: Nutrition::Daily,
            restrictions: vec![],
            complaints: vec!["joint_pain".to_owned()],
            goals: vec!["heart_health".to_owned()],
            vitamins_current: vec![],
        }
    }

    #[tokio::test]
    async fn deterministic_endpoint_recommends_for_the_demo_user() {
        let state = seeded_state("api_deterministic").await;

        let Json(response) = deterministic_recommendations(
            State(state.clone()),
            Path(DEMO_USER_ID.to_owned()),
        )
        .await
        .expect("handler should succeed");

        assert!(response.survey_completed);
        assert!(response.total > 0);
        assert_eq!(response.total, response.recommendations.len());
        // Demo profile matches the stress rule first; magnesium leads.
        assert!(matches!(
            response.recommendations[0].score,
            RecommendationScore::Urgency { .. }
        ));
        assert!(response
            .recommendations
            .iter()
            .all(|recommendation| recommendation.product.id.0 != "prod-omega-3"));

        state.db_pool.close().await;
    }

    #[tokio::test]
    async fn weighted_endpoint_returns_outcome_with_report() {
        let state = seeded_state("api_weighted").await;

        let Json(response) = weighted_recommendations(
            State(state.clone()),
            Path(DEMO_USER_ID.to_owned()),
            Query(WeightedParams::default()),
        )
        .await
        .expect("handler should succeed");

        assert!(response.survey_completed);
        assert!(!response.recommendations.is_empty());
        assert!(response.total_score > 0);
        assert!(response.analysis_report.starts_with("Анализ профиля: женщина, 18-30 лет"));
        assert!(response.excluded_products.contains(&"Омега-3 Premium".to_owned()));

        state.db_pool.close().await;
    }

    #[tokio::test]
    async fn weighted_endpoint_honors_the_max_parameter() {
        let state = seeded_state("api_weighted_max").await;

        let Json(response) = weighted_recommendations(
            State(state.clone()),
            Path(DEMO_USER_ID.to_owned()),
            Query(WeightedParams { max: Some(2) }),
        )
        .await
        .expect("handler should succeed");

        assert!(response.recommendations.len() <= 2);

        state.db_pool.close().await;
    }

    #[tokio::test]
    async fn unknown_user_gets_an_empty_list_not_an_error() {
        let state = seeded_state("api_unknown_user").await;

        let Json(response) = deterministic_recommendations(
            State(state.clone()),
            Path("user-without-survey".to_owned()),
        )
        .await
        .expect("handler should succeed");

        assert!(!response.survey_completed);
        assert!(response.recommendations.is_empty());
        assert_eq!(response.total, 0);

        state.db_pool.close().await;
    }

    #[tokio::test]
    async fn survey_submission_overwrites_and_feeds_recommendations() {
        let state = seeded_state("api_survey_submit").await;

        let Json(saved) = submit_survey(State(state.clone()), Json(submission("user-new")))
            .await
            .expect("submission should succeed");
        assert!(saved.profile.completed);
        assert!(saved.profile.completed_at.is_some());

        // Resubmission replaces the stored answers wholesale.
        let mut changed = submission("user-new");
        changed.complaints = vec!["fatigue".to_owned()];
        let Json(saved) = submit_survey(State(state.clone()), Json(changed))
            .await
            .expect("resubmission should succeed");
        assert_eq!(saved.profile.complaints, vec!["fatigue".to_owned()]);

        let stored = SqlSurveyRepository::new(state.db_pool.clone())
            .find_for_user(&UserId("user-new".to_owned()))
            .await
            .expect("lookup")
            .expect("profile stored");
        assert_eq!(stored.complaints, vec!["fatigue".to_owned()]);

        let Json(response) =
            deterministic_recommendations(State(state.clone()), Path("user-new".to_owned()))
                .await
                .expect("handler should succeed");
        assert!(response.survey_completed);

        state.db_pool.close().await;
    }
}
