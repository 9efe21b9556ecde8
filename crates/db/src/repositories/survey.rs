use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use vitarec_core::domain::survey::{SurveyProfile, UserId};

use super::{decode_tags, decode_timestamp, encode_tags, RepositoryError, SurveyRepository};
use crate::DbPool;

pub struct SqlSurveyRepository {
    pool: DbPool,
}

impl SqlSurveyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SurveyRepository for SqlSurveyRepository {
    async fn find_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SurveyProfile>, RepositoryError> {
        let row = sqlx::query(
            "SELECT user_id, age_group, gender, activity_level, stress_level, nutrition, \
             restrictions, complaints, goals, vitamins_current, survey_completed, \
             survey_completed_at \
             FROM survey_profiles WHERE user_id = ?",
        )
        .bind(&user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_profile_row).transpose()
    }

    async fn save(&self, profile: SurveyProfile) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO survey_profiles (
                user_id, age_group, gender, activity_level, stress_level, nutrition,
                restrictions, complaints, goals, vitamins_current,
                survey_completed, survey_completed_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                age_group = excluded.age_group,
                gender = excluded.gender,
                activity_level = excluded.activity_level,
                stress_level = excluded.stress_level,
                nutrition = excluded.nutrition,
                restrictions = excluded.restrictions,
                complaints = excluded.complaints,
                goals = excluded.goals,
                vitamins_current = excluded.vitamins_current,
                survey_completed = excluded.survey_completed,
                survey_completed_at = excluded.survey_completed_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.user_id.0)
        .bind(profile.age_group.as_str())
        .bind(profile.gender.as_str())
        .bind(profile.activity_level.as_str())
        .bind(profile.stress_level.as_str())
        .bind(profile.nutrition.as_str())
        .bind(encode_tags(&profile.restrictions))
        .bind(encode_tags(&profile.complaints))
        .bind(encode_tags(&profile.goals))
        .bind(encode_tags(&profile.vitamins_current))
        .bind(profile.completed)
        .bind(profile.completed_at.map(|timestamp| timestamp.to_rfc3339()))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn map_profile_row(row: &SqliteRow) -> Result<SurveyProfile, RepositoryError> {
    let age_group: String = row.try_get("age_group")?;
    let gender: String = row.try_get("gender")?;
    let activity_level: String = row.try_get("activity_level")?;
    let stress_level: String = row.try_get("stress_level")?;
    let nutrition: String = row.try_get("nutrition")?;

    let restrictions: String = row.try_get("restrictions")?;
    let complaints: String = row.try_get("complaints")?;
    let goals: String = row.try_get("goals")?;
    let vitamins_current: String = row.try_get("vitamins_current")?;

    let completed_at: Option<String> = row.try_get("survey_completed_at")?;
    let completed_at = completed_at
        .map(|raw| decode_timestamp("survey_completed_at", &raw))
        .transpose()?;

    Ok(SurveyProfile {
        user_id: UserId(row.try_get("user_id")?),
        age_group: parse_enum("age_group", &age_group)?,
        gender: parse_enum("gender", &gender)?,
        activity_level: parse_enum("activity_level", &activity_level)?,
        stress_level: parse_enum("stress_level", &stress_level)?,
        nutrition: parse_enum("nutrition", &nutrition)?,
        restrictions: decode_tags("restrictions", &restrictions)?,
        complaints: decode_tags("complaints", &complaints)?,
        goals: decode_tags("goals", &goals)?,
        vitamins_current: decode_tags("vitamins_current", &vitamins_current)?,
        completed: row.try_get("survey_completed")?,
        completed_at,
    })
}

fn parse_enum<T>(column: &str, raw: &str) -> Result<T, RepositoryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|error| RepositoryError::Decode(format!("column `{column}`: {error}")))
}
