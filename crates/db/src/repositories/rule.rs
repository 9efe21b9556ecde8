use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use vitarec_core::domain::rule::{RuleCondition, RuleId, VitaminRule};

use super::{decode_tags, RepositoryError, VitaminRuleRepository};
use crate::DbPool;

pub struct SqlVitaminRuleRepository {
    pool: DbPool,
}

impl SqlVitaminRuleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl VitaminRuleRepository for SqlVitaminRuleRepository {
    async fn list_active(&self) -> Result<Vec<VitaminRule>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, name, condition, vitamins, priority, is_active \
             FROM vitamin_rules WHERE is_active = 1 \
             ORDER BY priority ASC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_rule_row).collect()
    }

    async fn save(&self, rule: VitaminRule) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let condition = serde_json::to_string(&rule.condition.to_json())
            .map_err(|error| RepositoryError::Decode(format!("column `condition`: {error}")))?;

        sqlx::query(
            r#"
            INSERT INTO vitamin_rules (
                id, name, condition, vitamins, priority, is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                condition = excluded.condition,
                vitamins = excluded.vitamins,
                priority = excluded.priority,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&rule.id.0)
        .bind(&rule.name)
        .bind(condition)
        .bind(super::encode_tags(&rule.vitamins))
        .bind(rule.priority)
        .bind(rule.active)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// A stored condition referencing an unknown profile field is a decode
/// error here, not a silently never-matching rule.
fn map_rule_row(row: &SqliteRow) -> Result<VitaminRule, RepositoryError> {
    let condition_raw: String = row.try_get("condition")?;
    let condition_json: serde_json::Value = serde_json::from_str(&condition_raw)
        .map_err(|error| RepositoryError::Decode(format!("column `condition`: {error}")))?;
    let condition = RuleCondition::from_json(&condition_json)
        .map_err(|error| RepositoryError::Decode(format!("column `condition`: {error}")))?;

    let vitamins: String = row.try_get("vitamins")?;

    Ok(VitaminRule {
        id: RuleId(row.try_get("id")?),
        name: row.try_get("name")?,
        condition,
        vitamins: decode_tags("vitamins", &vitamins)?,
        priority: row.try_get("priority")?,
        active: row.try_get("is_active")?,
    })
}
