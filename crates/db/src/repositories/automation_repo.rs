//! Repository for the `automations` table.

use sqlx::PgPool;

use hiperflow_core::types::DbId;

use crate::models::automation::{Automation, CreateAutomation, UpdateAutomation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, team_id, name, platform, target_url, secret, event_types, \
                        is_active, last_run_at, last_run_status, failure_count, \
                        created_at, updated_at";

/// Provides CRUD operations for automations.
pub struct AutomationRepo;

impl AutomationRepo {
    /// Insert a new automation, returning the created row.
    pub async fn create(
        pool: &PgPool,
        team_id: DbId,
        input: &CreateAutomation,
    ) -> Result<Automation, sqlx::Error> {
        let event_types =
            serde_json::json!(input.event_types.as_deref().unwrap_or_default());
        let query = format!(
            "INSERT INTO automations (team_id, name, platform, target_url, secret, \
                                      event_types, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Automation>(&query)
            .bind(team_id)
            .bind(&input.name)
            .bind(input.platform.as_deref().unwrap_or("make"))
            .bind(&input.target_url)
            .bind(&input.secret)
            .bind(&event_types)
            .bind(input.is_active.unwrap_or(true))
            .fetch_one(pool)
            .await
    }

    /// List a team's automations, newest first.
    pub async fn list(pool: &PgPool, team_id: DbId) -> Result<Vec<Automation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM automations WHERE team_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Automation>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await
    }

    /// Find an automation by ID within a team.
    pub async fn find_by_id(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
    ) -> Result<Option<Automation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM automations WHERE team_id = $1 AND id = $2");
        sqlx::query_as::<_, Automation>(&query)
            .bind(team_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an automation by ID without a team filter.
    ///
    /// Only the dispatcher uses this; it runs outside any tenant context.
    pub async fn find_by_id_unscoped(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Automation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM automations WHERE id = $1");
        sqlx::query_as::<_, Automation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Active automations of a team subscribed to `event_type`.
    ///
    /// An empty `event_types` array subscribes to every type.
    pub async fn list_active_for_event(
        pool: &PgPool,
        team_id: DbId,
        event_type: &str,
    ) -> Result<Vec<Automation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM automations
             WHERE team_id = $1
               AND is_active = true
               AND (event_types = '[]'::jsonb OR event_types @> jsonb_build_array($2::text))
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Automation>(&query)
            .bind(team_id)
            .bind(event_type)
            .fetch_all(pool)
            .await
    }

    /// Update an automation. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists in the team.
    pub async fn update(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
        input: &UpdateAutomation,
    ) -> Result<Option<Automation>, sqlx::Error> {
        let event_types = input.event_types.as_ref().map(|t| serde_json::json!(t));
        let query = format!(
            "UPDATE automations SET
                name = COALESCE($3, name),
                platform = COALESCE($4, platform),
                target_url = COALESCE($5, target_url),
                secret = COALESCE($6, secret),
                event_types = COALESCE($7, event_types),
                is_active = COALESCE($8, is_active)
             WHERE team_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Automation>(&query)
            .bind(team_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.platform)
            .bind(&input.target_url)
            .bind(&input.secret)
            .bind(&event_types)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete an automation. Cascade deletes its outbox rows.
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, team_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM automations WHERE team_id = $1 AND id = $2")
            .bind(team_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the outcome of the most recent delivery run.
    pub async fn record_run(pool: &PgPool, id: DbId, success: bool) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE automations SET
                last_run_at = NOW(),
                last_run_status = CASE WHEN $2 THEN 'success' ELSE 'error' END
             WHERE id = $1",
        )
        .bind(id)
        .bind(success)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Increment `failure_count` after a delivery exhausts its retries.
    pub async fn increment_failure_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE automations SET failure_count = failure_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
