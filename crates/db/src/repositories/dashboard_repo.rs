//! Aggregate queries backing the dashboard summary endpoint.

use sqlx::PgPool;

use hiperflow_core::types::DbId;

use crate::models::dashboard::{EntityCounts, OutboxSlice, StageSlice};

/// Provides read-only aggregates over a team's CRM data.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Row counts for the four CRM entities of a team.
    pub async fn entity_counts(pool: &PgPool, team_id: DbId) -> Result<EntityCounts, sqlx::Error> {
        sqlx::query_as::<_, EntityCounts>(
            "SELECT
                (SELECT COUNT(*) FROM contacts WHERE team_id = $1) AS contacts,
                (SELECT COUNT(*) FROM companies WHERE team_id = $1) AS companies,
                (SELECT COUNT(*) FROM deals WHERE team_id = $1) AS deals,
                (SELECT COUNT(*) FROM tasks WHERE team_id = $1) AS tasks",
        )
        .bind(team_id)
        .fetch_one(pool)
        .await
    }

    /// Deal count and total value per stage. Stages with no deals are absent;
    /// the handler fills in empty columns.
    pub async fn deals_by_stage(
        pool: &PgPool,
        team_id: DbId,
    ) -> Result<Vec<StageSlice>, sqlx::Error> {
        sqlx::query_as::<_, StageSlice>(
            "SELECT stage,
                    COUNT(*) AS deal_count,
                    COALESCE(SUM(amount_cents), 0)::BIGINT AS amount_cents
             FROM deals
             WHERE team_id = $1
             GROUP BY stage",
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
    }

    /// Open tasks due today or overdue.
    pub async fn tasks_due_today(pool: &PgPool, team_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks
             WHERE team_id = $1 AND is_done = false
               AND due_at IS NOT NULL AND due_at::DATE <= CURRENT_DATE",
        )
        .bind(team_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Outbox record counts per delivery status.
    pub async fn outbox_by_status(
        pool: &PgPool,
        team_id: DbId,
    ) -> Result<Vec<OutboxSlice>, sqlx::Error> {
        sqlx::query_as::<_, OutboxSlice>(
            "SELECT status, COUNT(*) AS event_count
             FROM automation_outbox
             WHERE team_id = $1
             GROUP BY status",
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
    }
}
