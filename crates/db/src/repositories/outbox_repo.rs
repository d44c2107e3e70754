//! Repository for the `automation_outbox` table.
//!
//! Enqueueing happens inside API request handlers; claiming and status
//! updates happen in the dispatcher. `UNIQUE (automation_id, event_key)`
//! makes `enqueue` a no-op for an event that is already recorded.

use sqlx::PgPool;

use hiperflow_core::types::DbId;

use crate::models::outbox::OutboxRecord;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, automation_id, team_id, event_key, event_type, deal_id, payload, \
                        status, attempt_count, next_attempt_at, response_status, \
                        response_time_ms, last_error, delivered_at, created_at, updated_at";

/// Provides enqueue, claim, and bookkeeping operations for outbox records.
pub struct OutboxRepo;

impl OutboxRepo {
    /// Insert a pending outbox record, or do nothing if the
    /// (automation, event_key) pair already exists.
    ///
    /// Returns `None` when the record was already enqueued.
    #[allow(clippy::too_many_arguments)]
    pub async fn enqueue(
        pool: &PgPool,
        automation_id: DbId,
        team_id: DbId,
        event_type: &str,
        event_key: &str,
        deal_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<Option<OutboxRecord>, sqlx::Error> {
        let query = format!(
            "INSERT INTO automation_outbox (automation_id, team_id, event_type, event_key, \
                                            deal_id, payload)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (automation_id, event_key) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboxRecord>(&query)
            .bind(automation_id)
            .bind(team_id)
            .bind(event_type)
            .bind(event_key)
            .bind(deal_id)
            .bind(payload)
            .fetch_optional(pool)
            .await
    }

    /// Pending records whose attempt window has arrived, oldest due first.
    pub async fn list_due(pool: &PgPool, limit: i64) -> Result<Vec<OutboxRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM automation_outbox
             WHERE status = 'pending' AND next_attempt_at <= NOW()
             ORDER BY next_attempt_at ASC, id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, OutboxRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Mark a record as delivered with the response metadata.
    pub async fn mark_sent(
        pool: &PgPool,
        id: DbId,
        response_status: i16,
        response_time_ms: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE automation_outbox SET
                status = 'sent',
                attempt_count = attempt_count + 1,
                response_status = $2,
                response_time_ms = $3,
                last_error = NULL,
                delivered_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(response_status)
        .bind(response_time_ms)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a failed attempt.
    ///
    /// With `retry_in_secs = Some(n)` the record stays pending and becomes
    /// due again in `n` seconds; with `None` it is marked failed for good.
    pub async fn record_failure(
        pool: &PgPool,
        id: DbId,
        response_status: Option<i16>,
        response_time_ms: Option<i32>,
        error: &str,
        retry_in_secs: Option<i64>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE automation_outbox SET
                status = CASE WHEN $5::TEXT IS NULL THEN 'failed' ELSE 'pending' END,
                attempt_count = attempt_count + 1,
                response_status = $2,
                response_time_ms = $3,
                last_error = $4,
                next_attempt_at = CASE WHEN $5::TEXT IS NULL THEN next_attempt_at
                                       ELSE NOW() + ($5 || ' seconds')::INTERVAL END
             WHERE id = $1",
        )
        .bind(id)
        .bind(response_status)
        .bind(response_time_ms)
        .bind(error)
        .bind(retry_in_secs.map(|s| s.to_string()))
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Reset a record for replay: status back to pending, attempt counter
    /// and response metadata cleared, due immediately.
    ///
    /// Returns `None` if no row with the given `id` exists in the team.
    pub async fn replay(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
    ) -> Result<Option<OutboxRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE automation_outbox SET
                status = 'pending',
                attempt_count = 0,
                response_status = NULL,
                response_time_ms = NULL,
                last_error = NULL,
                delivered_at = NULL,
                next_attempt_at = NOW()
             WHERE team_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboxRecord>(&query)
            .bind(team_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an automation's outbox records with pagination, newest first.
    pub async fn list_for_automation(
        pool: &PgPool,
        team_id: DbId,
        automation_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OutboxRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM automation_outbox
             WHERE team_id = $1 AND automation_id = $2
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, OutboxRecord>(&query)
            .bind(team_id)
            .bind(automation_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find an outbox record by ID within a team.
    pub async fn find_by_id(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
    ) -> Result<Option<OutboxRecord>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM automation_outbox WHERE team_id = $1 AND id = $2");
        sqlx::query_as::<_, OutboxRecord>(&query)
            .bind(team_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
