//! Outbox record model.

use serde::Serialize;
use sqlx::FromRow;

use hiperflow_core::types::{DbId, Timestamp};

/// A row from the `automation_outbox` table.
///
/// One row per (automation, event) pair. The row is written in the same
/// request that performed the triggering change, then delivered
/// asynchronously by the dispatcher. `UNIQUE (automation_id, event_key)`
/// makes enqueueing idempotent.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutboxRecord {
    pub id: DbId,
    pub automation_id: DbId,
    pub team_id: DbId,
    /// Deterministic idempotency key derived from the source entity and
    /// emission instant.
    pub event_key: String,
    pub event_type: String,
    pub deal_id: Option<DbId>,
    /// The exact JSON body that will be (or was) POSTed.
    pub payload: serde_json::Value,
    /// `pending`, `sent`, or `failed`.
    pub status: String,
    pub attempt_count: i16,
    pub next_attempt_at: Timestamp,
    pub response_status: Option<i16>,
    pub response_time_ms: Option<i32>,
    pub last_error: Option<String>,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
