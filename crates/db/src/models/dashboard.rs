//! Dashboard aggregate row shapes.
//!
//! These are projections, not tables: each struct matches the column list of
//! one aggregate query in `DashboardRepo`.

use serde::Serialize;
use sqlx::FromRow;

/// Per-entity row counts for one team.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EntityCounts {
    pub contacts: i64,
    pub companies: i64,
    pub deals: i64,
    pub tasks: i64,
}

/// One pipeline column: how many deals sit in a stage and their total value.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StageSlice {
    pub stage: String,
    pub deal_count: i64,
    pub amount_cents: i64,
}

/// Outbox rows per delivery status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutboxSlice {
    pub status: String,
    pub event_count: i64,
}
