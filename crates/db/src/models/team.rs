//! Team (tenant) entity model.

use serde::Serialize;
use sqlx::FromRow;

use hiperflow_core::types::{DbId, Timestamp};

/// A team row from the `teams` table. Every CRM row belongs to exactly one team.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
