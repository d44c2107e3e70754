//! Deal entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use hiperflow_core::types::{DbId, Timestamp};

/// A deal row from the `deals` table.
///
/// Contact and company are stored as denormalized snapshots (id + name +
/// email) taken at link time; board cards and webhook payloads read them
/// without joins. Money is integer cents plus an ISO 4217 currency code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deal {
    pub id: DbId,
    pub team_id: DbId,
    pub title: String,
    pub stage: String,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub owner_id: DbId,
    pub contact_id: Option<DbId>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub company_id: Option<DbId>,
    pub company_name: Option<String>,
    pub next_action: Option<String>,
    pub last_activity_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new deal. Stage defaults to `potencial` when omitted.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeal {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub stage: Option<String>,
    pub amount_cents: Option<i64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    pub contact_id: Option<DbId>,
    pub company_id: Option<DbId>,
    pub next_action: Option<String>,
}

/// DTO for updating an existing deal. All fields are optional.
///
/// Stage is deliberately absent: stage changes go through the transition
/// endpoint so the outbox sees every move.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDeal {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub amount_cents: Option<i64>,
    #[validate(length(equal = 3))]
    pub currency: Option<String>,
    pub status: Option<String>,
    pub contact_id: Option<DbId>,
    pub company_id: Option<DbId>,
    pub next_action: Option<String>,
}

/// Resolved contact snapshot bound at insert/update time.
#[derive(Debug, Clone, Default)]
pub struct ContactSnapshot {
    pub contact_id: Option<DbId>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

/// Resolved company snapshot bound at insert/update time.
#[derive(Debug, Clone, Default)]
pub struct CompanySnapshot {
    pub company_id: Option<DbId>,
    pub company_name: Option<String>,
}
