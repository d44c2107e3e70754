//! Automation (outbound webhook target) model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use hiperflow_core::types::{DbId, Timestamp};

/// A row from the `automations` table.
///
/// An automation is an external endpoint (Make.com, Zapier, a bespoke
/// receiver) that wants a POST for some or all outbound event types.
/// `event_types` is a JSON array of event type names; an empty array
/// subscribes to everything.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Automation {
    pub id: DbId,
    pub team_id: DbId,
    pub name: String,
    /// Free-form platform label (`"make"`, `"zapier"`, ...). Display only.
    pub platform: String,
    pub target_url: String,
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    pub event_types: serde_json::Value,
    pub is_active: bool,
    pub last_run_at: Option<Timestamp>,
    pub last_run_status: Option<String>,
    pub failure_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new automation.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAutomation {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub platform: Option<String>,
    #[validate(url)]
    pub target_url: String,
    pub secret: Option<String>,
    /// Event type names to subscribe to. Empty or omitted means all types.
    pub event_types: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// DTO for updating an existing automation. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAutomation {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub platform: Option<String>,
    #[validate(url)]
    pub target_url: Option<String>,
    pub secret: Option<String>,
    pub event_types: Option<Vec<String>>,
    pub is_active: Option<bool>,
}
