//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use hiperflow_core::types::{DbId, Timestamp};

/// A task row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub team_id: DbId,
    pub title: String,
    pub notes: Option<String>,
    pub due_at: Option<Timestamp>,
    pub is_done: bool,
    pub deal_id: Option<DbId>,
    pub contact_id: Option<DbId>,
    pub owner_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new task.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub notes: Option<String>,
    pub due_at: Option<Timestamp>,
    pub deal_id: Option<DbId>,
    pub contact_id: Option<DbId>,
}

/// DTO for updating an existing task. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due_at: Option<Timestamp>,
    pub is_done: Option<bool>,
    pub deal_id: Option<DbId>,
    pub contact_id: Option<DbId>,
}

/// Agenda window filter for task listing (`?due=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    /// Open tasks whose due date has passed.
    Overdue,
    /// Tasks due within the current calendar day (done or not).
    Today,
    /// Open tasks due now or later.
    Upcoming,
}

impl DueFilter {
    pub fn parse(s: &str) -> Option<DueFilter> {
        match s {
            "overdue" => Some(DueFilter::Overdue),
            "today" => Some(DueFilter::Today),
            "upcoming" => Some(DueFilter::Upcoming),
            _ => None,
        }
    }
}
