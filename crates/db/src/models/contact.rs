//! Contact entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use hiperflow_core::types::{DbId, Timestamp};

/// A contact row from the `contacts` table.
///
/// `company_name` is denormalized alongside `company_id` so list views and
/// event payloads never need a join. `search_text` is maintained on every
/// write from name, email, company name, and job title.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: DbId,
    pub team_id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub company_id: Option<DbId>,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub linkedin_url: Option<String>,
    pub twitter_url: Option<String>,
    /// Set once an enrichment run filled at least one empty field.
    pub enriched: bool,
    #[serde(skip_serializing)]
    pub search_text: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new contact.
///
/// `company_name` is resolved to a company row (existing or newly created)
/// before insert; the handler does the lookup.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContact {
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub twitter_url: Option<String>,
}

/// DTO for updating an existing contact. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContact {
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[validate(url)]
    pub linkedin_url: Option<String>,
    #[validate(url)]
    pub twitter_url: Option<String>,
}
