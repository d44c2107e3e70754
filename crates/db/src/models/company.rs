//! Company entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use hiperflow_core::types::{DbId, Timestamp};

/// A company row from the `companies` table.
///
/// Company names are unique per team, case-insensitively. Contact and deal
/// creation may reference companies by name and will reuse an existing row
/// instead of inserting a homograph.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub team_id: DbId,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new company.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    #[validate(url)]
    pub website: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// DTO for updating an existing company. All fields are optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompany {
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}
