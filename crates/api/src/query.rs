//! Shared query parameter types for API handlers.
//!
//! Common query structs that appear across multiple handler modules are
//! extracted here to avoid duplication.

use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Used by any handler that supports paginated listing. Values are clamped
/// via `clamp_limit` / `clamp_offset` before reaching the repository.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for contact listing (`?q=&limit=&offset=`).
///
/// `q` filters by substring over the contact's denormalized search text
/// (name, email, company, job title).
#[derive(Debug, Deserialize)]
pub struct ContactListParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for deal listing (`?stage=&limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct DealListParams {
    pub stage: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for task listing (`?done=&due=&limit=&offset=`).
///
/// `due` accepts `overdue`, `today` or `upcoming` (the agenda windows).
#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub done: Option<bool>,
    pub due: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
