//! Repository for the `teams` table.

use sqlx::PgPool;

use hiperflow_core::types::DbId;

use crate::models::team::Team;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides operations for teams (tenants).
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new team, returning the created row.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Team, sqlx::Error> {
        let query = format!("INSERT INTO teams (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Team>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Find a team by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
