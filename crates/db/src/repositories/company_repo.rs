//! Repository for the `companies` table.

use sqlx::PgPool;

use hiperflow_core::types::DbId;

use crate::models::company::{Company, CreateCompany, UpdateCompany};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, team_id, name, website, industry, city, country, created_at, updated_at";

/// Provides CRUD operations for companies.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a new company, returning the created row.
    pub async fn create(
        pool: &PgPool,
        team_id: DbId,
        input: &CreateCompany,
    ) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (team_id, name, website, industry, city, country)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(team_id)
            .bind(&input.name)
            .bind(&input.website)
            .bind(&input.industry)
            .bind(&input.city)
            .bind(&input.country)
            .fetch_one(pool)
            .await
    }

    /// List a team's companies, newest first.
    pub async fn list(
        pool: &PgPool,
        team_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies WHERE team_id = $1
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(team_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a company by ID within a team.
    pub async fn find_by_id(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE team_id = $1 AND id = $2");
        sqlx::query_as::<_, Company>(&query)
            .bind(team_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a company by name within a team, case-insensitively.
    pub async fn find_by_name(
        pool: &PgPool,
        team_id: DbId,
        name: &str,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM companies WHERE team_id = $1 AND LOWER(name) = LOWER($2)"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(team_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Return the team's company with the given name, creating it if absent.
    ///
    /// Matching is case-insensitive: creating `"ACME"` next to an existing
    /// `"acme"` returns the existing row. A unique index on
    /// `(team_id, LOWER(name))` closes the race between the lookup and the
    /// insert; on conflict the insert affects nothing and the lookup is
    /// retried.
    pub async fn lookup_or_create(
        pool: &PgPool,
        team_id: DbId,
        name: &str,
    ) -> Result<Company, sqlx::Error> {
        if let Some(existing) = Self::find_by_name(pool, team_id, name).await? {
            return Ok(existing);
        }

        let query = format!(
            "INSERT INTO companies (team_id, name) VALUES ($1, $2)
             ON CONFLICT (team_id, LOWER(name)) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Company>(&query)
            .bind(team_id)
            .bind(name)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(company) => Ok(company),
            // Lost the race; the row now exists.
            None => match Self::find_by_name(pool, team_id, name).await? {
                Some(company) => Ok(company),
                None => Err(sqlx::Error::RowNotFound),
            },
        }
    }

    /// Update a company. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists in the team.
    pub async fn update(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($3, name),
                website = COALESCE($4, website),
                industry = COALESCE($5, industry),
                city = COALESCE($6, city),
                country = COALESCE($7, country)
             WHERE team_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(team_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.website)
            .bind(&input.industry)
            .bind(&input.city)
            .bind(&input.country)
            .fetch_optional(pool)
            .await
    }

    /// Delete a company. Linked contacts and deals keep their denormalized
    /// name but lose the reference (FK is `ON DELETE SET NULL`).
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, team_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE team_id = $1 AND id = $2")
            .bind(team_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
