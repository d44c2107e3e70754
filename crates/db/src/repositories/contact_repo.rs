//! Repository for the `contacts` table.

use sqlx::PgPool;

use hiperflow_core::enrichment::EnrichableFields;
use hiperflow_core::types::DbId;

use crate::models::contact::{Contact, CreateContact, UpdateContact};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, team_id, name, email, phone, job_title, company_id, company_name, \
                        city, country, linkedin_url, twitter_url, enriched, search_text, \
                        created_at, updated_at";

/// Provides CRUD and search operations for contacts.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a new contact, returning the created row.
    ///
    /// The company link and `search_text` are resolved by the caller before
    /// the insert.
    pub async fn create(
        pool: &PgPool,
        team_id: DbId,
        input: &CreateContact,
        company_id: Option<DbId>,
        company_name: Option<&str>,
        search_text: &str,
    ) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (team_id, name, email, phone, job_title, company_id, \
                                   company_name, city, country, linkedin_url, twitter_url, \
                                   search_text)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(team_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.job_title)
            .bind(company_id)
            .bind(company_name)
            .bind(&input.city)
            .bind(&input.country)
            .bind(&input.linkedin_url)
            .bind(&input.twitter_url)
            .bind(search_text)
            .fetch_one(pool)
            .await
    }

    /// List a team's contacts, newest first, optionally filtered by a
    /// case-insensitive substring match over `search_text`.
    pub async fn list(
        pool: &PgPool,
        team_id: DbId,
        like_pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Contact>, sqlx::Error> {
        match like_pattern {
            Some(pattern) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM contacts
                     WHERE team_id = $1 AND search_text ILIKE $2
                     ORDER BY created_at DESC LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Contact>(&query)
                    .bind(team_id)
                    .bind(pattern)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM contacts WHERE team_id = $1
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Contact>(&query)
                    .bind(team_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// Find a contact by ID within a team.
    pub async fn find_by_id(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contacts WHERE team_id = $1 AND id = $2");
        sqlx::query_as::<_, Contact>(&query)
            .bind(team_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a contact. Only non-`None` fields in `input` are applied;
    /// the company link and `search_text` are always rewritten because the
    /// caller recomputes them from the merged state.
    ///
    /// Returns `None` if no row with the given `id` exists in the team.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
        input: &UpdateContact,
        company_id: Option<DbId>,
        company_name: Option<&str>,
        search_text: &str,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts SET
                name = COALESCE($3, name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                job_title = COALESCE($6, job_title),
                company_id = $7,
                company_name = $8,
                city = COALESCE($9, city),
                country = COALESCE($10, country),
                linkedin_url = COALESCE($11, linkedin_url),
                twitter_url = COALESCE($12, twitter_url),
                search_text = $13
             WHERE team_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(team_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.job_title)
            .bind(company_id)
            .bind(company_name)
            .bind(&input.city)
            .bind(&input.country)
            .bind(&input.linkedin_url)
            .bind(&input.twitter_url)
            .bind(search_text)
            .fetch_optional(pool)
            .await
    }

    /// Write the merged enrichment result and flag the contact as enriched.
    ///
    /// Returns `None` if no row with the given `id` exists in the team.
    pub async fn apply_enrichment(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
        fields: &EnrichableFields,
        search_text: &str,
    ) -> Result<Option<Contact>, sqlx::Error> {
        let query = format!(
            "UPDATE contacts SET
                job_title = $3,
                city = $4,
                country = $5,
                linkedin_url = $6,
                twitter_url = $7,
                enriched = true,
                search_text = $8
             WHERE team_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(team_id)
            .bind(id)
            .bind(&fields.job_title)
            .bind(&fields.city)
            .bind(&fields.country)
            .bind(&fields.linkedin_url)
            .bind(&fields.twitter_url)
            .bind(search_text)
            .fetch_optional(pool)
            .await
    }

    /// Delete a contact. Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, team_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE team_id = $1 AND id = $2")
            .bind(team_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
