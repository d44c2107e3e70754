//! Repository for the `deals` table.

use sqlx::PgPool;

use hiperflow_core::types::DbId;

use crate::models::deal::{CompanySnapshot, ContactSnapshot, CreateDeal, Deal, UpdateDeal};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, team_id, title, stage, amount_cents, currency, status, owner_id, \
                        contact_id, contact_name, contact_email, company_id, company_name, \
                        next_action, last_activity_at, created_at, updated_at";

/// Provides CRUD and pipeline operations for deals.
pub struct DealRepo;

impl DealRepo {
    /// Insert a new deal, returning the created row.
    ///
    /// `stage` is already validated and the contact/company snapshots are
    /// resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        team_id: DbId,
        owner_id: DbId,
        input: &CreateDeal,
        stage: &str,
        contact: &ContactSnapshot,
        company: &CompanySnapshot,
    ) -> Result<Deal, sqlx::Error> {
        let query = format!(
            "INSERT INTO deals (team_id, owner_id, title, stage, amount_cents, currency, \
                                contact_id, contact_name, contact_email, company_id, \
                                company_name, next_action)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(team_id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(stage)
            .bind(input.amount_cents.unwrap_or(0))
            .bind(input.currency.as_deref().unwrap_or("EUR"))
            .bind(contact.contact_id)
            .bind(&contact.contact_name)
            .bind(&contact.contact_email)
            .bind(company.company_id)
            .bind(&company.company_name)
            .bind(&input.next_action)
            .fetch_one(pool)
            .await
    }

    /// List a team's deals, newest first, optionally filtered by stage.
    pub async fn list(
        pool: &PgPool,
        team_id: DbId,
        stage: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Deal>, sqlx::Error> {
        match stage {
            Some(stage) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM deals WHERE team_id = $1 AND stage = $2
                     ORDER BY created_at DESC LIMIT $3 OFFSET $4"
                );
                sqlx::query_as::<_, Deal>(&query)
                    .bind(team_id)
                    .bind(stage)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {COLUMNS} FROM deals WHERE team_id = $1
                     ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                );
                sqlx::query_as::<_, Deal>(&query)
                    .bind(team_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
        }
    }

    /// All active deals of a team for the kanban board, most recently
    /// touched first. The handler groups them into stage columns.
    pub async fn list_for_board(pool: &PgPool, team_id: DbId) -> Result<Vec<Deal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM deals WHERE team_id = $1 AND status = 'activo'
             ORDER BY last_activity_at DESC"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await
    }

    /// Find a deal by ID within a team.
    pub async fn find_by_id(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
    ) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM deals WHERE team_id = $1 AND id = $2");
        sqlx::query_as::<_, Deal>(&query)
            .bind(team_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a deal. Only non-`None` fields in `input` are applied. When a
    /// new contact or company is linked, its full snapshot is rewritten
    /// together so name/email never mix across links.
    ///
    /// Returns `None` if no row with the given `id` exists in the team.
    pub async fn update(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
        input: &UpdateDeal,
        contact: &ContactSnapshot,
        company: &CompanySnapshot,
    ) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!(
            "UPDATE deals SET
                title = COALESCE($3, title),
                amount_cents = COALESCE($4, amount_cents),
                currency = COALESCE($5, currency),
                status = COALESCE($6, status),
                next_action = COALESCE($7, next_action),
                contact_id = COALESCE($8, contact_id),
                contact_name = CASE WHEN $8::BIGINT IS NOT NULL THEN $9 ELSE contact_name END,
                contact_email = CASE WHEN $8::BIGINT IS NOT NULL THEN $10 ELSE contact_email END,
                company_id = COALESCE($11, company_id),
                company_name = CASE WHEN $11::BIGINT IS NOT NULL THEN $12 ELSE company_name END,
                last_activity_at = NOW()
             WHERE team_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(team_id)
            .bind(id)
            .bind(&input.title)
            .bind(input.amount_cents)
            .bind(&input.currency)
            .bind(&input.status)
            .bind(&input.next_action)
            .bind(contact.contact_id)
            .bind(&contact.contact_name)
            .bind(&contact.contact_email)
            .bind(company.company_id)
            .bind(&company.company_name)
            .fetch_optional(pool)
            .await
    }

    /// Move a deal to a different stage, touching `last_activity_at`.
    ///
    /// The `stage <> $3` guard makes same-stage moves affect zero rows, so
    /// callers that already short-circuit equal stages are protected against
    /// races too.
    ///
    /// Returns `None` if the deal does not exist in the team or is already
    /// in the target stage.
    pub async fn set_stage(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
        stage: &str,
    ) -> Result<Option<Deal>, sqlx::Error> {
        let query = format!(
            "UPDATE deals SET stage = $3, last_activity_at = NOW()
             WHERE team_id = $1 AND id = $2 AND stage <> $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deal>(&query)
            .bind(team_id)
            .bind(id)
            .bind(stage)
            .fetch_optional(pool)
            .await
    }

    /// Delete a deal. Cascade deletes its outbox rows; linked tasks lose the
    /// reference (FK is `ON DELETE SET NULL`).
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, team_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM deals WHERE team_id = $1 AND id = $2")
            .bind(team_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
