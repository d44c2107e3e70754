//! Repository for the `tasks` table.

use sqlx::PgPool;

use hiperflow_core::types::DbId;

use crate::models::task::{CreateTask, DueFilter, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, team_id, title, notes, due_at, is_done, deal_id, contact_id, \
                        owner_id, created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    pub async fn create(
        pool: &PgPool,
        team_id: DbId,
        owner_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (team_id, owner_id, title, notes, due_at, deal_id, contact_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(team_id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.notes)
            .bind(input.due_at)
            .bind(input.deal_id)
            .bind(input.contact_id)
            .fetch_one(pool)
            .await
    }

    /// List a team's tasks, optionally filtered by done state and agenda
    /// window.
    ///
    /// Open tasks sort by due date (soonest first, undated last), done tasks
    /// by most recently updated. The `due` fragments come from a closed enum,
    /// never from user input.
    pub async fn list(
        pool: &PgPool,
        team_id: DbId,
        is_done: Option<bool>,
        due: Option<DueFilter>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let due_clause = match due {
            Some(DueFilter::Overdue) => " AND is_done = false AND due_at < NOW()",
            Some(DueFilter::Today) => {
                " AND due_at >= date_trunc('day', NOW()) \
                 AND due_at < date_trunc('day', NOW()) + INTERVAL '1 day'"
            }
            Some(DueFilter::Upcoming) => " AND is_done = false AND due_at >= NOW()",
            None => "",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE team_id = $1 AND ($2::BOOLEAN IS NULL OR is_done = $2){due_clause}
             ORDER BY is_done ASC, due_at ASC NULLS LAST, updated_at DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(team_id)
            .bind(is_done)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a task by ID within a team.
    pub async fn find_by_id(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE team_id = $1 AND id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(team_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists in the team.
    pub async fn update(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($3, title),
                notes = COALESCE($4, notes),
                due_at = COALESCE($5, due_at),
                is_done = COALESCE($6, is_done),
                deal_id = COALESCE($7, deal_id),
                contact_id = COALESCE($8, contact_id)
             WHERE team_id = $1 AND id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(team_id)
            .bind(id)
            .bind(&input.title)
            .bind(&input.notes)
            .bind(input.due_at)
            .bind(input.is_done)
            .bind(input.deal_id)
            .bind(input.contact_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a task as done.
    ///
    /// Returns `None` if no row with the given `id` exists in the team.
    pub async fn complete(
        pool: &PgPool,
        team_id: DbId,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET is_done = true WHERE team_id = $1 AND id = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(team_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task. Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, team_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE team_id = $1 AND id = $2")
            .bind(team_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
