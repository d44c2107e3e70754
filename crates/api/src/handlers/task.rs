//! Handlers for the `/tasks` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hiperflow_core::error::CoreError;
use hiperflow_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use hiperflow_core::types::DbId;
use hiperflow_db::models::task::{CreateTask, DueFilter, UpdateTask};
use hiperflow_db::repositories::TaskRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::TaskListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/tasks
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let task = TaskRepo::create(&state.pool, user.team_id, user.user_id, &input).await?;

    tracing::info!(task_id = task.id, team_id = user.team_id, "Task created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/tasks
///
/// Supports `?done=` and the `?due=overdue|today|upcoming` agenda windows.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<impl IntoResponse> {
    let due = match params.due.as_deref() {
        None => None,
        Some(raw) => Some(
            DueFilter::parse(raw)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown due filter: {raw}")))?,
        ),
    };
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let tasks = TaskRepo::list(&state.pool, user.team_id, params.done, due, limit, offset).await?;

    Ok(Json(DataResponse { data: tasks }))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = TaskRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    Ok(Json(DataResponse { data: task }))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let task = TaskRepo::update(&state.pool, user.team_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    Ok(Json(DataResponse { data: task }))
}

/// POST /api/v1/tasks/{id}/complete
pub async fn complete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let task = TaskRepo::complete(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    Ok(Json(DataResponse { data: task }))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TaskRepo::delete(&state.pool, user.team_id, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Task", id }));
    }

    Ok(StatusCode::NO_CONTENT)
}
