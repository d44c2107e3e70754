//! Handlers for the `/companies` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hiperflow_core::error::CoreError;
use hiperflow_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use hiperflow_core::types::DbId;
use hiperflow_db::models::company::{CreateCompany, UpdateCompany};
use hiperflow_db::repositories::CompanyRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/companies
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCompany>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let company = CompanyRepo::create(&state.pool, user.team_id, &input).await?;

    tracing::info!(
        company_id = company.id,
        team_id = user.team_id,
        "Company created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: company })))
}

/// GET /api/v1/companies
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let companies = CompanyRepo::list(&state.pool, user.team_id, limit, offset).await?;

    Ok(Json(DataResponse { data: companies }))
}

/// GET /api/v1/companies/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let company = CompanyRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;

    Ok(Json(DataResponse { data: company }))
}

/// PUT /api/v1/companies/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCompany>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let company = CompanyRepo::update(&state.pool, user.team_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;

    Ok(Json(DataResponse { data: company }))
}

/// DELETE /api/v1/companies/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = CompanyRepo::delete(&state.pool, user.team_id, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
