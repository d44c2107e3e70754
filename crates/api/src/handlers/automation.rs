//! Handlers for automation management (outbound webhook targets).
//!
//! Provides CRUD for automations, delivery history, test delivery, and
//! replay. Mutations require the admin role via [`RequireAdmin`]; members
//! can read. The `secret` column never serializes, so it stays write-only
//! through this API.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hiperflow_core::error::CoreError;
use hiperflow_core::events::is_subscribable;
use hiperflow_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use hiperflow_core::types::DbId;
use hiperflow_db::models::automation::{CreateAutomation, UpdateAutomation};
use hiperflow_db::repositories::{AutomationRepo, OutboxRepo};
use hiperflow_events::FlowEvent;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Automation CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/automations
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAutomation>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_event_types(input.event_types.as_deref())?;

    let automation = AutomationRepo::create(&state.pool, admin.team_id, &input).await?;

    tracing::info!(
        automation_id = automation.id,
        team_id = admin.team_id,
        target_url = %automation.target_url,
        "Automation created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: automation })))
}

/// GET /api/v1/automations
pub async fn list(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let automations = AutomationRepo::list(&state.pool, user.team_id).await?;
    Ok(Json(DataResponse { data: automations }))
}

/// GET /api/v1/automations/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let automation = AutomationRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Automation",
            id,
        }))?;

    Ok(Json(DataResponse { data: automation }))
}

/// PUT /api/v1/automations/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAutomation>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    validate_event_types(input.event_types.as_deref())?;

    let automation = AutomationRepo::update(&state.pool, admin.team_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Automation",
            id,
        }))?;

    tracing::info!(
        automation_id = id,
        user_id = admin.user_id,
        "Automation updated"
    );

    Ok(Json(DataResponse { data: automation }))
}

/// DELETE /api/v1/automations/{id}
///
/// Cascade deletes the automation's outbox history.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = AutomationRepo::delete(&state.pool, admin.team_id, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Automation",
            id,
        }));
    }

    tracing::info!(
        automation_id = id,
        user_id = admin.user_id,
        "Automation deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Delivery management
// ---------------------------------------------------------------------------

/// GET /api/v1/automations/{id}/deliveries
///
/// Paginated outbox history for one automation, newest first.
pub async fn list_deliveries(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    // Verify the automation exists in this team.
    AutomationRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Automation",
            id,
        }))?;

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let deliveries =
        OutboxRepo::list_for_automation(&state.pool, user.team_id, id, limit, offset).await?;

    Ok(Json(DataResponse { data: deliveries }))
}

/// POST /api/v1/automations/{id}/test
///
/// Enqueue a synthetic test event for this automation only, bypassing its
/// event type subscriptions. The dispatcher delivers it like any other row.
pub async fn test(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let automation = AutomationRepo::find_by_id(&state.pool, admin.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Automation",
            id,
        }))?;

    let event = FlowEvent::automation_test(admin.team_id, automation.id, &automation.name);
    let record = OutboxRepo::enqueue(
        &state.pool,
        automation.id,
        admin.team_id,
        event.event_type,
        &event.event_key(),
        None,
        &event.payload,
    )
    .await?
    .ok_or_else(|| {
        AppError::InternalError("Test event collided with an existing outbox row".into())
    })?;

    tracing::info!(
        automation_id = id,
        outbox_id = record.id,
        user_id = admin.user_id,
        "Test delivery enqueued"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// POST /api/v1/automations/deliveries/{id}/replay
///
/// Reset a delivery to pending for the dispatcher to pick up again.
pub async fn replay_delivery(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let replayed = OutboxRepo::replay(&state.pool, admin.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "OutboxRecord",
            id,
        }))?;

    tracing::info!(
        outbox_id = id,
        automation_id = replayed.automation_id,
        user_id = admin.user_id,
        "Delivery replayed"
    );

    Ok(Json(DataResponse { data: replayed }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reject subscription lists naming event types that will never fire.
fn validate_event_types(event_types: Option<&[String]>) -> Result<(), AppError> {
    if let Some(names) = event_types {
        for name in names {
            if !is_subscribable(name) {
                return Err(AppError::BadRequest(format!("Unknown event type: {name}")));
            }
        }
    }
    Ok(())
}
