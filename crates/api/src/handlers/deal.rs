//! Handlers for the `/deals` resource.
//!
//! Deal creation and stage transitions emit events into the outbox. Emission
//! is bookkeeping on the request path; delivery happens in the background
//! dispatcher, and an emission failure is logged but never fails the request
//! that already committed its write.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hiperflow_core::error::CoreError;
use hiperflow_core::search::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use hiperflow_core::stage::{DealStage, DealStatus};
use hiperflow_core::types::DbId;
use hiperflow_db::models::deal::{
    CompanySnapshot, ContactSnapshot, CreateDeal, Deal, UpdateDeal,
};
use hiperflow_db::repositories::{CompanyRepo, ContactRepo, DealRepo, UserRepo};
use hiperflow_events::{EventEmitter, FlowEvent};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::DealListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /deals/{id}/stage`.
#[derive(Debug, Deserialize)]
pub struct StageChangeRequest {
    pub stage: String,
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/deals
///
/// Emits `saleflow.deal.created` after the insert.
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDeal>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let stage = parse_stage(input.stage.as_deref())?.unwrap_or(DealStage::Potencial);
    let contact = resolve_contact(&state, user.team_id, input.contact_id).await?;
    let company = resolve_company(&state, user.team_id, input.company_id).await?;

    let deal = DealRepo::create(
        &state.pool,
        user.team_id,
        user.user_id,
        &input,
        stage.as_str(),
        &contact,
        &company,
    )
    .await?;

    tracing::info!(
        deal_id = deal.id,
        team_id = user.team_id,
        stage = %deal.stage,
        "Deal created"
    );

    emit_created(&state, &user, &deal, false).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: deal })))
}

/// GET /api/v1/deals
///
/// Supports `?stage=` filtering; unknown stage values are rejected.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DealListParams>,
) -> AppResult<impl IntoResponse> {
    let stage = parse_stage(params.stage.as_deref())?;
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let deals = DealRepo::list(
        &state.pool,
        user.team_id,
        stage.map(|s| s.as_str()),
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: deals }))
}

/// GET /api/v1/deals/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deal = DealRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;

    Ok(Json(DataResponse { data: deal }))
}

/// PUT /api/v1/deals/{id}
///
/// Stage is not updatable here; moves go through the transition endpoint so
/// every one of them reaches the outbox.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDeal>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    if let Some(status) = input.status.as_deref() {
        if DealStatus::parse(status).is_none() {
            return Err(AppError::BadRequest(format!("Unknown deal status: {status}")));
        }
    }

    let contact = resolve_contact(&state, user.team_id, input.contact_id).await?;
    let company = resolve_company(&state, user.team_id, input.company_id).await?;

    let deal = DealRepo::update(&state.pool, user.team_id, id, &input, &contact, &company)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;

    Ok(Json(DataResponse { data: deal }))
}

/// DELETE /api/v1/deals/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = DealRepo::delete(&state.pool, user.team_id, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Deal", id }));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Stage transition
// ---------------------------------------------------------------------------

/// POST /api/v1/deals/{id}/stage
///
/// The kanban move. A transition to the current stage is a no-op: 200 with
/// the unchanged deal, no write, no event. Everything else updates the row
/// and emits `saleflow.stage.changed`.
pub async fn change_stage(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StageChangeRequest>,
) -> AppResult<impl IntoResponse> {
    let target = DealStage::parse(&input.stage)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown stage: {}", input.stage)))?;

    let existing = DealRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;

    if existing.stage == target.as_str() {
        return Ok(Json(DataResponse { data: existing }));
    }

    let moved = DealRepo::set_stage(&state.pool, user.team_id, id, target.as_str()).await?;
    let Some(deal) = moved else {
        // Lost a race with an identical move; the row already matches.
        let deal = DealRepo::find_by_id(&state.pool, user.team_id, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound { entity: "Deal", id }))?;
        return Ok(Json(DataResponse { data: deal }));
    };

    tracing::info!(
        deal_id = deal.id,
        team_id = user.team_id,
        from = %existing.stage,
        to = %deal.stage,
        "Deal stage changed"
    );

    let event = FlowEvent::stage_changed(&deal, &existing.stage);
    if let Err(e) = EventEmitter::emit(&state.pool, &event).await {
        tracing::error!(error = %e, deal_id = deal.id, "Failed to enqueue stage change event");
    }

    Ok(Json(DataResponse { data: deal }))
}

// ---------------------------------------------------------------------------
// Shared helpers (also used by the saleflow handlers)
// ---------------------------------------------------------------------------

/// Parse an optional stage string, rejecting unknown values.
pub(crate) fn parse_stage(stage: Option<&str>) -> Result<Option<DealStage>, AppError> {
    match stage {
        None => Ok(None),
        Some(s) => DealStage::parse(s)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown stage: {s}"))),
    }
}

/// Resolve a contact id into the denormalized snapshot stored on the deal.
pub(crate) async fn resolve_contact(
    state: &AppState,
    team_id: DbId,
    contact_id: Option<DbId>,
) -> Result<ContactSnapshot, AppError> {
    let Some(id) = contact_id else {
        return Ok(ContactSnapshot::default());
    };
    let contact = ContactRepo::find_by_id(&state.pool, team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;
    Ok(ContactSnapshot {
        contact_id: Some(contact.id),
        contact_name: Some(contact.name),
        contact_email: contact.email,
    })
}

/// Resolve a company id into the denormalized snapshot stored on the deal.
pub(crate) async fn resolve_company(
    state: &AppState,
    team_id: DbId,
    company_id: Option<DbId>,
) -> Result<CompanySnapshot, AppError> {
    let Some(id) = company_id else {
        return Ok(CompanySnapshot::default());
    };
    let company = CompanyRepo::find_by_id(&state.pool, team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Company",
            id,
        }))?;
    Ok(CompanySnapshot {
        company_id: Some(company.id),
        company_name: Some(company.name),
    })
}

/// Emit a creation event for a new deal. `from_board` picks the flow-created
/// event type used by the quick-create form.
pub(crate) async fn emit_created(state: &AppState, user: &AuthUser, deal: &Deal, from_board: bool) {
    let owner_username = match UserRepo::find_by_id(&state.pool, user.user_id).await {
        Ok(Some(owner)) => owner.username,
        Ok(None) => String::new(),
        Err(e) => {
            tracing::error!(error = %e, deal_id = deal.id, "Failed to load owner for deal event");
            return;
        }
    };

    let link = format!(
        "{}/saleflow?deal={}",
        state.config.public_base_url, deal.id
    );

    let event = if from_board {
        FlowEvent::flow_created(deal, &owner_username, &link)
    } else {
        FlowEvent::deal_created(deal, &owner_username, &link)
    };

    if let Err(e) = EventEmitter::emit(&state.pool, &event).await {
        tracing::error!(error = %e, deal_id = deal.id, "Failed to enqueue deal creation event");
    }
}
