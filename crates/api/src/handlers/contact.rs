//! Handlers for the `/contacts` resource.
//!
//! Contacts carry a denormalized `company_name` plus an optional FK to the
//! team's companies; both are resolved here, on write, via
//! `CompanyRepo::lookup_or_create`. The `search_text` column is likewise
//! recomputed on every write so `?q=` filtering never needs a join.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hiperflow_ai::{enrich_contact, ContactProfile};
use hiperflow_core::enrichment::EnrichableFields;
use hiperflow_core::error::CoreError;
use hiperflow_core::search::{
    build_like_pattern, build_search_text, clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT,
    MAX_LIST_LIMIT,
};
use hiperflow_core::types::DbId;
use hiperflow_db::models::contact::{Contact, CreateContact, UpdateContact};
use hiperflow_db::repositories::{CompanyRepo, ContactRepo};
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::ContactListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Response body for `POST /contacts/{id}/enrich`.
#[derive(Debug, Serialize)]
pub struct EnrichResponse {
    pub contact: Contact,
    /// True iff the run filled at least one previously-empty field.
    pub enriched: bool,
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/contacts
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateContact>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let company = match trimmed(input.company_name.as_deref()) {
        Some(name) => Some(CompanyRepo::lookup_or_create(&state.pool, user.team_id, name).await?),
        None => None,
    };
    let company_name = company.as_ref().map(|c| c.name.as_str());

    let search_text = build_search_text(&[
        Some(input.name.as_str()),
        input.email.as_deref(),
        company_name,
        input.job_title.as_deref(),
    ]);

    let contact = ContactRepo::create(
        &state.pool,
        user.team_id,
        &input,
        company.as_ref().map(|c| c.id),
        company_name,
        &search_text,
    )
    .await?;

    tracing::info!(
        contact_id = contact.id,
        team_id = user.team_id,
        "Contact created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: contact })))
}

/// GET /api/v1/contacts
///
/// Supports `?q=` substring search over name, email, company and job title.
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ContactListParams>,
) -> AppResult<impl IntoResponse> {
    let like_pattern = params.q.as_deref().and_then(build_like_pattern);
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let contacts = ContactRepo::list(
        &state.pool,
        user.team_id,
        like_pattern.as_deref(),
        limit,
        offset,
    )
    .await?;

    Ok(Json(DataResponse { data: contacts }))
}

/// GET /api/v1/contacts/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contact = ContactRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    Ok(Json(DataResponse { data: contact }))
}

/// PUT /api/v1/contacts/{id}
///
/// `company_name` semantics: absent keeps the current link, a non-empty value
/// relinks (creating the company if needed), an empty string clears the link.
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContact>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let existing = ContactRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    let (company_id, company_name) = match &input.company_name {
        None => (existing.company_id, existing.company_name.clone()),
        Some(raw) => match trimmed(Some(raw)) {
            Some(name) => {
                let company =
                    CompanyRepo::lookup_or_create(&state.pool, user.team_id, name).await?;
                (Some(company.id), Some(company.name))
            }
            None => (None, None),
        },
    };

    let search_text = build_search_text(&[
        Some(input.name.as_deref().unwrap_or(&existing.name)),
        input.email.as_deref().or(existing.email.as_deref()),
        company_name.as_deref(),
        input
            .job_title
            .as_deref()
            .or(existing.job_title.as_deref()),
    ]);

    let contact = ContactRepo::update(
        &state.pool,
        user.team_id,
        id,
        &input,
        company_id,
        company_name.as_deref(),
        &search_text,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Contact",
        id,
    }))?;

    Ok(Json(DataResponse { data: contact }))
}

/// DELETE /api/v1/contacts/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ContactRepo::delete(&state.pool, user.team_id, id).await?;

    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

/// POST /api/v1/contacts/{id}/enrich
///
/// Ask the model to fill the contact's empty profile fields. Populated fields
/// are never overwritten; a run that fills nothing returns the contact
/// unchanged with `enriched: false`. Returns 503 when no model API key is
/// configured.
pub async fn enrich(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let model_client = state
        .model_client
        .as_ref()
        .ok_or(AppError::NotConfigured("AI enrichment"))?;

    let contact = ContactRepo::find_by_id(&state.pool, user.team_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contact",
            id,
        }))?;

    let profile = ContactProfile {
        name: contact.name.clone(),
        email: contact.email.clone(),
        company_name: contact.company_name.clone(),
        current: EnrichableFields {
            job_title: contact.job_title.clone(),
            city: contact.city.clone(),
            country: contact.country.clone(),
            linkedin_url: contact.linkedin_url.clone(),
            twitter_url: contact.twitter_url.clone(),
        },
    };

    let outcome = enrich_contact(model_client, &profile).await;

    if !outcome.enriched {
        return Ok(Json(DataResponse {
            data: EnrichResponse {
                contact,
                enriched: false,
            },
        }));
    }

    let search_text = build_search_text(&[
        Some(contact.name.as_str()),
        contact.email.as_deref(),
        contact.company_name.as_deref(),
        outcome.fields.job_title.as_deref(),
    ]);

    let updated = ContactRepo::apply_enrichment(
        &state.pool,
        user.team_id,
        id,
        &outcome.fields,
        &search_text,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Contact",
        id,
    }))?;

    tracing::info!(contact_id = id, team_id = user.team_id, "Contact enriched");

    Ok(Json(DataResponse {
        data: EnrichResponse {
            contact: updated,
            enriched: true,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
