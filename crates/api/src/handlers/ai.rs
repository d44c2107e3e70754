//! Handlers for the `/ai` flows.
//!
//! Contact enrichment lives on the contacts resource; this module holds the
//! standalone generation endpoints. All of them 503 when the server has no
//! model API key configured.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use hiperflow_ai::generate_social_post;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /ai/social-post`.
#[derive(Debug, Deserialize, Validate)]
pub struct SocialPostRequest {
    #[validate(length(min = 1, max = 500, message = "topic must be 1-500 characters"))]
    pub topic: String,
}

/// POST /api/v1/ai/social-post
///
/// Generate a short social media post about a topic. Model failures surface
/// as 502; there is no retry and no degraded result for this flow.
pub async fn social_post(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SocialPostRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let model_client = state
        .model_client
        .as_ref()
        .ok_or(AppError::NotConfigured("AI generation"))?;

    let post = generate_social_post(model_client, input.topic.trim())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Social post generation failed");
            AppError::Upstream("Model request failed".into())
        })?;

    Ok(Json(DataResponse { data: post }))
}
