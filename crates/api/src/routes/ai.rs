//! Route definitions for the `/ai` flows.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// POST /social-post -> social_post (503 when unconfigured)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/social-post", post(ai::social_post))
}
