//! Route definitions for the `/deals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::deal;
use crate::state::AppState;

/// Routes mounted at `/deals`.
///
/// ```text
/// GET    /            -> list (?stage= filter)
/// POST   /            -> create (emits saleflow.deal.created)
/// GET    /{id}        -> get_by_id
/// PUT    /{id}        -> update
/// DELETE /{id}        -> delete
/// POST   /{id}/stage  -> change_stage (emits saleflow.stage.changed)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(deal::list).post(deal::create))
        .route(
            "/{id}",
            get(deal::get_by_id).put(deal::update).delete(deal::delete),
        )
        .route("/{id}/stage", post(deal::change_stage))
}
