//! Route definitions for the `/saleflow` resource (kanban board).

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::saleflow;
use crate::state::AppState;

/// Routes mounted at `/saleflow`.
///
/// ```text
/// GET  /board  -> board (active deals grouped by stage)
/// POST /flows  -> create_flow (emits saleflow.flow.created)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/board", get(saleflow::board))
        .route("/flows", post(saleflow::create_flow))
}
