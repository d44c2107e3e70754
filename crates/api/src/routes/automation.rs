//! Route definitions for the `/automations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::automation;
use crate::state::AppState;

/// Routes mounted at `/automations`. Mutations require the admin role.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create (admin)
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update (admin)
/// DELETE /{id}                    -> delete (admin)
/// GET    /{id}/deliveries         -> list_deliveries
/// POST   /{id}/test               -> test (admin)
/// POST   /deliveries/{id}/replay  -> replay_delivery (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(automation::list).post(automation::create))
        .route(
            "/{id}",
            get(automation::get_by_id)
                .put(automation::update)
                .delete(automation::delete),
        )
        .route("/{id}/deliveries", get(automation::list_deliveries))
        .route("/{id}/test", post(automation::test))
        .route("/deliveries/{id}/replay", post(automation::replay_delivery))
}
