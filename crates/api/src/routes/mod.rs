pub mod ai;
pub mod auth;
pub mod automation;
pub mod company;
pub mod contact;
pub mod dashboard;
pub mod deal;
pub mod health;
pub mod saleflow;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                        register team + admin (public)
/// /auth/login                           login (public)
/// /auth/refresh                         refresh (public)
/// /auth/logout                          logout (requires auth)
///
/// /companies                            list, create
/// /companies/{id}                       get, update, delete
///
/// /contacts                             list (?q=), create
/// /contacts/{id}                        get, update, delete
/// /contacts/{id}/enrich                 AI enrichment (POST)
///
/// /deals                                list (?stage=), create
/// /deals/{id}                           get, update, delete
/// /deals/{id}/stage                     kanban stage transition (POST)
///
/// /saleflow/board                       active deals by stage (GET)
/// /saleflow/flows                       quick-create from board (POST)
///
/// /tasks                                list (?done=, ?due=), create
/// /tasks/{id}                           get, update, delete
/// /tasks/{id}/complete                  mark done (POST)
///
/// /automations                          list, create (admin)
/// /automations/{id}                     get, update, delete (admin writes)
/// /automations/{id}/deliveries          outbox history (GET)
/// /automations/{id}/test                synthetic test event (POST, admin)
/// /automations/deliveries/{id}/replay   reset delivery (POST, admin)
///
/// /dashboard/summary                    analytics read model (GET)
///
/// /ai/social-post                       post generation (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login, refresh, logout).
        .nest("/auth", auth::router())
        // CRM entities.
        .nest("/companies", company::router())
        .nest("/contacts", contact::router())
        .nest("/deals", deal::router())
        // Kanban board read model + quick-create.
        .nest("/saleflow", saleflow::router())
        .nest("/tasks", task::router())
        // Outbound webhook targets and their delivery history.
        .nest("/automations", automation::router())
        // Analytics summary.
        .nest("/dashboard", dashboard::router())
        // Generative flows.
        .nest("/ai", ai::router())
}
