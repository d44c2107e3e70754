//! Handlers for the `/saleflow` resource: the kanban board read model and
//! the quick-create form that feeds it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hiperflow_core::stage::{DealStage, PIPELINE_STAGES};
use hiperflow_db::models::deal::{CreateDeal, Deal};
use hiperflow_db::repositories::DealRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::deal::{emit_created, parse_stage, resolve_company, resolve_contact};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One kanban column: a pipeline stage with its active deals.
#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub stage: DealStage,
    pub deals: Vec<Deal>,
    pub total_amount_cents: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/saleflow/board
///
/// Active deals grouped into pipeline-ordered columns with per-stage value
/// totals. Closed and discarded deals stay off the board.
pub async fn board(user: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let deals = DealRepo::list_for_board(&state.pool, user.team_id).await?;

    let mut columns: Vec<BoardColumn> = PIPELINE_STAGES
        .iter()
        .map(|stage| BoardColumn {
            stage: *stage,
            deals: Vec::new(),
            total_amount_cents: 0,
        })
        .collect();

    for deal in deals {
        // ck_deals_stage guarantees the parse; a miss would mean a broken row.
        if let Some(stage) = DealStage::parse(&deal.stage) {
            let column = &mut columns[stage.position()];
            column.total_amount_cents += deal.amount_cents;
            column.deals.push(deal);
        }
    }

    Ok(Json(DataResponse { data: columns }))
}

/// POST /api/v1/saleflow/flows
///
/// Quick-create from the board. Same write as `POST /deals` but emits
/// `saleflow.flow.created`, whose deep link lands on the board.
pub async fn create_flow(
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
        "Flow created from board"
    );

    emit_created(&state, &user, &deal, true).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: deal })))
}
