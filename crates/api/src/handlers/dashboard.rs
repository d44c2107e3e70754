//! Handler for the `/dashboard` analytics read model.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use hiperflow_core::stage::{DealStage, PIPELINE_STAGES};
use hiperflow_db::models::dashboard::{EntityCounts, StageSlice};
use hiperflow_db::repositories::DashboardRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Everything the dashboard needs in one response.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub counts: EntityCounts,
    /// All six stages in pipeline order, zero-filled where empty.
    pub pipeline: Vec<StageSlice>,
    /// Deals in non-terminal stages.
    pub open_deals: i64,
    pub open_value_cents: i64,
    pub won_deals: i64,
    pub lost_deals: i64,
    pub tasks_due_today: i64,
    pub outbox: OutboxHealth,
}

/// Outbox record counts per delivery status.
#[derive(Debug, Serialize)]
pub struct OutboxHealth {
    pub pending: i64,
    pub sent: i64,
    pub failed: i64,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboard/summary
pub async fn summary(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let counts = DashboardRepo::entity_counts(&state.pool, user.team_id).await?;
    let by_stage = DashboardRepo::deals_by_stage(&state.pool, user.team_id).await?;
    let tasks_due_today = DashboardRepo::tasks_due_today(&state.pool, user.team_id).await?;
    let outbox_slices = DashboardRepo::outbox_by_status(&state.pool, user.team_id).await?;

    // The aggregate omits empty stages; the dashboard wants all six columns.
    let mut pipeline: Vec<StageSlice> = PIPELINE_STAGES
        .iter()
        .map(|stage| StageSlice {
            stage: stage.as_str().to_string(),
            deal_count: 0,
            amount_cents: 0,
        })
        .collect();
    for slice in by_stage {
        if let Some(stage) = DealStage::parse(&slice.stage) {
            pipeline[stage.position()] = slice;
        }
    }

    let mut open_deals = 0;
    let mut open_value_cents = 0;
    let mut won_deals = 0;
    let mut lost_deals = 0;
    for (stage, slice) in PIPELINE_STAGES.iter().zip(&pipeline) {
        match stage {
            DealStage::Ganado => won_deals = slice.deal_count,
            DealStage::Perdido => lost_deals = slice.deal_count,
            _ => {
                open_deals += slice.deal_count;
                open_value_cents += slice.amount_cents;
            }
        }
    }

    let mut outbox = OutboxHealth {
        pending: 0,
        sent: 0,
        failed: 0,
    };
    for slice in outbox_slices {
        match slice.status.as_str() {
            "pending" => outbox.pending = slice.event_count,
            "sent" => outbox.sent = slice.event_count,
            "failed" => outbox.failed = slice.event_count,
            _ => {}
        }
    }

    let summary = DashboardSummary {
        counts,
        pipeline,
        open_deals,
        open_value_cents,
        won_deals,
        lost_deals,
        tasks_due_today,
        outbox,
    };

    Ok(Json(DataResponse { data: summary }))
}
