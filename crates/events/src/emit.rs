//! Fan-out of domain events into the outbox.
//!
//! Emission is bookkeeping only: it records one pending outbox row per
//! matching automation and returns. The dispatcher picks the rows up on its
//! own schedule, so a slow or down receiver never blocks an API request.

use hiperflow_core::types::DbId;
use hiperflow_db::repositories::{AutomationRepo, OutboxRepo};
use hiperflow_db::DbPool;

use crate::event::FlowEvent;

/// Writes events into the outbox, one row per subscribed automation.
pub struct EventEmitter;

impl EventEmitter {
    /// Fan an event out to every active automation of the event's team that
    /// subscribes to its type. Returns the ids of the newly created outbox
    /// rows; automations that already hold a row for this event's key are
    /// skipped.
    pub async fn emit(pool: &DbPool, event: &FlowEvent) -> Result<Vec<DbId>, sqlx::Error> {
        let automations =
            AutomationRepo::list_active_for_event(pool, event.team_id, event.event_type).await?;
        if automations.is_empty() {
            tracing::debug!(
                event_type = event.event_type,
                team_id = event.team_id,
                "no automations subscribed, event dropped"
            );
            return Ok(Vec::new());
        }

        let event_key = event.event_key();
        let mut enqueued = Vec::with_capacity(automations.len());
        for automation in &automations {
            let record = OutboxRepo::enqueue(
                pool,
                automation.id,
                event.team_id,
                event.event_type,
                &event_key,
                event.deal_id,
                &event.payload,
            )
            .await?;
            match record {
                Some(record) => enqueued.push(record.id),
                None => tracing::debug!(
                    automation_id = automation.id,
                    event_key = %event_key,
                    "outbox row already exists, skipping duplicate"
                ),
            }
        }

        tracing::info!(
            event_type = event.event_type,
            team_id = event.team_id,
            enqueued = enqueued.len(),
            "event fanned out to outbox"
        );
        Ok(enqueued)
    }
}
