//! Background delivery of pending outbox records.
//!
//! Polls `automation_outbox` for due rows on a fixed interval using
//! `tokio::time::interval`, POSTs each payload to its automation, and books
//! the outcome back into the row. Delivery is at-least-once: a crash between
//! the POST and the bookkeeping re-delivers on the next poll. Run a single
//! dispatcher per deployment; rows are claimed by plain SELECT.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use hiperflow_core::outbox::retry_delay_secs;
use hiperflow_db::models::outbox::OutboxRecord;
use hiperflow_db::repositories::{AutomationRepo, OutboxRepo};
use hiperflow_db::DbPool;

use crate::webhook::WebhookDelivery;

/// How often the dispatcher polls for due records.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Maximum records claimed per poll.
const BATCH_SIZE: i64 = 20;

/// Polls the outbox and delivers due records.
pub struct OutboxDispatcher {
    pool: DbPool,
    delivery: WebhookDelivery,
}

impl OutboxDispatcher {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            delivery: WebhookDelivery::new(),
        }
    }

    /// Run the dispatch loop until `cancel` is triggered.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            poll_secs = POLL_INTERVAL.as_secs(),
            batch_size = BATCH_SIZE,
            "Outbox dispatcher started"
        );

        let mut interval = tokio::time::interval(POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Outbox dispatcher stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_due().await {
                        tracing::error!(error = %e, "Outbox poll failed");
                    }
                }
            }
        }
    }

    /// Deliver one batch of due records. Bookkeeping errors for a single
    /// record are logged and do not stop the rest of the batch.
    async fn process_due(&self) -> Result<(), sqlx::Error> {
        let due = OutboxRepo::list_due(&self.pool, BATCH_SIZE).await?;
        if due.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = due.len(), "Processing due outbox records");

        for record in due {
            if let Err(e) = self.dispatch_one(&record).await {
                tracing::error!(
                    outbox_id = record.id,
                    error = %e,
                    "Outbox bookkeeping failed"
                );
            }
        }
        Ok(())
    }

    /// Deliver a single record and book the outcome.
    async fn dispatch_one(&self, record: &OutboxRecord) -> Result<(), sqlx::Error> {
        let automation =
            AutomationRepo::find_by_id_unscoped(&self.pool, record.automation_id).await?;
        let Some(automation) = automation else {
            // The automation was deleted between enqueue and dispatch.
            OutboxRepo::record_failure(
                &self.pool,
                record.id,
                None,
                None,
                "automation no longer exists",
                None,
            )
            .await?;
            return Ok(());
        };

        let result = self
            .delivery
            .deliver(
                &automation.target_url,
                automation.secret.as_deref(),
                &record.event_type,
                &record.payload,
            )
            .await;

        match result {
            Ok(receipt) => {
                OutboxRepo::mark_sent(
                    &self.pool,
                    record.id,
                    receipt.response_status,
                    receipt.response_time_ms,
                )
                .await?;
                AutomationRepo::record_run(&self.pool, automation.id, true).await?;
                tracing::info!(
                    outbox_id = record.id,
                    automation_id = automation.id,
                    event_type = %record.event_type,
                    status = receipt.response_status,
                    "Webhook delivered"
                );
            }
            Err(e) => {
                let attempts_made = record.attempt_count + 1;
                let retry_in = retry_delay_secs(attempts_made);
                OutboxRepo::record_failure(
                    &self.pool,
                    record.id,
                    e.response_status(),
                    Some(e.response_time_ms()),
                    &e.to_string(),
                    retry_in,
                )
                .await?;
                AutomationRepo::record_run(&self.pool, automation.id, false).await?;

                match retry_in {
                    Some(secs) => tracing::warn!(
                        outbox_id = record.id,
                        automation_id = automation.id,
                        attempt = attempts_made,
                        retry_in_secs = secs,
                        error = %e,
                        "Webhook delivery failed, will retry"
                    ),
                    None => {
                        AutomationRepo::increment_failure_count(&self.pool, automation.id).await?;
                        tracing::error!(
                            outbox_id = record.id,
                            automation_id = automation.id,
                            attempt = attempts_made,
                            error = %e,
                            "Webhook delivery failed permanently"
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
