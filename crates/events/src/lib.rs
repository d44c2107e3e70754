//! HiperFlow outbound event infrastructure.
//!
//! This crate owns everything between "a deal changed" and "an external
//! automation received a POST about it":
//!
//! - [`FlowEvent`] — the canonical event envelope. Every emitter builds its
//!   payload through the constructors here, so all three event types share
//!   one schema.
//! - [`EventEmitter`] — fans an event out to every subscribed automation as
//!   idempotent pending rows in the `automation_outbox` table, inside the
//!   request that performed the change.
//! - [`WebhookDelivery`] — a single signed HTTP POST with response status
//!   and latency capture.
//! - [`OutboxDispatcher`] — background loop that claims due outbox rows,
//!   delivers them, and schedules retries with backoff until the attempt
//!   budget is spent.

pub mod dispatcher;
pub mod emit;
pub mod event;
pub mod webhook;

pub use dispatcher::OutboxDispatcher;
pub use emit::EventEmitter;
pub use event::FlowEvent;
pub use webhook::{DeliveryReceipt, WebhookDelivery, WebhookError};
