//! Shared domain types and pure business logic for HiperFlow.
//!
//! This crate has no database or network dependencies. Everything here is
//! deterministic and unit-testable: the deal stage machine, outbox event-key
//! derivation, retry backoff, webhook payload signing, search-text
//! normalization, and the enrichment merge heuristic.

pub mod enrichment;
pub mod error;
pub mod events;
pub mod outbox;
pub mod roles;
pub mod search;
pub mod signing;
pub mod stage;
pub mod types;

pub use error::CoreError;
