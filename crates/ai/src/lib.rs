//! HiperFlow AI flows backed by a hosted generative model.
//!
//! [`ModelClient`] wraps the model's REST API; [`enrichment`] and [`social`]
//! build the two product flows on top of it. The whole crate is optional at
//! runtime: [`ModelConfig::from_env`] returns `None` when no API key is
//! configured and the API serves 503 for the AI endpoints instead.

pub mod client;
pub mod enrichment;
pub mod social;

pub use client::{ModelClient, ModelConfig, ModelError};
pub use enrichment::{enrich_contact, ContactProfile, EnrichmentOutcome};
pub use social::{generate_social_post, GeneratedPost};
