use std::sync::Arc;

use hiperflow_ai::ModelClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hiperflow_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Generative model client. `None` when `GENAI_API_KEY` is not set;
    /// the AI endpoints answer 503 in that case.
    pub model_client: Option<Arc<ModelClient>>,
}
