use std::sync::Arc;

use sqlx::PgPool;

use crate::ai::GenerativeBackend;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable generative backend. Production: Gemini. Tests: a deterministic fake.
    pub ai: Arc<dyn GenerativeBackend>,
    pub config: Config,
}
