use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::sign::level::Clock;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
    /// Time source for hour bucketing. `SystemClock` in production.
    pub clock: Arc<dyn Clock>,
}
