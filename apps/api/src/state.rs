use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::providers::ProviderRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Cached platform providers. The caches live as long as the process.
    pub providers: Arc<ProviderRegistry>,
    /// Present only when ANTHROPIC_API_KEY is configured.
    pub llm: Option<LlmClient>,
}
