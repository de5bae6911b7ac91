mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod providers;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::providers::ProviderRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DevProfile API v{}", env!("CARGO_PKG_VERSION"));

    let providers = Arc::new(ProviderRegistry::from_config(&config)?);
    info!(
        "Profile providers initialized (cache TTLs: github {}s, leetcode {}s, hackerrank {}s)",
        config.github_cache_ttl.as_secs(),
        config.leetcode_cache_ttl.as_secs(),
        config.hackerrank_cache_ttl.as_secs()
    );

    let llm = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(client)
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; narrative endpoint disabled");
            None
        }
    };

    spawn_cache_janitor(providers.clone(), config.github_cache_ttl);

    let state = AppState {
        config: config.clone(),
        providers,
        llm,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops expired cache entries that were never read again.
fn spawn_cache_janitor(providers: Arc<ProviderRegistry>, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every.max(std::time::Duration::from_secs(60)));
        loop {
            interval.tick().await;
            let purged = providers.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "purged expired cache entries");
            }
        }
    });
}
