use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Nothing is required: extraction and scoring run with zero configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// Raises the GitHub API rate limit when set.
    pub github_token: Option<String>,
    /// Narrative enrichment is disabled when absent.
    pub anthropic_api_key: Option<String>,
    pub github_cache_ttl: Duration,
    pub leetcode_cache_ttl: Duration,
    pub hackerrank_cache_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            github_token: optional_env("GITHUB_TOKEN"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            github_cache_ttl: Duration::from_secs(parse_env("GITHUB_CACHE_TTL_SECS", 300)?),
            leetcode_cache_ttl: Duration::from_secs(parse_env("LEETCODE_CACHE_TTL_SECS", 600)?),
            hackerrank_cache_ttl: Duration::from_secs(parse_env(
                "HACKERRANK_CACHE_TTL_SECS",
                1800,
            )?),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            github_token: None,
            anthropic_api_key: None,
            github_cache_ttl: Duration::from_secs(300),
            leetcode_cache_ttl: Duration::from_secs(600),
            hackerrank_cache_ttl: Duration::from_secs(1800),
        }
    }
}

/// Unset or blank counts as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
