//! Platform metric providers.
//!
//! Each provider turns a username into typed metrics over HTTP. Providers are
//! wrapped in a TTL cache, and the registry fetches any subset concurrently.
//! A failed source becomes an absent source; it never blocks a report.

pub mod cache;
pub mod github;
pub mod hackerrank;
pub mod handlers;
pub mod leetcode;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::sources::{
    GithubMetrics, HackerrankMetrics, LeetcodeMetrics, SourceId, SourceMetricsSet,
};
use crate::config::Config;
use crate::errors::AppError;

use self::cache::{SourceCache, DEFAULT_MAX_ENTRIES};
use self::github::GithubProvider;
use self::hackerrank::HackerrankProvider;
use self::leetcode::LeetcodeProvider;

pub const USER_AGENT: &str = "DevProfileAnalyzer";
const HTTP_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{platform} user '{username}' not found")]
    NotFound { platform: SourceId, username: String },

    #[error("{0} rate limit exceeded")]
    RateLimited(SourceId),

    #[error("Invalid username '{0}'")]
    InvalidUsername(String),

    #[error("{platform} returned status {status}")]
    Status { platform: SourceId, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound { .. } => AppError::NotFound(err.to_string()),
            ProviderError::RateLimited(_) => AppError::UpstreamRateLimited(err.to_string()),
            ProviderError::InvalidUsername(_) => AppError::Validation(err.to_string()),
            ProviderError::Status { .. } | ProviderError::Http(_) => {
                AppError::Upstream(err.to_string())
            }
        }
    }
}

/// Fetches one platform's metrics for a username.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    type Metrics: Clone + Send + Sync + 'static;

    fn source(&self) -> SourceId;

    async fn fetch(&self, username: &str) -> Result<Self::Metrics, ProviderError>;
}

/// Usernames go into URL paths, so only plain handle characters are allowed.
pub fn validate_username(username: &str) -> Result<&str, ProviderError> {
    let trimmed = username.trim();
    let valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_USERNAME_LEN
        && trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(trimmed)
    } else {
        Err(ProviderError::InvalidUsername(username.to_string()))
    }
}

/// Maps platform status codes onto provider errors.
pub(crate) fn check_status(
    platform: SourceId,
    username: &str,
    response: Response,
) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status.as_u16() {
        404 => Err(ProviderError::NotFound {
            platform,
            username: username.to_string(),
        }),
        403 | 429 => Err(ProviderError::RateLimited(platform)),
        code => Err(ProviderError::Status {
            platform,
            status: code,
        }),
    }
}

/// Decodes a JSON body after the status check.
pub(crate) async fn read_json<T: DeserializeOwned>(
    platform: SourceId,
    username: &str,
    response: Response,
) -> Result<T, ProviderError> {
    let response = check_status(platform, username, response)?;
    Ok(response.json::<T>().await?)
}

/// A provider behind a TTL cache.
pub struct CachedProvider<M> {
    inner: Arc<dyn MetricsProvider<Metrics = M>>,
    cache: SourceCache<M>,
}

impl<M: Clone + Send + Sync + 'static> CachedProvider<M> {
    pub fn new(inner: Arc<dyn MetricsProvider<Metrics = M>>, ttl: Duration) -> Self {
        let cache = SourceCache::new(inner.source(), ttl, DEFAULT_MAX_ENTRIES);
        Self { inner, cache }
    }

    pub fn source(&self) -> SourceId {
        self.inner.source()
    }

    pub fn cache(&self) -> &SourceCache<M> {
        &self.cache
    }

    pub async fn fetch(&self, username: &str) -> Result<M, ProviderError> {
        let username = validate_username(username)?;

        if let Some(hit) = self.cache.get(username) {
            return Ok(hit);
        }

        info!(source = %self.source(), username, "fetching profile metrics");
        let metrics = self.inner.fetch(username).await?;
        self.cache.insert(username, metrics.clone());
        Ok(metrics)
    }

    /// Like `fetch`, but a failure is logged and becomes absence.
    async fn fetch_optional(&self, username: Option<&str>) -> Option<M> {
        let username = username?;
        match self.fetch(username).await {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                warn!(source = %self.source(), username, "source unavailable: {e}");
                None
            }
        }
    }
}

/// Which platform handles to look up. `None` means not connected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileHandles {
    pub github_username: Option<String>,
    pub leetcode_username: Option<String>,
    pub hackerrank_username: Option<String>,
}

impl ProfileHandles {
    pub fn is_empty(&self) -> bool {
        self.github_username.is_none()
            && self.leetcode_username.is_none()
            && self.hackerrank_username.is_none()
    }
}

pub struct ProviderRegistry {
    pub github: CachedProvider<GithubMetrics>,
    pub leetcode: CachedProvider<LeetcodeMetrics>,
    pub hackerrank: CachedProvider<HackerrankMetrics>,
}

impl ProviderRegistry {
    pub fn new(
        github: CachedProvider<GithubMetrics>,
        leetcode: CachedProvider<LeetcodeMetrics>,
        hackerrank: CachedProvider<HackerrankMetrics>,
    ) -> Self {
        Self {
            github,
            leetcode,
            hackerrank,
        }
    }

    /// Builds the live HTTP providers with the configured cache TTLs.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::new(
            CachedProvider::new(
                Arc::new(GithubProvider::new(client.clone(), config.github_token.clone())),
                config.github_cache_ttl,
            ),
            CachedProvider::new(
                Arc::new(LeetcodeProvider::new(client.clone())),
                config.leetcode_cache_ttl,
            ),
            CachedProvider::new(
                Arc::new(HackerrankProvider::new(client)),
                config.hackerrank_cache_ttl,
            ),
        ))
    }

    /// Fetches every requested source concurrently. Unrequested and failed
    /// sources are absent from the result.
    pub async fn fetch_all(&self, handles: &ProfileHandles) -> SourceMetricsSet {
        let (github, leetcode, hackerrank) = tokio::join!(
            self.github.fetch_optional(handles.github_username.as_deref()),
            self.leetcode.fetch_optional(handles.leetcode_username.as_deref()),
            self.hackerrank.fetch_optional(handles.hackerrank_username.as_deref()),
        );

        SourceMetricsSet {
            github,
            leetcode,
            hackerrank,
        }
    }

    pub fn purge_expired(&self) -> usize {
        self.github.cache().purge_expired()
            + self.leetcode.cache().purge_expired()
            + self.hackerrank.cache().purge_expired()
    }
}
