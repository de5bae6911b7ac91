use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::analysis::sources::{count_from_value, LeetcodeMetrics, SourceId};
use crate::providers::{read_json, MetricsProvider, ProviderError};

/// Public stats mirrors, tried in order. LeetCode has no official REST API.
pub const LEETCODE_MIRRORS: [&str; 2] = [
    "https://leetcode-stats.tashif.codes",
    "https://leetcode-stats-api.herokuapp.com",
];

pub struct LeetcodeProvider {
    client: Client,
    mirrors: Vec<String>,
}

impl LeetcodeProvider {
    pub fn new(client: Client) -> Self {
        Self::with_mirrors(client, LEETCODE_MIRRORS.iter().map(|m| m.to_string()).collect())
    }

    pub fn with_mirrors(client: Client, mirrors: Vec<String>) -> Self {
        Self { client, mirrors }
    }

    async fn fetch_from(&self, mirror: &str, username: &str) -> Result<Value, ProviderError> {
        let url = format!("{}/{}", mirror.trim_end_matches('/'), username);
        let response = self.client.get(url).send().await?;
        read_json(SourceId::Leetcode, username, response).await
    }
}

#[async_trait]
impl MetricsProvider for LeetcodeProvider {
    type Metrics = LeetcodeMetrics;

    fn source(&self) -> SourceId {
        SourceId::Leetcode
    }

    /// First mirror with a usable answer wins. When none has one, the
    /// profile is reported as not found.
    async fn fetch(&self, username: &str) -> Result<LeetcodeMetrics, ProviderError> {
        for mirror in &self.mirrors {
            match self.fetch_from(mirror, username).await {
                Ok(body) => match normalize_stats(username, &body) {
                    Some(metrics) => return Ok(metrics),
                    None => warn!(mirror = %mirror, username, "LeetCode mirror returned no stats"),
                },
                Err(ProviderError::RateLimited(_)) => {
                    warn!(mirror = %mirror, "LeetCode mirror rate limited");
                }
                Err(e) => warn!(mirror = %mirror, username, "LeetCode mirror failed: {e}"),
            }
        }

        Err(ProviderError::NotFound {
            platform: SourceId::Leetcode,
            username: username.to_string(),
        })
    }
}

/// Normalizes the field aliases different mirrors use. Returns `None` for an
/// empty object or an explicit error payload.
fn normalize_stats(username: &str, body: &Value) -> Option<LeetcodeMetrics> {
    let object = body.as_object()?;
    if object.is_empty() || object.get("status").and_then(Value::as_str) == Some("error") {
        return None;
    }

    Some(LeetcodeMetrics {
        username: Some(
            object
                .get("username")
                .and_then(Value::as_str)
                .unwrap_or(username)
                .to_string(),
        ),
        total_solved: first_count(body, &["totalSolved", "submissions"]).unwrap_or(0),
        easy_solved: first_count(body, &["easySolved", "easy"]).unwrap_or(0),
        medium_solved: first_count(body, &["mediumSolved", "medium"]).unwrap_or(0),
        hard_solved: first_count(body, &["hardSolved", "hard"]).unwrap_or(0),
        ranking: first_count(body, &["ranking", "globalRanking"]).filter(|r| *r > 0),
        fetched_at: Some(Utc::now()),
    })
}

/// First non-zero counter among `keys`, accepting numbers or numeric strings.
fn first_count(body: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .filter_map(count_from_value)
        .find(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    #[test]
    fn test_normalize_primary_shape() {
        let body = json!({
            "status": "success",
            "totalSolved": 150,
            "easySolved": 80,
            "mediumSolved": 60,
            "hardSolved": 10,
            "ranking": 123456
        });
        let m = normalize_stats("alice", &body).unwrap();
        assert_eq!(m.username.as_deref(), Some("alice"));
        assert_eq!(m.total_solved, 150);
        assert_eq!(m.easy_solved, 80);
        assert_eq!(m.medium_solved, 60);
        assert_eq!(m.hard_solved, 10);
        assert_eq!(m.ranking, Some(123456));
    }

    #[test]
    fn test_normalize_alias_shape() {
        let body = json!({
            "username": "Alice",
            "submissions": "42",
            "easy": 30,
            "medium": 10,
            "hard": 2,
            "globalRanking": "1,024"
        });
        let m = normalize_stats("alice", &body).unwrap();
        assert_eq!(m.username.as_deref(), Some("Alice"));
        assert_eq!(m.total_solved, 42);
        assert_eq!(m.hard_solved, 2);
        assert_eq!(m.ranking, Some(1024));
    }

    #[test]
    fn test_normalize_rejects_error_payloads() {
        assert!(normalize_stats("x", &json!({})).is_none());
        assert!(normalize_stats("x", &json!({"status": "error", "message": "user does not exist"})).is_none());
        assert!(normalize_stats("x", &json!([1, 2])).is_none());
    }

    #[test]
    fn test_missing_counters_default_to_zero() {
        let m = normalize_stats("x", &json!({ "totalSolved": 5 })).unwrap();
        assert_eq!(m.easy_solved, 0);
        assert_eq!(m.ranking, None);
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_falls_through_to_next_mirror() {
        let broken = serve(Router::new().route(
            "/:user",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        ))
        .await;
        let working = serve(Router::new().route(
            "/:user",
            get(|| async { Json(json!({ "totalSolved": 99, "hardSolved": 9 })) }),
        ))
        .await;

        let provider = LeetcodeProvider::with_mirrors(Client::new(), vec![broken, working]);
        let m = provider.fetch("alice").await.unwrap();
        assert_eq!(m.total_solved, 99);
        assert_eq!(m.hard_solved, 9);
    }

    #[tokio::test]
    async fn test_all_mirrors_failing_is_not_found() {
        let empty = serve(Router::new().route("/:user", get(|| async { Json(json!({})) }))).await;
        let provider = LeetcodeProvider::with_mirrors(Client::new(), vec![empty]);
        assert!(matches!(
            provider.fetch("ghost").await,
            Err(ProviderError::NotFound { .. })
        ));
    }
}
