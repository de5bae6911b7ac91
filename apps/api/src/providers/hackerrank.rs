use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use crate::analysis::sources::{count_from_value, HackerrankMetrics, SourceId};
use crate::providers::{read_json, MetricsProvider, ProviderError};

pub const HACKERRANK_URL: &str = "https://www.hackerrank.com";
/// Badge names kept on the metrics object.
const MAX_BADGE_NAMES: usize = 8;

pub struct HackerrankProvider {
    client: Client,
    base_url: String,
}

impl HackerrankProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, HACKERRANK_URL)
    }

    pub fn with_base_url(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MetricsProvider for HackerrankProvider {
    type Metrics = HackerrankMetrics;

    fn source(&self) -> SourceId {
        SourceId::Hackerrank
    }

    async fn fetch(&self, username: &str) -> Result<HackerrankMetrics, ProviderError> {
        let url = format!("{}/rest/hackers/{}/profile_data", self.base_url, username);
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("Referer", format!("{}/{}", self.base_url, username))
            .send()
            .await?;
        let body: Value = read_json(SourceId::Hackerrank, username, response).await?;
        Ok(parse_profile(username, &body))
    }
}

/// Reads the profile payload, which is sometimes wrapped in a `model` key.
fn parse_profile(username: &str, body: &Value) -> HackerrankMetrics {
    let profile = body.get("model").unwrap_or(body);

    let badges: Vec<String> = profile
        .get("badges")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|b| {
                    b.get("name")
                        .or_else(|| b.get("badge_name"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .collect()
        })
        .unwrap_or_default();

    HackerrankMetrics {
        username: Some(username.to_string()),
        total_badges: badges.len() as u64,
        challenges_solved: counter(profile, "solved_challenges_count"),
        total_stars: counter(profile, "stars"),
        badges: badges.into_iter().take(MAX_BADGE_NAMES).collect(),
        fetched_at: Some(Utc::now()),
    }
}

fn counter(profile: &Value, key: &str) -> u64 {
    profile.get(key).and_then(count_from_value).unwrap_or(0)
}
