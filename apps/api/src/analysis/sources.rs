use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stable identifier of a scored source. Declaration order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Resume,
    Github,
    Leetcode,
    Hackerrank,
}

impl SourceId {
    pub const ALL: [SourceId; 4] = [
        SourceId::Resume,
        SourceId::Github,
        SourceId::Leetcode,
        SourceId::Hackerrank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Resume => "resume",
            SourceId::Github => "github",
            SourceId::Leetcode => "leetcode",
            SourceId::Hackerrank => "hackerrank",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SourceId::Resume => "Resume",
            SourceId::Github => "GitHub",
            SourceId::Leetcode => "LeetCode",
            SourceId::Hackerrank => "HackerRank",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        SourceId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageCount {
    pub language: String,
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: u64,
}

/// Repository-activity counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GithubMetrics {
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub public_repos: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_stars: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub followers: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub following: u64,
    pub top_languages: Vec<LanguageCount>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Problem-solving counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeetcodeMetrics {
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub total_solved: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub easy_solved: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub medium_solved: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub hard_solved: u64,
    #[serde(deserialize_with = "lenient_ranking")]
    pub ranking: Option<u64>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Badge / challenge counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HackerrankMetrics {
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_count")]
    pub total_badges: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub challenges_solved: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub total_stars: u64,
    pub badges: Vec<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Reads a counter from whatever JSON shape a client or upstream sent:
/// integers, floats (truncated, negatives clamp to 0) or numeric strings
/// with thousands separators.
pub fn count_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value).unwrap_or(0))
}

fn lenient_ranking<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value).filter(|r| *r > 0))
}

/// Whichever platform metrics the caller managed to gather.
/// A `None` source was not connected; it is never scored as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceMetricsSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<GithubMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leetcode: Option<LeetcodeMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hackerrank: Option<HackerrankMetrics>,
}

impl SourceMetricsSet {
    pub fn is_empty(&self) -> bool {
        self.github.is_none() && self.leetcode.is_none() && self.hackerrank.is_none()
    }
}
