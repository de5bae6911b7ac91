use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use crate::analysis::sources::{GithubMetrics, LanguageCount, SourceId};
use crate::providers::{read_json, MetricsProvider, ProviderError};

pub const GITHUB_API_URL: &str = "https://api.github.com";
const TOP_LANGUAGES: usize = 5;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GithubUser {
    login: String,
    public_repos: u64,
    followers: u64,
    following: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GithubRepo {
    stargazers_count: u64,
    language: Option<String>,
}

/// Public GitHub REST API: the user record plus the first page of repos.
pub struct GithubProvider {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubProvider {
    pub fn new(client: Client, token: Option<String>) -> Self {
        Self::with_base_url(client, token, GITHUB_API_URL)
    }

    pub fn with_base_url(client: Client, token: Option<String>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        username: &str,
    ) -> Result<T, ProviderError> {
        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        read_json(SourceId::Github, username, response).await
    }
}

#[async_trait]
impl MetricsProvider for GithubProvider {
    type Metrics = GithubMetrics;

    fn source(&self) -> SourceId {
        SourceId::Github
    }

    async fn fetch(&self, username: &str) -> Result<GithubMetrics, ProviderError> {
        let user_path = format!("/users/{username}");
        let repos_path = format!("/users/{username}/repos?sort=updated&per_page=100");
        let (user, repos) = tokio::try_join!(
            self.get::<GithubUser>(&user_path, username),
            self.get::<Vec<GithubRepo>>(&repos_path, username),
        )?;

        Ok(summarize(user, &repos))
    }
}

fn summarize(user: GithubUser, repos: &[GithubRepo]) -> GithubMetrics {
    let total_stars = repos
        .iter()
        .fold(0u64, |acc, r| acc.saturating_add(r.stargazers_count));

    GithubMetrics {
        username: Some(user.login).filter(|l| !l.is_empty()),
        public_repos: user.public_repos,
        total_stars,
        followers: user.followers,
        following: user.following,
        top_languages: top_languages(repos),
        fetched_at: Some(Utc::now()),
    }
}

/// Most-used repo languages, count descending then name.
fn top_languages(repos: &[GithubRepo]) -> Vec<LanguageCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for language in repos.iter().filter_map(|r| r.language.as_deref()) {
        *counts.entry(language).or_default() += 1;
    }

    let mut languages: Vec<LanguageCount> = counts
        .into_iter()
        .map(|(language, count)| LanguageCount {
            language: language.to_string(),
            count,
        })
        .collect();
    languages.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.language.cmp(&b.language)));
    languages.truncate(TOP_LANGUAGES);
    languages
}
