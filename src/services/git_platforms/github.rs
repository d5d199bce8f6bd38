use super::{Commit, GitPlatform, Issue, PullRequest, Repository, UserInfo};
use crate::utils::http_client::create_http_client;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const PER_PAGE: usize = 100;
// The search API never returns more than 1000 results for a query
const MAX_SEARCH_PAGES: usize = 10;

pub struct GitHubClient {
    http: Client,
    api_base_url: String,
    token: String,
}

impl GitHubClient {
    pub fn new(api_base_url: &str, token: &str) -> Result<Self> {
        Ok(Self {
            http: create_http_client()?,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.api_base_url, path);
        log::debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", path))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "GitHub API request {} failed with status {}: {}",
                path,
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .with_context(|| format!("Invalid response from {}", path))
    }

    async fn search<T: DeserializeOwned>(&self, path: &str, query: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();

        for page in 1..=MAX_SEARCH_PAGES {
            let response: SearchResponse<T> = self
                .get_json(
                    path,
                    &[
                        ("q", query.to_string()),
                        ("per_page", PER_PAGE.to_string()),
                        ("page", page.to_string()),
                    ],
                )
                .await?;

            if response.incomplete_results {
                log::warn!("GitHub search returned incomplete results for '{}'", query);
            }

            let fetched = response.items.len();
            items.extend(response.items);

            if fetched < PER_PAGE || items.len() as u64 >= response.total_count {
                break;
            }
        }

        log::debug!("🔍 {} results for '{}'", items.len(), query);
        Ok(items)
    }

    /// Walk a paginated list endpoint, stopping after the first page where `done` holds for the last item
    async fn list<T, F>(&self, path: &str, query: &[(&str, String)], done: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let mut items: Vec<T> = Vec::new();
        let mut page = 1;

        loop {
            let mut page_query = query.to_vec();
            page_query.push(("per_page", PER_PAGE.to_string()));
            page_query.push(("page", page.to_string()));

            let batch: Vec<T> = self.get_json(path, &page_query).await?;
            let fetched = batch.len();
            let reached_end = batch.last().map(&done).unwrap_or(true);
            items.extend(batch);

            if fetched < PER_PAGE || reached_end {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl GitPlatform for GitHubClient {
    async fn authenticated_user(&self) -> Result<UserInfo> {
        self.get_json("/user", &[])
            .await
            .context("Invalid GitHub token")
    }

    async fn search_commits(&self, query: &str) -> Result<Vec<Commit>> {
        self.search("/search/commits", query).await
    }

    async fn search_issues(&self, query: &str) -> Result<Vec<Issue>> {
        self.search("/search/issues", query).await
    }

    async fn fetch_pull_request(&self, repository: &str, number: u64) -> Result<PullRequest> {
        self.get_json(&format!("/repos/{}/pulls/{}", repository, number), &[])
            .await
    }

    async fn fetch_repositories(&self) -> Result<Vec<Repository>> {
        self.list(
            "/user/repos",
            &[("affiliation", "owner,collaborator".to_string())],
            |_: &Repository| false,
        )
        .await
    }

    async fn fetch_repository_commits(
        &self,
        repository: &str,
        author: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Commit>> {
        self.list(
            &format!("/repos/{}/commits", repository),
            &[
                ("author", author.to_string()),
                ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
                ("until", until.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ],
            |_: &Commit| false,
        )
        .await
    }

    async fn fetch_repository_pulls(
        &self,
        repository: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>> {
        self.list(
            &format!("/repos/{}/pulls", repository),
            &[
                ("state", "all".to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
            ],
            |pr: &PullRequest| pr.updated_at < since,
        )
        .await
    }

    async fn fetch_repository_issues(
        &self,
        repository: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Issue>> {
        self.list(
            &format!("/repos/{}/issues", repository),
            &[
                ("state", "all".to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
            ],
            |issue: &Issue| issue.updated_at < since,
        )
        .await
    }
}

// GitHub API response types

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    total_count: u64,
    #[serde(default)]
    incomplete_results: bool,
    items: Vec<T>,
}
