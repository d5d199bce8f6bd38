pub mod github;

pub use github::GitHubClient;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// User information returned from platform APIs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub login: String,
    pub id: u64,
}

/// Repository information from platform APIs
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
}

/// A commit as returned by both commit search and repository commit listing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub html_url: String,
    pub commit: CommitDetail,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitDetail {
    pub message: String,
    #[serde(default)]
    pub author: Option<CommitSignature>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommitSignature {
    pub date: Option<DateTime<Utc>>,
}

impl Commit {
    pub fn author_date(&self) -> Option<DateTime<Utc>> {
        self.commit.author.as_ref().and_then(|a| a.date)
    }
}

/// An issue or pull request as returned by issue search and repository issue listing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub repository_url: Option<String>,
    /// Present only when the issue is really a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }

    /// `owner/name` taken from the API repository URL (`.../repos/owner/name`)
    pub fn repository_name(&self) -> Option<String> {
        let url = Url::parse(self.repository_url.as_deref()?).ok()?;
        let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [.., "repos", owner, name] => Some(format!("{}/{}", owner, name)),
            _ => None,
        }
    }
}

/// A pull request from the pulls endpoints. `merged` is only filled in by the detail endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub merged: Option<bool>,
}

/// An authenticated session against a git hosting platform
#[async_trait]
pub trait GitPlatform: Send + Sync {
    /// Validate the token and return the user it belongs to
    async fn authenticated_user(&self) -> Result<UserInfo>;

    /// Run a commit search query, following pagination
    async fn search_commits(&self, query: &str) -> Result<Vec<Commit>>;

    /// Run an issue/pull request search query, following pagination
    async fn search_issues(&self, query: &str) -> Result<Vec<Issue>>;

    /// Fetch a single pull request with its merge status
    async fn fetch_pull_request(&self, repository: &str, number: u64) -> Result<PullRequest>;

    /// Repositories the user owns or collaborates on
    async fn fetch_repositories(&self) -> Result<Vec<Repository>>;

    async fn fetch_repository_commits(
        &self,
        repository: &str,
        author: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<Commit>>;

    /// Pull requests sorted by last update, newest first, down to the first one updated before `since`
    async fn fetch_repository_pulls(
        &self,
        repository: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<PullRequest>>;

    /// Issues (including pull requests) sorted by last update, newest first, down to the first one updated before `since`
    async fn fetch_repository_issues(
        &self,
        repository: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Issue>>;
}
