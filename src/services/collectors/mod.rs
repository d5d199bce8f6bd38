pub mod commits;
pub mod issues;
pub mod per_repository;
pub mod pull_requests;

pub use commits::collect_commits;
pub use issues::collect_issues;
pub use per_repository::collect_per_repository;
pub use pull_requests::collect_pull_requests;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::activity::ActivityWindow;
    use crate::services::git_platforms::{
        Commit, CommitDetail, CommitSignature, GitPlatform, Issue, PullRequest, Repository,
        UserInfo,
    };
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, Utc};
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    /// 2024-03-15 in Asia/Tokyo: [2024-03-14T15:00Z, 2024-03-15T15:00Z)
    pub fn window() -> ActivityWindow {
        ActivityWindow::for_date(
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            chrono_tz::Asia::Tokyo,
        )
        .unwrap()
    }

    pub fn issue(
        repository: &str,
        number: u64,
        title: &str,
        created_at: &str,
        closed_at: Option<&str>,
    ) -> Issue {
        Issue {
            number,
            title: title.to_string(),
            state: if closed_at.is_some() { "closed" } else { "open" }.to_string(),
            created_at: at(created_at),
            updated_at: at(closed_at.unwrap_or(created_at)),
            closed_at: closed_at.map(at),
            repository_url: Some(format!("https://api.github.com/repos/{}", repository)),
            pull_request: None,
        }
    }

    pub fn commit(repository: &str, message: &str, date: &str) -> Commit {
        Commit {
            sha: format!("{:x}", message.len()),
            html_url: format!("https://github.com/{}/commit/abc123", repository),
            commit: CommitDetail {
                message: message.to_string(),
                author: Some(CommitSignature { date: Some(at(date)) }),
            },
        }
    }

    pub fn pull(number: u64, title: &str, created_at: &str, merged_at: Option<&str>) -> PullRequest {
        PullRequest {
            number,
            title: title.to_string(),
            state: if merged_at.is_some() { "closed" } else { "open" }.to_string(),
            created_at: at(created_at),
            updated_at: at(merged_at.unwrap_or(created_at)),
            closed_at: merged_at.map(at),
            merged_at: merged_at.map(at),
            merged: Some(merged_at.is_some()),
        }
    }

    /// In-memory stand-in for a GitHub session
    #[derive(Default)]
    pub struct FakePlatform {
        pub login: Option<String>,
        commit_results: Vec<Commit>,
        searches: Vec<(String, Vec<Issue>)>,
        merge_details: HashMap<(String, u64), PullRequest>,
        repositories: Vec<String>,
        repository_commits: HashMap<String, Vec<Commit>>,
        repository_pulls: HashMap<String, Vec<PullRequest>>,
        repository_issues: HashMap<String, Vec<Issue>>,
        failing_repositories: HashSet<String>,
        fail_auth: bool,
        fail_search: bool,
        fail_listing: bool,
        detail_calls: AtomicUsize,
    }

    impl FakePlatform {
        pub fn with_commit_search(mut self, commits: Vec<Commit>) -> Self {
            self.commit_results = commits;
            self
        }

        /// Answer issue searches whose query starts with `prefix`
        pub fn with_search(mut self, prefix: &str, results: Vec<Issue>) -> Self {
            self.searches.push((prefix.to_string(), results));
            self
        }

        pub fn with_merged(mut self, repository: &str, number: u64, merged_at: Option<&str>) -> Self {
            let mut detail = pull(number, "", "2024-03-01T00:00:00Z", merged_at);
            if merged_at.is_none() {
                detail.state = "closed".to_string();
            }
            self.merge_details.insert((repository.to_string(), number), detail);
            self
        }

        pub fn with_repositories(mut self, names: &[&str]) -> Self {
            self.repositories = names.iter().map(|n| n.to_string()).collect();
            self
        }

        pub fn with_repository_commits(mut self, repository: &str, commits: Vec<Commit>) -> Self {
            self.repository_commits.insert(repository.to_string(), commits);
            self
        }

        pub fn with_repository_pulls(mut self, repository: &str, pulls: Vec<PullRequest>) -> Self {
            self.repository_pulls.insert(repository.to_string(), pulls);
            self
        }

        pub fn with_repository_issues(mut self, repository: &str, issues: Vec<Issue>) -> Self {
            self.repository_issues.insert(repository.to_string(), issues);
            self
        }

        pub fn failing_repository(mut self, repository: &str) -> Self {
            self.failing_repositories.insert(repository.to_string());
            self
        }

        pub fn failing_auth(mut self) -> Self {
            self.fail_auth = true;
            self
        }

        pub fn failing_search(mut self) -> Self {
            self.fail_search = true;
            self
        }

        pub fn failing_repository_listing(mut self) -> Self {
            self.fail_listing = true;
            self
        }

        pub fn detail_calls(&self) -> usize {
            self.detail_calls.load(Ordering::SeqCst)
        }

        fn check_repository(&self, repository: &str) -> Result<()> {
            if self.failing_repositories.contains(repository) {
                return Err(anyhow!("404 Not Found: {}", repository));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl GitPlatform for FakePlatform {
        async fn authenticated_user(&self) -> Result<UserInfo> {
            if self.fail_auth {
                return Err(anyhow!("Bad credentials"));
            }
            Ok(UserInfo {
                login: self.login.clone().unwrap_or_else(|| "octocat".to_string()),
                id: 1,
            })
        }

        async fn search_commits(&self, _query: &str) -> Result<Vec<Commit>> {
            if self.fail_search {
                return Err(anyhow!("search unavailable"));
            }
            Ok(self.commit_results.clone())
        }

        async fn search_issues(&self, query: &str) -> Result<Vec<Issue>> {
            if self.fail_search {
                return Err(anyhow!("search unavailable"));
            }
            Ok(self
                .searches
                .iter()
                .filter(|(prefix, _)| query.starts_with(prefix.as_str()))
                .flat_map(|(_, results)| results.clone())
                .collect())
        }

        async fn fetch_pull_request(&self, repository: &str, number: u64) -> Result<PullRequest> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            self.merge_details
                .get(&(repository.to_string(), number))
                .cloned()
                .ok_or_else(|| anyhow!("502 Bad Gateway"))
        }

        async fn fetch_repositories(&self) -> Result<Vec<Repository>> {
            if self.fail_listing {
                return Err(anyhow!("Bad credentials"));
            }
            Ok(self
                .repositories
                .iter()
                .map(|name| Repository {
                    full_name: name.clone(),
                    private: false,
                })
                .collect())
        }

        async fn fetch_repository_commits(
            &self,
            repository: &str,
            _author: &str,
            _since: DateTime<Utc>,
            _until: DateTime<Utc>,
        ) -> Result<Vec<Commit>> {
            self.check_repository(repository)?;
            Ok(self.repository_commits.get(repository).cloned().unwrap_or_default())
        }

        async fn fetch_repository_pulls(
            &self,
            repository: &str,
            _since: DateTime<Utc>,
        ) -> Result<Vec<PullRequest>> {
            self.check_repository(repository)?;
            Ok(self.repository_pulls.get(repository).cloned().unwrap_or_default())
        }

        async fn fetch_repository_issues(
            &self,
            repository: &str,
            _since: DateTime<Utc>,
        ) -> Result<Vec<Issue>> {
            self.check_repository(repository)?;
            Ok(self.repository_issues.get(repository).cloned().unwrap_or_default())
        }
    }
}
