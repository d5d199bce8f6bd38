use anyhow::Result;
use std::collections::BTreeMap;
use url::Url;

use crate::models::activity::{ActivityWindow, RepositoryActivityLog};
use crate::services::git_platforms::{Commit, GitPlatform};

/// Longest message kept per commit when a repository has several
pub const MESSAGE_BUDGET: usize = 80;
/// Commit messages shown per repository
pub const REPRESENTATIVE_LIMIT: usize = 2;

const PRIORITY_PREFIXES: [&str; 2] = ["feat", "fix"];

/// One summary line per repository for the user's commits in the window
pub async fn collect_commits(
    platform: &dyn GitPlatform,
    username: &str,
    window: &ActivityWindow,
) -> Result<RepositoryActivityLog> {
    let query = format!("author:{} author-date:{}", username, window.search_range());
    let commits = platform.search_commits(&query).await?;

    log::info!("📥 Commit search returned {} commits", commits.len());

    let mut by_repository: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for commit in commits {
        // The search range is inclusive at both ends
        if let Some(date) = commit.author_date() {
            if !window.contains(&date) {
                continue;
            }
        }

        let Some(repository) = repository_from_commit_url(&commit.html_url) else {
            log::warn!("⚠️  Could not derive repository from {}", commit.html_url);
            continue;
        };

        by_repository
            .entry(repository)
            .or_default()
            .push(first_line(&commit));
    }

    let mut log = RepositoryActivityLog::new();
    for (repository, messages) in by_repository {
        log.record(&repository, format!("- {}", summarize_commits(&messages)));
    }

    Ok(log)
}

/// Extract `owner/name` from a commit's web URL (`https://host/owner/name/commit/sha`)
pub fn repository_from_commit_url(html_url: &str) -> Option<String> {
    let url = Url::parse(html_url).ok()?;
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let name = segments.next()?;
    Some(format!("{}/{}", owner, name))
}

/// `<count> commits: <representative messages>`
pub fn summarize_commits(messages: &[String]) -> String {
    let shown: Vec<String> = if messages.len() > 1 {
        let truncated: Vec<String> = messages.iter().map(|m| truncate(m, MESSAGE_BUDGET)).collect();
        select_representatives(&truncated)
    } else {
        messages.to_vec()
    };

    format!("{} commits: {}", messages.len(), shown.join(", "))
}

/// Pick up to two messages: `feat*` first, then `fix*`, then anything else
pub fn select_representatives(messages: &[String]) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    let mut taken = vec![false; messages.len()];

    let tiers = PRIORITY_PREFIXES.iter().map(Some).chain(std::iter::once(None));
    for prefix in tiers {
        for (i, message) in messages.iter().enumerate() {
            if selected.len() >= REPRESENTATIVE_LIMIT {
                return selected;
            }
            if taken[i] {
                continue;
            }
            let matches = match prefix {
                Some(prefix) => message.to_lowercase().starts_with(prefix),
                None => true,
            };
            if matches {
                taken[i] = true;
                selected.push(message.clone());
            }
        }
    }

    if selected.is_empty() {
        if let Some(first) = messages.first() {
            selected.push(first.clone());
        }
    }

    selected
}

pub(crate) fn first_line(commit: &Commit) -> String {
    commit
        .commit
        .message
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn truncate(message: &str, budget: usize) -> String {
    message.chars().take(budget).collect()
}
