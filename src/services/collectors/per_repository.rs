use anyhow::{Context, Result};
use chrono::Utc;

use super::commits::{first_line, summarize_commits};
use super::issues::issue_lines;
use super::pull_requests::pr_line;
use crate::models::activity::{ActivityWindow, RepositoryActivityLog};
use crate::services::git_platforms::GitPlatform;

/// Walk every repository the user owns or collaborates on.
///
/// Each category of each repository is fetched on its own; a failure there is
/// logged and skipped. Only failing to list the repositories aborts.
pub async fn collect_per_repository(
    platform: &dyn GitPlatform,
    username: &str,
    window: &ActivityWindow,
) -> Result<RepositoryActivityLog> {
    let repositories = platform
        .fetch_repositories()
        .await
        .context("Failed to get repos")?;

    log::info!("📦 Scanning {} repositories", repositories.len());

    let mut log = RepositoryActivityLog::new();
    for repository in repositories {
        let name = repository.full_name.as_str();

        match commit_lines(platform, name, username, window).await {
            Ok(lines) => record_all(&mut log, name, lines),
            Err(e) => log::warn!("⚠️  {} commits: {:#}", name, e),
        }
        match pull_request_lines(platform, name, window).await {
            Ok(lines) => record_all(&mut log, name, lines),
            Err(e) => log::warn!("⚠️  {} PRs: {:#}", name, e),
        }
        match issue_lines_for(platform, name, window).await {
            Ok(lines) => record_all(&mut log, name, lines),
            Err(e) => log::warn!("⚠️  {} issues: {:#}", name, e),
        }
    }

    Ok(log)
}

fn record_all(log: &mut RepositoryActivityLog, repository: &str, lines: Vec<String>) {
    for line in lines {
        log.record(repository, line);
    }
}

async fn commit_lines(
    platform: &dyn GitPlatform,
    repository: &str,
    username: &str,
    window: &ActivityWindow,
) -> Result<Vec<String>> {
    let commits = platform
        .fetch_repository_commits(
            repository,
            username,
            window.start.with_timezone(&Utc),
            window.end.with_timezone(&Utc),
        )
        .await?;

    let messages: Vec<String> = commits
        .iter()
        .filter(|c| c.author_date().map_or(true, |at| window.contains(&at)))
        .map(first_line)
        .collect();

    if messages.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![format!("- {}", summarize_commits(&messages))])
}

async fn pull_request_lines(
    platform: &dyn GitPlatform,
    repository: &str,
    window: &ActivityWindow,
) -> Result<Vec<String>> {
    let since = window.start.with_timezone(&Utc);
    let pulls = platform.fetch_repository_pulls(repository, since).await?;

    let mut lines = Vec::new();
    for pr in pulls {
        // Sorted by update time, so nothing older can follow
        if pr.updated_at < since {
            break;
        }
        if window.contains(&pr.created_at) {
            lines.push(pr_line(pr.number, &pr.title, "created"));
        }
        if pr.merged_at.map_or(false, |at| window.contains(&at)) {
            lines.push(pr_line(pr.number, &pr.title, "merged"));
        }
    }

    Ok(lines)
}

async fn issue_lines_for(
    platform: &dyn GitPlatform,
    repository: &str,
    window: &ActivityWindow,
) -> Result<Vec<String>> {
    let since = window.start.with_timezone(&Utc);
    let issues = platform.fetch_repository_issues(repository, since).await?;

    let mut lines = Vec::new();
    for issue in issues {
        if issue.is_pull_request() {
            continue;
        }
        if issue.updated_at < since {
            break;
        }
        lines.extend(issue_lines(&issue, window));
    }

    Ok(lines)
}
