use anyhow::Result;
use std::collections::HashSet;

use crate::models::activity::{ActivityWindow, RepositoryActivityLog};
use crate::services::git_platforms::{GitPlatform, Issue};

/// Lines for issues the user created or closed in the window
pub async fn collect_issues(
    platform: &dyn GitPlatform,
    username: &str,
    window: &ActivityWindow,
) -> Result<RepositoryActivityLog> {
    let range = window.search_range();
    let created = platform
        .search_issues(&format!("type:issue author:{} created:{}", username, range))
        .await?;
    let closed = platform
        .search_issues(&format!("type:issue author:{} closed:{}", username, range))
        .await?;

    log::info!(
        "📥 Issue search returned {} created and {} closed",
        created.len(),
        closed.len()
    );

    let mut seen = HashSet::new();
    let mut log = RepositoryActivityLog::new();

    for issue in created.into_iter().chain(closed) {
        let Some(repository) = issue.repository_name() else {
            log::warn!("⚠️  Skipping issue #{} without repository", issue.number);
            continue;
        };
        if !seen.insert((repository.clone(), issue.number)) {
            continue;
        }

        for line in issue_lines(&issue, window) {
            log.record(&repository, line);
        }
    }

    Ok(log)
}

/// `created` and `closed` lines for one issue, in that order
pub(crate) fn issue_lines(issue: &Issue, window: &ActivityWindow) -> Vec<String> {
    let mut lines = Vec::new();

    if window.contains(&issue.created_at) {
        lines.push(issue_line(issue, "created"));
    }
    if issue.closed_at.map_or(false, |at| window.contains(&at)) {
        lines.push(issue_line(issue, "closed"));
    }

    lines
}

fn issue_line(issue: &Issue, event: &str) -> String {
    format!("- Issue #{}: {} ({})", issue.number, issue.title, event)
}
