use anyhow::Result;
use std::collections::HashSet;

use crate::models::activity::{ActivityWindow, RepositoryActivityLog};
use crate::services::git_platforms::{GitPlatform, Issue};

/// Lines for pull requests the user created or merged in the window.
///
/// Created and merged PRs are searched separately, then deduplicated by
/// repository and number.
pub async fn collect_pull_requests(
    platform: &dyn GitPlatform,
    username: &str,
    window: &ActivityWindow,
) -> Result<RepositoryActivityLog> {
    let range = window.search_range();
    let created = platform
        .search_issues(&format!("type:pr author:{} created:{}", username, range))
        .await?;
    let merged = platform
        .search_issues(&format!("type:pr author:{} merged:{}", username, range))
        .await?;

    log::info!(
        "📥 PR search returned {} created and {} merged",
        created.len(),
        merged.len()
    );

    let mut seen = HashSet::new();
    let mut log = RepositoryActivityLog::new();

    for pr in created.into_iter().chain(merged) {
        let Some(repository) = pr.repository_name() else {
            log::warn!("⚠️  Skipping PR #{} without repository", pr.number);
            continue;
        };
        if !seen.insert((repository.clone(), pr.number)) {
            continue;
        }

        if window.contains(&pr.created_at) {
            log.record(&repository, pr_line(pr.number, &pr.title, "created"));
        }

        if closed_in_window(&pr, window) && merged_in_window(platform, &repository, &pr, window).await {
            log.record(&repository, pr_line(pr.number, &pr.title, "merged"));
        }
    }

    Ok(log)
}

fn closed_in_window(pr: &Issue, window: &ActivityWindow) -> bool {
    pr.is_closed() && pr.closed_at.map_or(false, |at| window.contains(&at))
}

/// Confirms a closed PR was actually merged inside the window.
/// A failed lookup only drops the merged line; it never fails the run.
async fn merged_in_window(
    platform: &dyn GitPlatform,
    repository: &str,
    pr: &Issue,
    window: &ActivityWindow,
) -> bool {
    match platform.fetch_pull_request(repository, pr.number).await {
        Ok(detail) => {
            detail.merged.unwrap_or(false) && detail.merged_at.map_or(false, |at| window.contains(&at))
        }
        Err(e) => {
            log::warn!(
                "⚠️  Could not check merge status of {}#{}: {:#}",
                repository,
                pr.number,
                e
            );
            false
        }
    }
}

pub(crate) fn pr_line(number: u64, title: &str, event: &str) -> String {
    format!("- PR #{}: {} ({})", number, title, event)
}
