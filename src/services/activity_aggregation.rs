use crate::models::activity::{ActivityWindow, RepositoryActivityLog};
use crate::services::collectors::{
    collect_commits, collect_issues, collect_per_repository, collect_pull_requests,
};
use crate::services::git_platforms::GitPlatform;
use anyhow::Result;

/// How activity is gathered from the platform
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollectionMode {
    /// Account-wide search queries; any failure aborts the run
    #[default]
    Search,
    /// Repository by repository; failures are isolated per repository
    PerRepository,
}

pub struct ActivityAggregationService<'a> {
    platform: &'a dyn GitPlatform,
    mode: CollectionMode,
}

impl<'a> ActivityAggregationService<'a> {
    pub fn new(platform: &'a dyn GitPlatform, mode: CollectionMode) -> Self {
        Self { platform, mode }
    }

    /// Gather the user's activity for the window into a single log.
    ///
    /// Lines for one repository keep collector order: commits, pull requests,
    /// then issues. An error means no usable data; nothing partial is returned.
    pub async fn aggregate(
        &self,
        username: &str,
        window: &ActivityWindow,
    ) -> Result<RepositoryActivityLog> {
        log::info!(
            "Collecting activities for {} on {} ({:?} mode)",
            username,
            window.date,
            self.mode
        );

        let activities = match self.mode {
            CollectionMode::Search => {
                let mut activities = RepositoryActivityLog::new();
                activities.extend(collect_commits(self.platform, username, window).await?);
                activities.extend(collect_pull_requests(self.platform, username, window).await?);
                activities.extend(collect_issues(self.platform, username, window).await?);
                activities
            }
            CollectionMode::PerRepository => {
                collect_per_repository(self.platform, username, window).await?
            }
        };

        log::info!(
            "📊 Collected {} activities across {} repositories",
            activities.total_lines(),
            activities.iter().count()
        );

        Ok(activities)
    }
}
