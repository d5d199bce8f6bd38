use thiserror::Error;

use crate::models::activity::ActivityWindow;
use crate::services::activity_aggregation::{ActivityAggregationService, CollectionMode};
use crate::services::calendar::{upsert_daily_event, CalendarApi, UpsertOutcome};
use crate::services::git_platforms::GitPlatform;
use crate::services::report::{format_report, ColorTier};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("GitHub auth failed: {0:#}")]
    GitHubAuth(anyhow::Error),
    #[error("Failed to collect activities: {0:#}")]
    Collection(anyhow::Error),
    #[error("Calendar update failed: {0:#}")]
    Calendar(anyhow::Error),
}

#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    NoActivity,
    Recorded {
        report: String,
        tier: ColorTier,
        upsert: UpsertOutcome,
    },
}

#[derive(Clone, Debug)]
pub struct SyncSettings {
    pub calendar_id: String,
    pub event_title: String,
    pub collection_mode: CollectionMode,
}

/// One run: collect the day's activity, print the report, and record it in the calendar
pub struct DailySyncService<'a> {
    platform: &'a dyn GitPlatform,
    calendar: &'a dyn CalendarApi,
    settings: SyncSettings,
}

impl<'a> DailySyncService<'a> {
    pub fn new(
        platform: &'a dyn GitPlatform,
        calendar: &'a dyn CalendarApi,
        settings: SyncSettings,
    ) -> Self {
        Self {
            platform,
            calendar,
            settings,
        }
    }

    pub async fn run(&self, window: &ActivityWindow) -> Result<SyncOutcome, SyncError> {
        let user = self
            .platform
            .authenticated_user()
            .await
            .map_err(SyncError::GitHubAuth)?;

        log::info!("👤 Authenticated as {}", user.login);

        let activities = ActivityAggregationService::new(self.platform, self.settings.collection_mode)
            .aggregate(&user.login, window)
            .await
            .map_err(SyncError::Collection)?;

        if activities.is_empty() {
            println!("No activities found");
            return Ok(SyncOutcome::NoActivity);
        }

        let report = format_report(&activities, window.date);
        // Printed before the calendar write so a failed write does not lose it
        println!("{}", report);

        let tier = ColorTier::classify(activities.total_lines());
        log::info!(
            "🎨 {} activities, color tier '{}'",
            activities.total_lines(),
            tier.label()
        );

        let upsert = upsert_daily_event(
            self.calendar,
            &self.settings.calendar_id,
            &self.settings.event_title,
            window,
            &report,
            tier.color_id(),
        )
        .await
        .map_err(SyncError::Calendar)?;

        Ok(SyncOutcome::Recorded {
            report,
            tier,
            upsert,
        })
    }
}
