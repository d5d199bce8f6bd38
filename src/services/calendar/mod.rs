pub mod google;
pub mod upsert;

pub use google::GoogleCalendarClient;
pub use upsert::{upsert_daily_event, UpsertOutcome};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::models::calendar_event::CalendarEvent;

/// An authenticated session against a calendar service
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Events overlapping `[time_min, time_max)`, recurring events expanded
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<FixedOffset>,
        time_max: DateTime<FixedOffset>,
    ) -> Result<Vec<CalendarEvent>>;

    /// Replace an existing event (identified by `event.id`)
    async fn update_event(&self, calendar_id: &str, event: &CalendarEvent) -> Result<CalendarEvent>;

    async fn insert_event(&self, calendar_id: &str, event: &CalendarEvent) -> Result<CalendarEvent>;
}
