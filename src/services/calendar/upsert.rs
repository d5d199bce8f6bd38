use anyhow::{Context, Result};

use super::CalendarApi;
use crate::models::activity::ActivityWindow;
use crate::models::calendar_event::CalendarEvent;

/// Placed between report blocks when a description already has content
pub const DESCRIPTION_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Updated { event_id: String },
    Created { event_id: Option<String> },
}

/// Append `report` to the day's tracking event, or create the event if there is none.
///
/// Earlier description content is never replaced, so running twice for the
/// same day leaves two report blocks.
pub async fn upsert_daily_event(
    calendar: &dyn CalendarApi,
    calendar_id: &str,
    event_title: &str,
    window: &ActivityWindow,
    report: &str,
    color_id: &str,
) -> Result<UpsertOutcome> {
    let events = calendar
        .list_events(calendar_id, window.start, window.end)
        .await
        .context("Failed to list events")?;

    let existing = events
        .into_iter()
        .find(|event| event.summary.as_deref() == Some(event_title));

    match existing {
        Some(mut event) => {
            event.description = Some(append_report(event.description.as_deref(), report));
            event.color_id = Some(color_id.to_string());

            let updated = calendar
                .update_event(calendar_id, &event)
                .await
                .context("Failed to update event")?;

            let event_id = updated.id.or(event.id).unwrap_or_default();
            log::info!("📝 Updated event: {} ({})", event_title, event_id);
            Ok(UpsertOutcome::Updated { event_id })
        }
        None => {
            let event = CalendarEvent::all_day(window.date, event_title, report, color_id);

            let created = calendar
                .insert_event(calendar_id, &event)
                .await
                .context("Failed to create event")?;

            log::info!("🆕 Created event: {} on {}", event_title, window.date);
            Ok(UpsertOutcome::Created { event_id: created.id })
        }
    }
}

/// Existing description, separator (only if there was content), new report
pub fn append_report(existing: Option<&str>, report: &str) -> String {
    match existing {
        Some(current) if !current.is_empty() => {
            format!("{}{}{}", current, DESCRIPTION_SEPARATOR, report)
        }
        _ => report.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::super::CalendarApi;
    use crate::models::calendar_event::CalendarEvent;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset};
    use std::sync::Mutex;

    /// In-memory calendar holding events and counting writes
    #[derive(Default)]
    pub struct FakeCalendar {
        pub events: Mutex<Vec<CalendarEvent>>,
        pub list_calls: Mutex<usize>,
        pub fail_list: bool,
        pub fail_write: bool,
    }

    impl FakeCalendar {
        pub fn with_events(events: Vec<CalendarEvent>) -> Self {
            Self {
                events: Mutex::new(events),
                ..Default::default()
            }
        }

        pub fn snapshot(&self) -> Vec<CalendarEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn list_calls(&self) -> usize {
            *self.list_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl CalendarApi for FakeCalendar {
        async fn list_events(
            &self,
            _calendar_id: &str,
            _time_min: DateTime<FixedOffset>,
            _time_max: DateTime<FixedOffset>,
        ) -> Result<Vec<CalendarEvent>> {
            *self.list_calls.lock().unwrap() += 1;
            if self.fail_list {
                return Err(anyhow!("503 Service Unavailable"));
            }
            Ok(self.snapshot())
        }

        async fn update_event(&self, _calendar_id: &str, event: &CalendarEvent) -> Result<CalendarEvent> {
            if self.fail_write {
                return Err(anyhow!("403 Forbidden"));
            }
            let mut events = self.events.lock().unwrap();
            let slot = events
                .iter_mut()
                .find(|e| e.id == event.id)
                .ok_or_else(|| anyhow!("404 Not Found"))?;
            *slot = event.clone();
            Ok(event.clone())
        }

        async fn insert_event(&self, _calendar_id: &str, event: &CalendarEvent) -> Result<CalendarEvent> {
            if self.fail_write {
                return Err(anyhow!("403 Forbidden"));
            }
            let mut events = self.events.lock().unwrap();
            let mut created = event.clone();
            created.id = Some(format!("evt{}", events.len() + 1));
            events.push(created.clone());
            Ok(created)
        }
    }
}
