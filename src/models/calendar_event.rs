use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A Google Calendar event resource.
///
/// Only the fields this tool reads or writes are typed. Everything else the
/// calendar returns is kept in `extra` so an update sends it back untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventDateTime {
    pub fn all_day(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Default::default()
        }
    }
}

impl CalendarEvent {
    /// A new all-day event on `date`. The calendar API treats `end` as exclusive.
    pub fn all_day(date: NaiveDate, summary: &str, description: &str, color_id: &str) -> Self {
        let end = date.succ_opt().unwrap_or(date);

        Self {
            summary: Some(summary.to_string()),
            description: Some(description.to_string()),
            color_id: Some(color_id.to_string()),
            start: Some(EventDateTime::all_day(date)),
            end: Some(EventDateTime::all_day(end)),
            ..Default::default()
        }
    }
}
