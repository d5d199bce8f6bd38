use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;

/// The span of one calendar day in the configured timezone: `[start, end)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityWindow {
    pub date: NaiveDate,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl ActivityWindow {
    /// Build the window from local midnight of `date` to local midnight of the next day
    pub fn for_date(date: NaiveDate, tz: Tz) -> Result<Self> {
        let next = date
            .succ_opt()
            .ok_or_else(|| anyhow!("Date {} has no following day", date))?;

        Ok(Self {
            date,
            start: local_midnight(date, tz)?,
            end: local_midnight(next, tz)?,
        })
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        let start = self.start.with_timezone(&Utc);
        let end = self.end.with_timezone(&Utc);
        start <= *instant && *instant < end
    }

    /// Window bounds as a search qualifier range, e.g. `2024-03-15T00:00:00+09:00..2024-03-16T00:00:00+09:00`
    pub fn search_range(&self) -> String {
        format!(
            "{}..{}",
            self.start.format("%Y-%m-%dT%H:%M:%S%:z"),
            self.end.format("%Y-%m-%dT%H:%M:%S%:z")
        )
    }
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<FixedOffset>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("Invalid midnight for {}", date))?;

    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| anyhow!("Midnight of {} does not exist in {}", date, tz.name()))
}

/// Activity lines grouped by repository.
///
/// Lines keep the order they were recorded in; repositories iterate in
/// lexicographic order. A repository only appears once it has a line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepositoryActivityLog {
    entries: BTreeMap<String, Vec<String>>,
}

impl RepositoryActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, repository: &str, line: impl Into<String>) {
        self.entries
            .entry(repository.to_string())
            .or_default()
            .push(line.into());
    }

    /// Append every line of `other` after the lines already recorded here
    pub fn extend(&mut self, other: RepositoryActivityLog) {
        for (repository, lines) in other.entries {
            if lines.is_empty() {
                continue;
            }
            self.entries.entry(repository).or_default().extend(lines);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_lines(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn lines(&self, repository: &str) -> Option<&[String]> {
        self.entries.get(repository).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(repository, lines)| (repository.as_str(), lines.as_slice()))
    }
}
