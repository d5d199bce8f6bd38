use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::services::activity_aggregation::CollectionMode;

/// Parse a `YYYY-MM-DD` target date
pub fn parse_target_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();

    // chrono accepts unpadded fields, so insist on the exact shape first
    let well_formed = trimmed.len() == 10
        && trimmed
            .char_indices()
            .all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
    if !well_formed {
        return Err(anyhow!("Date must be in YYYY-MM-DD format, got '{}'", value));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|e| anyhow!("Invalid date '{}': {}", value, e))
}

/// Parse an IANA timezone name such as `Asia/Tokyo`
pub fn parse_timezone(value: &str) -> Result<Tz> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|_| anyhow!("Unknown timezone '{}'", value))
}

pub fn parse_collection_mode(value: &str) -> Result<CollectionMode> {
    match value.trim().to_lowercase().as_str() {
        "search" => Ok(CollectionMode::Search),
        "per_repository" | "per-repository" => Ok(CollectionMode::PerRepository),
        other => Err(anyhow!(
            "Unsupported collection mode '{}'. Supported: search, per_repository",
            other
        )),
    }
}
