use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::env;
use thiserror::Error;

use crate::services::activity_aggregation::CollectionMode;
use crate::utils::credentials::{decode_service_account, ServiceAccountKey};
use crate::utils::validators::{parse_collection_mode, parse_target_date, parse_timezone};

pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";
pub const DEFAULT_EVENT_TITLE: &str = "GitHub Activity";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub github_token: String,
    pub google_credentials: ServiceAccountKey,
    pub calendar_id: String,
    pub timezone: Tz,
    pub target_date: NaiveDate,
    pub event_title: String,
    pub collection_mode: CollectionMode,
    pub github_api_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok(), Utc::now())
    }

    /// Build the configuration from an arbitrary key lookup.
    /// `now` decides "yesterday" when no target date is given.
    pub fn from_lookup<F>(lookup: F, now: DateTime<Utc>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let github_token = required("GITHUB_TOKEN")?;
        let google_credentials = decode_service_account(&required("GOOGLE_CREDENTIALS")?)
            .map_err(|e| invalid("GOOGLE_CREDENTIALS", e))?;
        let calendar_id = required("CALENDAR_ID")?;

        let timezone = parse_timezone(&get("TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()))
            .map_err(|e| invalid("TIMEZONE", e))?;

        let target_date = match get("TARGET_DATE") {
            Some(value) => parse_target_date(&value).map_err(|e| invalid("TARGET_DATE", e))?,
            None => now
                .with_timezone(&timezone)
                .date_naive()
                .pred_opt()
                .ok_or_else(|| ConfigError::Invalid {
                    key: "TARGET_DATE",
                    reason: "cannot derive yesterday".to_string(),
                })?,
        };

        let collection_mode = match get("COLLECTION_MODE") {
            Some(value) => parse_collection_mode(&value).map_err(|e| invalid("COLLECTION_MODE", e))?,
            None => CollectionMode::default(),
        };

        Ok(Config {
            github_token,
            google_credentials,
            calendar_id,
            timezone,
            target_date,
            event_title: get("EVENT_TITLE").unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string()),
            collection_mode,
            github_api_url: get("GITHUB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
        })
    }
}

fn invalid(key: &'static str, err: anyhow::Error) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: err.to_string(),
    }
}
