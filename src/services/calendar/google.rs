use super::CalendarApi;
use crate::models::calendar_event::CalendarEvent;
use crate::utils::credentials::ServiceAccountKey;
use crate::utils::http_client::create_http_client;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

pub const DEFAULT_CALENDAR_API_URL: &str = "https://www.googleapis.com/calendar/v3";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Google Calendar v3 client authenticated as a service account.
///
/// The access token is requested on first use and reused for the rest of the run.
pub struct GoogleCalendarClient {
    http: Client,
    credentials: ServiceAccountKey,
    api_base_url: String,
    access_token: OnceCell<String>,
}

impl GoogleCalendarClient {
    pub fn new(credentials: ServiceAccountKey) -> Result<Self> {
        Ok(Self {
            http: create_http_client()?,
            credentials,
            api_base_url: DEFAULT_CALENDAR_API_URL.to_string(),
            access_token: OnceCell::new(),
        })
    }

    async fn access_token(&self) -> Result<&str> {
        let token = self
            .access_token
            .get_or_try_init(|| self.request_access_token())
            .await
            .context("Failed to authenticate with the calendar service")?;
        Ok(token.as_str())
    }

    /// Exchange a signed JWT assertion for an OAuth2 access token
    async fn request_access_token(&self) -> Result<String> {
        let assertion = sign_assertion(&self.credentials, Utc::now())?;

        let response = self
            .http
            .post(&self.credentials.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Token request failed with status {}: {}",
                status,
                error_text
            ));
        }

        let token: TokenResponse = response.json().await?;
        log::info!("🔑 Authenticated as {}", self.credentials.client_email);
        Ok(token.access_token)
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base_url,
            urlencoding::encode(calendar_id)
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, action: &str) -> Result<T> {
        let token = self.access_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("Failed to {}", action))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Failed to {}: status {}: {}",
                action,
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .with_context(|| format!("Invalid response while trying to {}", action))
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn list_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<FixedOffset>,
        time_max: DateTime<FixedOffset>,
    ) -> Result<Vec<CalendarEvent>> {
        let mut events = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let request = self.http.get(self.events_url(calendar_id)).query(&query);
            let page: EventList = self.send(request, "list events").await?;

            events.extend(page.items);
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        log::debug!("📅 {} events between {} and {}", events.len(), time_min, time_max);
        Ok(events)
    }

    async fn update_event(&self, calendar_id: &str, event: &CalendarEvent) -> Result<CalendarEvent> {
        let event_id = event
            .id
            .as_deref()
            .ok_or_else(|| anyhow!("Cannot update an event without an id"))?;

        let url = format!("{}/{}", self.events_url(calendar_id), urlencoding::encode(event_id));
        self.send(self.http.put(url).json(event), "update event").await
    }

    async fn insert_event(&self, calendar_id: &str, event: &CalendarEvent) -> Result<CalendarEvent> {
        self.send(self.http.post(self.events_url(calendar_id)).json(event), "create event")
            .await
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

fn assertion_claims(credentials: &ServiceAccountKey, now: DateTime<Utc>) -> AssertionClaims {
    let iat = now.timestamp();
    AssertionClaims {
        iss: credentials.client_email.clone(),
        scope: CALENDAR_SCOPE.to_string(),
        aud: credentials.token_uri.clone(),
        iat,
        exp: iat + ASSERTION_LIFETIME_SECS,
    }
}

fn sign_assertion(credentials: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String> {
    let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
        .map_err(|e| anyhow!("Invalid service account private key: {}", e))?;

    encode(&Header::new(Algorithm::RS256), &assertion_claims(credentials, now), &key)
        .map_err(|e| anyhow!("Failed to sign token assertion: {}", e))
}

// Google Calendar API response types

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventList {
    #[serde(default)]
    items: Vec<CalendarEvent>,
    next_page_token: Option<String>,
}
