use anyhow::{Context, Result};
use reqwest::{Client, ClientBuilder};

pub const USER_AGENT: &str = concat!("gh-calendar-log/", env!("CARGO_PKG_VERSION"));

/// Create the HTTP client shared by the GitHub and calendar API clients.
/// No request timeout is set; calls wait on the transport defaults.
pub fn create_http_client() -> Result<Client> {
    ClientBuilder::new()
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to create HTTP client")
}
