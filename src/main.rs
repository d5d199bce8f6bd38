mod models;
mod services;
mod utils;

use std::process::ExitCode;

use anyhow::{Context, Result};
use models::activity::ActivityWindow;
use services::calendar::GoogleCalendarClient;
use services::daily_sync::{DailySyncService, SyncOutcome, SyncSettings};
use services::git_platforms::GitHubClient;
use utils::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file FIRST before anything else
    dotenv::dotenv().ok();

    // Initialize logger with default level if RUST_LOG not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = Config::from_env()?;

    log::info!(
        "📝 Configuration loaded: calendar={}, timezone={}, mode={:?}, title='{}'",
        config.calendar_id,
        config.timezone.name(),
        config.collection_mode,
        config.event_title
    );

    let window = ActivityWindow::for_date(config.target_date, config.timezone)
        .context("Invalid target date")?;

    println!("Fetching activities for {}", window.date.format("%Y-%m-%d"));

    let github = GitHubClient::new(&config.github_api_url, &config.github_token)?;
    let calendar = GoogleCalendarClient::new(config.google_credentials.clone())?;

    let settings = SyncSettings {
        calendar_id: config.calendar_id.clone(),
        event_title: config.event_title.clone(),
        collection_mode: config.collection_mode,
    };

    match DailySyncService::new(&github, &calendar, settings)
        .run(&window)
        .await?
    {
        SyncOutcome::NoActivity => log::info!("Nothing to record for {}", window.date),
        SyncOutcome::Recorded { tier, upsert, .. } => {
            log::info!("✅ Recorded {} activity ({:?})", tier.label(), upsert)
        }
    }

    Ok(())
}
