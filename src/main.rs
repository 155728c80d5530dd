use crate::config::Config;
use crate::db::{Database, SqliteHistory};
use crate::mailer::BrevoMailer;
use crate::scraper::AvalonScraper;
use crate::state::{AlertStateStore, FsObjectStore};
use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod domain;
mod errors;
mod jobs;
mod mailer;
mod scraper;
mod state;
mod templates;


const USAGE: &str = "usage: avalon_watch [alert | daily-stats]";

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,avalon_watch=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "alert".to_string());
    let config = Config::from_env().context("Failed to load configuration")?;

    let result = match command.as_str() {
        "alert" => alert(&config),
        "daily-stats" => daily_stats(&config),
        other => bail!("unknown command {other:?}\n{USAGE}"),
    };

    if let Err(e) = &result {
        tracing::error!("{command} run failed: {e:#}");
    }
    result
}

fn mailer(config: &Config) -> Result<BrevoMailer> {
    BrevoMailer::new(
        config.brevo_api_key.clone(),
        config.sender_email.clone(),
        config.sender_name.clone(),
        config.recipient_email.clone(),
    )
    .context("Failed to create mailer")
}

fn alert(config: &Config) -> Result<()> {
    let criteria = config
        .alert_criteria()
        .context("Invalid move-in window")?;

    let scraper = AvalonScraper::new(config.listing_url.clone())?;
    let states = AlertStateStore::new(
        FsObjectStore::new(&config.state_root),
        &config.state_bucket,
        &config.state_key,
    );
    let mailer = mailer(config)?;

    let run = jobs::run_alert(&scraper, &states, &mailer, &criteria)?;
    tracing::info!(?run, "alert run finished");
    Ok(())
}

fn daily_stats(config: &Config) -> Result<()> {
    let scraper = AvalonScraper::new(config.listing_url.clone())?;
    let history = SqliteHistory::new(Database::new(&config.history_db));
    let mailer = mailer(config)?;

    let written = jobs::run_daily_stats(&scraper, &history, &config.history_table, &mailer)?;
    tracing::info!(rows = written, "daily stats run finished");
    Ok(())
}
