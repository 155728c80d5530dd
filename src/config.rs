use crate::domain::{AlertCriteria, MoveWindow};
use crate::errors::ConfigError;
use std::env;
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_LISTING_URL: &str =
    "https://www.avaloncommunities.com/california/san-francisco-apartments/avalon-at-mission-bay/apartments";

/// Fixed run configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub listing_url: Url,
    pub max_price: u32,
    pub move_start: String,
    pub move_end: String,
    pub state_root: PathBuf,
    pub state_bucket: String,
    pub state_key: String,
    pub history_db: String,
    pub history_table: String,
    pub brevo_api_key: String,
    pub sender_email: String,
    pub sender_name: String,
    pub recipient_email: String,
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// in-code defaults for everything except mail credentials.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let required = |name: &'static str| lookup(name).filter(|v| !v.is_empty()).ok_or(ConfigError::Missing(name));

        let raw_url = or_default("AVALON_LISTING_URL", DEFAULT_LISTING_URL);
        let listing_url = Url::parse(&raw_url).map_err(|_| ConfigError::Invalid {
            field: "AVALON_LISTING_URL",
            value: raw_url.clone(),
        })?;

        let raw_price = or_default("AVALON_MAX_PRICE", "3700");
        let max_price = raw_price.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
            field: "AVALON_MAX_PRICE",
            value: raw_price.clone(),
        })?;

        let history_table = or_default("AVALON_HISTORY_TABLE", "avalon_daily_stats");
        if !is_identifier(&history_table) {
            return Err(ConfigError::Invalid {
                field: "AVALON_HISTORY_TABLE",
                value: history_table,
            });
        }

        Ok(Self {
            listing_url,
            max_price,
            move_start: or_default("AVALON_MOVE_START", "Feb 10, 2020"),
            move_end: or_default("AVALON_MOVE_END", "Feb 23, 2020"),
            state_root: PathBuf::from(or_default("AVALON_STATE_ROOT", "state")),
            state_bucket: or_default("AVALON_STATE_BUCKET", "avalon-alert"),
            state_key: or_default("AVALON_STATE_KEY", "alert-map"),
            history_db: or_default("AVALON_HISTORY_DB", "avalon_history.sqlite3"),
            history_table,
            brevo_api_key: required("BREVO_API_KEY")?,
            sender_email: required("ALERT_SENDER_EMAIL")?,
            sender_name: or_default("ALERT_SENDER_NAME", "Avalon Watch"),
            recipient_email: required("ALERT_RECIPIENT_EMAIL")?,
        })
    }

    /// Parses the move-in dates; a malformed date fails the run.
    pub fn alert_criteria(&self) -> Result<AlertCriteria, ConfigError> {
        Ok(AlertCriteria {
            max_price: self.max_price,
            window: MoveWindow::parse(&self.move_start, &self.move_end)?,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
