// src/domain/listing.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One apartment unit as it appeared on the listing page at capture time.
/// Fields that failed to parse hold their zero value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub unit: String,
    pub url: String,
    pub bedroom: String,
    pub bath: String,
    pub sqft: u32,
    pub price: u32,
    pub available_start: Option<NaiveDate>,
    pub available_end: Option<NaiveDate>,
    pub signature: String,
    pub captured_at: DateTime<Utc>,
}

impl ListingRecord {
    /// An empty record for `unit`, captured at `captured_at`.
    pub fn new(unit: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            unit: unit.into(),
            url: String::new(),
            bedroom: String::new(),
            bath: String::new(),
            sqft: 0,
            price: 0,
            available_start: None,
            available_end: None,
            signature: String::new(),
            captured_at,
        }
    }

    pub fn alert_key(&self) -> AlertKey {
        AlertKey(format!(
            "{}-{}-{}-{}",
            self.unit,
            self.price,
            date_or_dash(self.available_start),
            date_or_dash(self.available_end)
        ))
    }

    /// "Feb 10 - Feb 23" style window used in notifications.
    pub fn window_label(&self) -> String {
        let short = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%b %-d").to_string())
                .unwrap_or_else(|| "?".to_string())
        };
        format!("{} - {}", short(self.available_start), short(self.available_end))
    }
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Identity of a (unit, price, availability window) combination across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertKey(String);

impl AlertKey {
    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AlertKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
