// scraper.rs
use crate::domain::ListingRecord;
use crate::scraper::{parse_listings, ListingSource, ScraperError};
use chrono::Utc;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::info;
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Fetches and parses the single Avalon listing page.
pub struct AvalonScraper {
    client: Client,
    listing_url: Url,
}

impl AvalonScraper {
    pub fn new(listing_url: Url) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            listing_url,
        })
    }

    pub fn fetch_html(&self) -> Result<String, ScraperError> {
        let start = std::time::Instant::now();
        let resp = self.client.get(self.listing_url.clone()).send()?;

        let status = resp.status();
        let text = resp.text()?;

        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }

        info!(url = %self.listing_url, bytes = text.len(), elapsed = ?start.elapsed(), "fetched listing page");
        Ok(text)
    }
}

impl ListingSource for AvalonScraper {
    fn fetch_listings(&self) -> Result<Vec<ListingRecord>, ScraperError> {
        let html = self.fetch_html()?;
        let records = parse_listings(&html, &self.listing_url, Utc::now())?;
        info!(count = records.len(), "parsed listings");
        Ok(records)
    }
}
