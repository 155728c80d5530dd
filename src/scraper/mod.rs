mod parser;
mod scraper;
mod scraper_error;

use crate::domain::ListingRecord;

pub use self::parser::parse_listings;
pub use self::scraper::AvalonScraper;
pub use self::scraper_error::ScraperError;

/// Anything that can produce the current batch of listings.
pub trait ListingSource {
    fn fetch_listings(&self) -> Result<Vec<ListingRecord>, ScraperError>;
}
