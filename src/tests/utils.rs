// In-memory stand-ins for the page, the stores and the mail channel.

use crate::db::daily_stats::DailyStatRow;
use crate::db::HistoryTable;
use crate::domain::ListingRecord;
use crate::errors::StoreError;
use crate::mailer::{MailerError, Notifier};
use crate::scraper::{ListingSource, ScraperError};
use crate::state::ObjectStore;
use chrono::{NaiveDate, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub fn listing(unit: &str, price: u32, start: (u32, u32), end: (u32, u32)) -> ListingRecord {
    let mut r = ListingRecord::new(unit, Utc.with_ymd_and_hms(2020, 1, 28, 8, 0, 0).unwrap());
    r.url = format!("https://example.com/apartment/{}", unit.replace("Apt. ", ""));
    r.bedroom = "1 bed".to_string();
    r.bath = "1 bath".to_string();
    r.sqft = 700;
    r.price = price;
    r.available_start = NaiveDate::from_ymd_opt(2020, start.0, start.1);
    r.available_end = NaiveDate::from_ymd_opt(2020, end.0, end.1);
    r
}

/// Serves a fixed batch, or fails with an HTTP 503.
pub struct FakeSource {
    pub records: Vec<ListingRecord>,
    pub fail: bool,
}

impl FakeSource {
    pub fn new(records: Vec<ListingRecord>) -> Self {
        Self {
            records,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            records: Vec::new(),
            fail: true,
        }
    }
}

impl ListingSource for FakeSource {
    fn fetch_listings(&self) -> Result<Vec<ListingRecord>, ScraperError> {
        if self.fail {
            return Err(ScraperError::HttpStatus {
                status: 503,
                body: "busy".to_string(),
            });
        }
        Ok(self.records.clone())
    }
}

#[derive(Default)]
pub struct MemoryObjectStore {
    pub objects: RefCell<HashMap<(String, String), Vec<u8>>>,
    pub puts: Cell<usize>,
    pub fail_puts: bool,
}

impl ObjectStore for MemoryObjectStore {
    fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    fn put(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StoreError> {
        self.puts.set(self.puts.get() + 1);
        if self.fail_puts {
            return Err(StoreError::Io {
                path: format!("{bucket}/{key}"),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            });
        }
        self.objects
            .borrow_mut()
            .insert((bucket.to_string(), key.to_string()), body.to_vec());
        Ok(())
    }
}

/// Records the size of every batch request; optionally fails the n-th (1-based)
/// or fails table preparation outright.
#[derive(Default)]
pub struct RecordingHistory {
    pub batches: RefCell<Vec<usize>>,
    pub fail_on: Option<usize>,
    pub fail_prepare: bool,
}

impl HistoryTable for RecordingHistory {
    fn ensure_table(&self, _table: &str) -> Result<(), StoreError> {
        if self.fail_prepare {
            return Err(StoreError::Io {
                path: "history.sqlite".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
            });
        }
        Ok(())
    }

    fn batch_write(&self, _table: &str, rows: &[DailyStatRow]) -> Result<(), StoreError> {
        let mut batches = self.batches.borrow_mut();
        batches.push(rows.len());
        if self.fail_on == Some(batches.len()) {
            return Err(StoreError::Internal);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<(String, String)>>,
    pub fail: bool,
}

impl Notifier for RecordingNotifier {
    fn send(&self, subject: &str, html_content: String) -> Result<(), MailerError> {
        self.sent
            .borrow_mut()
            .push((subject.to_string(), html_content));
        if self.fail {
            return Err(MailerError::ApiError {
                status: 500,
                body: "down".to_string(),
            });
        }
        Ok(())
    }
}
