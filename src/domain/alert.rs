// src/domain/alert.rs

use crate::domain::listing::{AlertKey, ListingRecord};
use crate::errors::ConfigError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Format of the configured move-in bounds, e.g. "Feb 10, 2020".
pub const MOVE_DATE_FORMAT: &str = "%b %d, %Y";

/// Desired move-in range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MoveWindow {
    #[cfg(test)]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, ConfigError> {
        let parse = |field: &'static str, value: &str| {
            NaiveDate::parse_from_str(value.trim(), MOVE_DATE_FORMAT).map_err(|source| {
                ConfigError::InvalidDate {
                    field,
                    value: value.to_string(),
                    source,
                }
            })
        };

        Ok(Self {
            start: parse("move-in start", start)?,
            end: parse("move-in end", end)?,
        })
    }

    /// Whether an availability range can intersect this window.
    /// An unknown start never excludes; an unknown end always does.
    pub fn overlaps(&self, available_start: Option<NaiveDate>, available_end: Option<NaiveDate>) -> bool {
        if matches!(available_start, Some(start) if start > self.end) {
            return false;
        }
        matches!(available_end, Some(end) if end >= self.start)
    }
}

/// What makes a listing worth alerting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertCriteria {
    pub max_price: u32,
    pub window: MoveWindow,
}

impl AlertCriteria {
    pub fn admits(&self, record: &ListingRecord) -> bool {
        record.price <= self.max_price
            && self
                .window
                .overlaps(record.available_start, record.available_end)
    }

    pub fn filter<'a>(
        &'a self,
        records: &'a [ListingRecord],
    ) -> impl Iterator<Item = &'a ListingRecord> + 'a {
        records.iter().filter(move |r| self.admits(r))
    }
}

/// Alerting listings keyed by [`AlertKey`], persisted between runs as one JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertState(BTreeMap<AlertKey, ListingRecord>);

impl AlertState {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &AlertKey) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &AlertKey) -> Option<&ListingRecord> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: AlertKey, record: ListingRecord) {
        self.0.insert(key, record);
    }

    pub fn key_set(&self) -> BTreeSet<&AlertKey> {
        self.0.keys().collect()
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl FromIterator<ListingRecord> for AlertState {
    fn from_iter<I: IntoIterator<Item = ListingRecord>>(iter: I) -> Self {
        let mut state = AlertState::default();
        for record in iter {
            state.insert(record.alert_key(), record);
        }
        state
    }
}

/// Result of comparing one batch against the previous state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertOutcome {
    pub new: Vec<ListingRecord>,
    pub existing: Vec<ListingRecord>,
    pub deprecated: Vec<ListingRecord>,
    /// State to persist if the outcome is reportable.
    pub state: AlertState,
}

impl AlertOutcome {
    /// Only new or vanished listings are worth a notification.
    pub fn is_reportable(&self) -> bool {
        !self.new.is_empty() || !self.deprecated.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.existing.is_empty() && self.deprecated.is_empty()
    }
}

/// Classify `records` against `previous`.
///
/// The next state is built from scratch out of the records that pass
/// `criteria`; deprecated listings are the previous keys missing from it.
/// Duplicate keys within one batch keep the first record.
pub fn evaluate(
    records: &[ListingRecord],
    criteria: &AlertCriteria,
    previous: &AlertState,
) -> AlertOutcome {
    let mut outcome = AlertOutcome::default();

    for record in criteria.filter(records) {
        let key = record.alert_key();
        if outcome.state.contains(&key) {
            debug!(%key, "duplicate listing in batch, keeping first");
            continue;
        }

        if previous.contains(&key) {
            debug!(%key, "existing");
            outcome.existing.push(record.clone());
        } else {
            debug!(%key, "new");
            outcome.new.push(record.clone());
        }
        outcome.state.insert(key, record.clone());
    }

    let surviving = outcome.state.key_set();
    outcome.deprecated = previous
        .key_set()
        .difference(&surviving)
        .filter_map(|key| previous.get(key))
        .cloned()
        .collect();

    outcome
}
