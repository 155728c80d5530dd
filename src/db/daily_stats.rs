use crate::db::connection::Database;
use crate::domain::ListingRecord;
use crate::errors::StoreError;
use rusqlite::params;
use tracing::{debug, error, info};

/// Per-request item limit of the history table.
pub const BATCH_LIMIT: usize = 25;

/// One historical row per extracted listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStatRow {
    pub unit: String,
    pub captured_at_ms: i64,
    pub bedroom: String,
    pub bath: String,
    pub sqft: u32,
    pub price: u32,
    pub available_start: String,
    pub available_end: String,
    pub signature: String,
}

impl From<&ListingRecord> for DailyStatRow {
    fn from(record: &ListingRecord) -> Self {
        let display = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();

        Self {
            unit: record.unit.clone(),
            captured_at_ms: record.captured_at.timestamp_millis(),
            bedroom: record.bedroom.clone(),
            bath: record.bath.clone(),
            sqft: record.sqft,
            price: record.price,
            available_start: display(record.available_start),
            available_end: display(record.available_end),
            signature: record.signature.clone(),
        }
    }
}

/// Append-only wide-row table. One `batch_write` is one request of at most
/// [`BATCH_LIMIT`] rows.
pub trait HistoryTable {
    /// Create `table` if it does not exist yet.
    fn ensure_table(&self, table: &str) -> Result<(), StoreError>;

    fn batch_write(&self, table: &str, rows: &[DailyStatRow]) -> Result<(), StoreError>;
}

/// Write every record in groups of [`BATCH_LIMIT`], flushing the final
/// partial group. Stops at the first failed group; earlier groups stay written.
pub fn append_daily_stats<H>(
    history: &H,
    table: &str,
    records: &[ListingRecord],
) -> Result<usize, StoreError>
where
    H: HistoryTable + ?Sized,
{
    let rows: Vec<DailyStatRow> = records.iter().map(DailyStatRow::from).collect();
    let mut written = 0;

    for (i, group) in rows.chunks(BATCH_LIMIT).enumerate() {
        if let Err(e) = history.batch_write(table, group) {
            error!(table, batch = i + 1, written, error = %e, "daily stats batch write failed");
            return Err(e);
        }
        written += group.len();
        debug!(table, batch = i + 1, rows = group.len(), "daily stats batch written");
    }

    info!(table, rows = written, "daily stats appended");
    Ok(written)
}

/// SQLite-backed history table. Rows are keyed by (unit, captured_at_ms);
/// writing the same key again replaces the row.
#[derive(Debug, Clone)]
pub struct SqliteHistory {
    db: Database,
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl SqliteHistory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[cfg(test)]
    pub fn rows(&self, table: &str) -> Result<Vec<DailyStatRow>, StoreError> {
        let sql = format!(
            "SELECT unit, captured_at_ms, bedroom, bath, sqft, price, available_start, available_end, signature \
             FROM {} ORDER BY captured_at_ms, unit",
            quote_ident(table)
        );

        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], |row| {
                Ok(DailyStatRow {
                    unit: row.get(0)?,
                    captured_at_ms: row.get(1)?,
                    bedroom: row.get(2)?,
                    bath: row.get(3)?,
                    sqft: row.get(4)?,
                    price: row.get(5)?,
                    available_start: row.get(6)?,
                    available_end: row.get(7)?,
                    signature: row.get(8)?,
                })
            })?;

            let mut out = Vec::new();
            for r in rows {
                out.push(r?);
            }
            Ok(out)
        })
    }
}

impl HistoryTable for SqliteHistory {
    fn ensure_table(&self, table: &str) -> Result<(), StoreError> {
        let sql = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                unit            TEXT    NOT NULL,
                captured_at_ms  INTEGER NOT NULL,
                bedroom         TEXT    NOT NULL,
                bath            TEXT    NOT NULL,
                sqft            INTEGER NOT NULL,
                price           INTEGER NOT NULL,
                available_start TEXT    NOT NULL,
                available_end   TEXT    NOT NULL,
                signature       TEXT    NOT NULL,
                PRIMARY KEY (unit, captured_at_ms)
            )
            "#,
            quote_ident(table)
        );

        self.db.with_conn(|conn| {
            conn.execute_batch(&sql)?;
            Ok(())
        })
    }

    fn batch_write(&self, table: &str, rows: &[DailyStatRow]) -> Result<(), StoreError> {
        if rows.len() > BATCH_LIMIT {
            return Err(StoreError::BatchTooLarge(rows.len()));
        }

        let sql = format!(
            r#"
            INSERT OR REPLACE INTO {} (
                unit, captured_at_ms, bedroom, bath, sqft, price,
                available_start, available_end, signature
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            quote_ident(table)
        );

        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(&sql)?;
                for row in rows {
                    stmt.execute(params![
                        row.unit,
                        row.captured_at_ms,
                        row.bedroom,
                        row.bath,
                        row.sqft,
                        row.price,
                        row.available_start,
                        row.available_end,
                        row.signature
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }
}
