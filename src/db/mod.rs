pub mod connection;
pub mod daily_stats;

pub use connection::Database;
pub use daily_stats::{append_daily_stats, HistoryTable, SqliteHistory};
