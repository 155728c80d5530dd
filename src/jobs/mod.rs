pub mod alert;
pub mod daily_stats;

pub use alert::run_alert;
pub use daily_stats::run_daily_stats;
