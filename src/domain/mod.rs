pub mod alert;
pub mod listing;

pub use alert::{evaluate, AlertCriteria, AlertOutcome, AlertState, MoveWindow};
pub use listing::ListingRecord;
