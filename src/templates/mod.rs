pub mod alert_email;
pub mod error_email;

pub use alert_email::{alert_email, alert_subject};
pub use error_email::error_email;
