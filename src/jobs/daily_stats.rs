use crate::db::{append_daily_stats, HistoryTable};
use crate::errors::AppError;
use crate::mailer::Notifier;
use crate::scraper::ListingSource;
use crate::templates::error_email;
use std::error::Error;
use tracing::{error, info};

pub const FETCH_FAILED_TITLE: &str = "Avalon Apt Info Get Error";
pub const APPEND_FAILED_TITLE: &str = "Avalon Update Daily Stats Error";

/// Fetch → prepare the history table → append every record. Failures are
/// reported through `notifier` before being returned.
pub fn run_daily_stats<L, H, N>(
    source: &L,
    history: &H,
    table: &str,
    notifier: &N,
) -> Result<usize, AppError>
where
    L: ListingSource + ?Sized,
    H: HistoryTable + ?Sized,
    N: Notifier + ?Sized,
{
    let records = match source.fetch_listings() {
        Ok(records) => records,
        Err(e) => {
            report_failure(notifier, FETCH_FAILED_TITLE, &e);
            return Err(e.into());
        }
    };

    let appended = history
        .ensure_table(table)
        .and_then(|()| append_daily_stats(history, table, &records));

    match appended {
        Ok(written) => {
            info!(rows = written, "update daily stats success");
            Ok(written)
        }
        Err(e) => {
            report_failure(notifier, APPEND_FAILED_TITLE, &e);
            Err(e.into())
        }
    }
}

fn report_failure<N>(notifier: &N, title: &str, err: &(dyn Error + 'static))
where
    N: Notifier + ?Sized,
{
    if let Err(mail_err) = notifier.send(title, error_email(title, err).into_string()) {
        error!(title, error = %mail_err, "failed to send failure report");
    }
}
