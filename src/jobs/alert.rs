use crate::domain::{evaluate, AlertCriteria};
use crate::errors::AppError;
use crate::mailer::Notifier;
use crate::scraper::ListingSource;
use crate::state::{AlertStateStore, ObjectStore};
use crate::templates::{alert_email, alert_subject};
use tracing::info;

/// What an alert run ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertRun {
    /// Nothing matched now or before.
    NoResults,
    /// Only still-listed units; nothing persisted or sent.
    Unchanged { existing: usize },
    /// State replaced and one notification sent.
    Notified {
        new: usize,
        deprecated: usize,
        existing: usize,
    },
}

/// Fetch → evaluate → persist and notify when something appeared or vanished.
pub fn run_alert<L, S, N>(
    source: &L,
    states: &AlertStateStore<S>,
    notifier: &N,
    criteria: &AlertCriteria,
) -> Result<AlertRun, AppError>
where
    L: ListingSource + ?Sized,
    S: ObjectStore,
    N: Notifier + ?Sized,
{
    let records = source.fetch_listings()?;
    let previous = states.load();
    let outcome = evaluate(&records, criteria, &previous);

    if outcome.is_empty() {
        info!("no result");
        return Ok(AlertRun::NoResults);
    }

    if !outcome.is_reportable() {
        info!(existing = outcome.existing.len(), "no new result");
        return Ok(AlertRun::Unchanged {
            existing: outcome.existing.len(),
        });
    }

    states.save(&outcome.state)?;
    notifier.send(&alert_subject(&outcome), alert_email(&outcome).into_string())?;

    info!(
        new = outcome.new.len(),
        deprecated = outcome.deprecated.len(),
        existing = outcome.existing.len(),
        "alert sent"
    );
    Ok(AlertRun::Notified {
        new: outcome.new.len(),
        deprecated: outcome.deprecated.len(),
        existing: outcome.existing.len(),
    })
}
