use crate::domain::{AlertOutcome, ListingRecord};
use maud::{html, Markup};

pub fn alert_subject(outcome: &AlertOutcome) -> String {
    format!(
        "Avalon alert: {} new, {} deprecated, {} existing",
        outcome.new.len(),
        outcome.deprecated.len(),
        outcome.existing.len()
    )
}

/// Three headed sections, one linked line per listing.
pub fn alert_email(outcome: &AlertOutcome) -> Markup {
    html! {
        (section("New Results", &outcome.new))
        (section("Deprecated Results", &outcome.deprecated))
        (section("Existing Results", &outcome.existing))
    }
}

fn section(title: &str, records: &[ListingRecord]) -> Markup {
    html! {
        h1 { (title) }
        @for record in records {
            (listing_line(record))
        }
    }
}

fn listing_line(record: &ListingRecord) -> Markup {
    html! {
        p {
            a href=(record.url) {
                (record.unit) ", " (record.bedroom) ", $" (record.price) ", " (record.window_label())
            }
        }
    }
}
