// parser.rs
//
// Selector logic for the Avalon apartments page. Raw HTML in, records out;
// nothing here touches the network.

use crate::domain::ListingRecord;
use crate::scraper::ScraperError;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;
use url::Url;

struct CardSelectors {
    card: Selector,
    content: Selector,
    link: Selector,
    signature: Selector,
    title: Selector,
    details: Selector,
    price: Selector,
    availability: Selector,
    window: Regex,
}

impl CardSelectors {
    fn new() -> Result<Self, ScraperError> {
        let parse = |css: &str| {
            Selector::parse(css).map_err(|e| ScraperError::HtmlParse(format!("{css}: {e}")))
        };

        Ok(Self {
            card: parse("li.apartment-card")?,
            content: parse("div.content")?,
            link: parse("a[href]")?,
            signature: parse("div[class*=signature]")?,
            title: parse("div[class*=title]")?,
            details: parse("div[class*=details]")?,
            price: parse("div[class*=price]")?,
            availability: parse("div[class*=availability]")?,
            window: Regex::new(r"Available (.+?) — (.+)")?,
        })
    }
}

/// Extract every available unit from the listing page.
///
/// Unit links are resolved against `page_url`. Month/day availability dates
/// take their year from `captured_at`, since the page omits it. Fields that
/// fail to parse are logged and left at their zero value.
pub fn parse_listings(
    html: &str,
    page_url: &Url,
    captured_at: DateTime<Utc>,
) -> Result<Vec<ListingRecord>, ScraperError> {
    let sel = CardSelectors::new()?;
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for card in document.select(&sel.card) {
        let url = card
            .select(&sel.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| match page_url.join(href) {
                Ok(u) => u.to_string(),
                Err(e) => {
                    warn!(href, error = %e, "failed to resolve unit link");
                    String::new()
                }
            })
            .unwrap_or_default();

        for content in card.select(&sel.content) {
            if content.text().collect::<String>().contains("Unavailable") {
                continue;
            }

            let mut record = ListingRecord::new(child_text(content, &sel.title), captured_at);
            record.url = url.clone();
            record.signature = child_text(content, &sel.signature);

            fill_details(&mut record, &child_text(content, &sel.details));
            fill_price(&mut record, &child_text(content, &sel.price));
            fill_window(
                &mut record,
                &sel.window,
                &child_text(content, &sel.availability),
                captured_at.year(),
            );

            records.push(record);
        }
    }

    Ok(records)
}

/// Text of every matching descendant, whitespace-collapsed.
fn child_text(el: ElementRef<'_>, selector: &Selector) -> String {
    el.select(selector)
        .flat_map(|m| m.text())
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

// "1 bed • 1 bath • 712 sqft"
fn fill_details(record: &mut ListingRecord, details: &str) {
    let parts: Vec<&str> = details.split('•').map(str::trim).collect();

    record.bedroom = parts.first().copied().unwrap_or_default().to_string();
    record.bath = parts.get(1).copied().unwrap_or_default().to_string();

    let sqft_text = parts.get(2).copied().unwrap_or_default();
    match sqft_text.split_whitespace().next().map(|n| n.replace(',', "").parse::<u32>()) {
        Some(Ok(sqft)) => record.sqft = sqft,
        _ => warn!(unit = %record.unit, sqft = sqft_text, "failed to parse sqft"),
    }
}

// "Starting at $3,550" -> 3550
fn fill_price(record: &mut ListingRecord, text: &str) {
    match parse_price(text) {
        Some(price) => record.price = price,
        None => warn!(unit = %record.unit, price = text, "failed to parse price"),
    }
}

fn parse_price(text: &str) -> Option<u32> {
    let last = text.split_whitespace().last()?;
    let digits = last
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .replace(',', "");
    digits.parse().ok()
}

// "Available Feb 10 — Feb 23"
fn fill_window(record: &mut ListingRecord, pattern: &Regex, text: &str, year: i32) {
    let Some(caps) = pattern.captures(text) else {
        warn!(unit = %record.unit, availability = text, "failed to match availability");
        return;
    };

    let start = caps.get(1).map_or("", |m| m.as_str());
    let end = caps.get(2).map_or("", |m| m.as_str());

    record.available_start = parse_month_day(start, year);
    if record.available_start.is_none() {
        warn!(unit = %record.unit, start, "failed to parse available start date");
    }

    record.available_end = parse_month_day(end, year);
    if record.available_end.is_none() {
        warn!(unit = %record.unit, end, "failed to parse available end date");
    }
}

fn parse_month_day(text: &str, year: i32) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{} {year}", text.trim()), "%b %d %Y").ok()
}
