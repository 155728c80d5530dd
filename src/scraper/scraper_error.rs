use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("listing page returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("HTML parse error: {0}")]
    HtmlParse(String),

    #[error("bad pattern: {0}")]
    Pattern(#[from] regex::Error),
}
