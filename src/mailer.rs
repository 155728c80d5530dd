// src/mailer.rs

use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const BREVO_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: HTTP {status}: {body}")]
    ApiError { status: u16, body: String },
}

/// Delivers one HTML message to the configured recipient.
pub trait Notifier {
    fn send(&self, subject: &str, html_content: String) -> Result<(), MailerError>;
}

pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    recipient_email: String,
    endpoint: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: String,
}

impl BrevoMailer {
    pub fn new(
        api_key: String,
        sender_email: String,
        sender_name: String,
        recipient_email: String,
    ) -> Result<Self, MailerError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            api_key,
            sender_email,
            sender_name,
            recipient_email,
            endpoint: BREVO_ENDPOINT.to_string(),
            client,
        })
    }

    /// Point the mailer at a different API host.
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Notifier for BrevoMailer {
    fn send(&self, subject: &str, html_content: String) -> Result<(), MailerError> {
        let payload = BrevoPayload {
            sender: BrevoSender {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: vec![BrevoRecipient {
                email: &self.recipient_email,
            }],
            subject,
            html_content,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .json(&payload)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(MailerError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        info!(subject, to = %self.recipient_email, "email sent");
        Ok(())
    }
}
