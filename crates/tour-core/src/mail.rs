//! Outbound transactional email through the SendGrid v3 API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::error::{Result, TourError};

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: to, subject, and html or text";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// EmailPayload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EmailPayload {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A payload that passed validation: recipient, subject and at least one body.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: Option<String>,
    pub text: Option<String>,
}

fn present(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl EmailPayload {
    pub fn validate(self) -> Result<OutboundEmail> {
        let to = present(self.to);
        let subject = present(self.subject);
        let html = present(self.html);
        let text = present(self.text);
        match (to, subject) {
            (Some(to), Some(subject)) if html.is_some() || text.is_some() => {
                Ok(OutboundEmail {
                    to,
                    subject,
                    html,
                    text,
                })
            }
            _ => Err(TourError::InvalidPayload(MISSING_FIELDS_MESSAGE.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sender {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request body for `POST /v3/mail/send`. SendGrid requires `text/plain`
/// content to precede `text/html`.
pub fn send_request_body(email: &OutboundEmail, from: &Sender) -> Value {
    let mut content = Vec::new();
    if let Some(text) = &email.text {
        content.push(json!({ "type": "text/plain", "value": text }));
    }
    if let Some(html) = &email.html {
        content.push(json!({ "type": "text/html", "value": html }));
    }
    json!({
        "personalizations": [{ "to": [{ "email": email.to }] }],
        "from": from,
        "subject": email.subject,
        "content": content,
    })
}

/// Status and raw body of the provider's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub status: u16,
    pub body: String,
}

impl ProviderReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ---------------------------------------------------------------------------
// SendGridClient
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct SendGridClient {
    http: reqwest::Client,
    base_url: String,
}

impl SendGridClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn send(
        &self,
        api_key: &str,
        email: &OutboundEmail,
        from: &Sender,
    ) -> std::result::Result<ProviderReply, MailError> {
        let response = self
            .http
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(api_key)
            .json(&send_request_body(email, from))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ProviderReply { status, body })
    }
}
