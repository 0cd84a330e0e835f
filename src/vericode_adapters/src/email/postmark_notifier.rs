use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vericode_core::{Email, EmailError, Notifier};

use crate::config::PostmarkSettings;

const SEND_EMAIL_PATH: &str = "email";
const MESSAGE_STREAM: &str = "outbound";
const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Debug, Error)]
pub enum PostmarkError {
    #[error("Invalid Postmark base URL: {0}")]
    InvalidEndpoint(String),
    #[error("Invalid sender address: {0}")]
    InvalidSender(#[from] EmailError),
    #[error("Postmark request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Postmark rejected the message ({status}, error code {error_code}): {message}")]
    Rejected {
        status: StatusCode,
        error_code: i64,
        message: String,
    },
}

/// Delivers codes and reset links through the Postmark HTTP API as
/// plain-text email with tracking disabled.
pub struct PostmarkNotifier {
    http_client: Client,
    endpoint: Url,
    sender: Email,
    server_token: Secret<String>,
}

impl PostmarkNotifier {
    pub fn new(
        base_url: &str,
        sender: Email,
        server_token: Secret<String>,
        http_client: Client,
    ) -> Result<Self, PostmarkError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(SEND_EMAIL_PATH))
            .map_err(|e| PostmarkError::InvalidEndpoint(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint,
            sender,
            server_token,
        })
    }

    /// Build a notifier with its own HTTP client using the configured timeout.
    pub fn from_settings(settings: &PostmarkSettings) -> Result<Self, PostmarkError> {
        let sender = Email::parse(&settings.sender)?;
        let http_client = Client::builder().timeout(settings.timeout()).build()?;

        Self::new(
            &settings.base_url,
            sender,
            settings.auth_token.clone(),
            http_client,
        )
    }

    async fn deliver(
        &self,
        subject: &str,
        recipient: &Email,
        body: &str,
    ) -> Result<(), PostmarkError> {
        let message = OutboundMessage {
            from: self.sender.as_ref().expose_secret(),
            to: recipient.as_ref().expose_secret(),
            subject,
            text_body: body,
            message_stream: MESSAGE_STREAM,
            track_opens: false,
            // Reset links must reach the user unrewritten.
            track_links: "None",
        };

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(SERVER_TOKEN_HEADER, self.server_token.expose_secret())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reply = response.json::<PostmarkReply>().await.unwrap_or_default();
            return Err(PostmarkError::Rejected {
                status,
                error_code: reply.error_code,
                message: reply.message,
            });
        }

        if let Ok(PostmarkReply {
            message_id: Some(message_id),
            ..
        }) = response.json::<PostmarkReply>().await
        {
            tracing::debug!(%message_id, event = "notification_accepted", "Postmark accepted the message");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Notifier for PostmarkNotifier {
    #[tracing::instrument(name = "PostmarkNotifier::send", skip_all)]
    async fn send(&self, subject: &str, recipient: &Email, body: &str) -> Result<(), String> {
        self.deliver(subject, recipient, body).await.map_err(|e| {
            tracing::warn!(error = %e, event = "postmark_delivery_failed", "Postmark delivery failed");
            e.to_string()
        })
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct OutboundMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
    track_opens: bool,
    track_links: &'a str,
}

/// Body Postmark answers with, on success and on rejection alike.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase", default)]
struct PostmarkReply {
    error_code: i64,
    message: String,
    #[serde(rename = "MessageID")]
    message_id: Option<String>,
}
