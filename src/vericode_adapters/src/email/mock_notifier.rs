use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::sync::RwLock;
use vericode_core::{Email, Notifier};

/// A message captured by [`MockNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub subject: String,
    pub recipient: String,
    pub body: String,
}

/// Notifier that keeps messages in memory instead of delivering them.
#[derive(Debug, Clone, Default)]
pub struct MockNotifier {
    sent: Arc<RwLock<Vec<SentMessage>>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every send fails, for exercising delivery errors.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    pub async fn last_message_to(&self, recipient: &Email) -> Option<SentMessage> {
        let recipient = recipient.as_ref().expose_secret();
        self.sent
            .read()
            .await
            .iter()
            .rev()
            .find(|message| &message.recipient == recipient)
            .cloned()
    }
}

#[async_trait::async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, subject: &str, recipient: &Email, body: &str) -> Result<(), String> {
        if self.fail {
            return Err("mock notifier configured to fail".to_string());
        }
        self.sent.write().await.push(SentMessage {
            subject: subject.to_string(),
            recipient: recipient.as_ref().expose_secret().clone(),
            body: body.to_string(),
        });
        Ok(())
    }
}
