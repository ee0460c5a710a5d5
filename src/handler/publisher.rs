//! Notification publishers.
//!
//! `Publisher` is an enum over concrete backends; enum dispatch keeps the
//! `publish` call an ordinary `async fn` with no trait objects.

use std::sync::{Arc, Mutex};

use aws_sdk_sns::error::DisplayErrorContext;
use tracing::{error, info};

use super::HandlerError;

/// What a successful publish hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Publisher {
    Sns(SnsPublisher),
    Dummy(DummyPublisher),
}

impl Publisher {
    /// Publish `message` once under `subject`.
    pub async fn publish(&self, subject: &str, message: &str) -> Result<PublishReceipt, HandlerError> {
        match self {
            Publisher::Sns(p) => p.publish(subject, message).await,
            Publisher::Dummy(p) => p.publish(subject, message).await,
        }
    }
}

// ── SNS ───────────────────────────────────────────────────────────────────────

/// Publishes to a single SNS topic. Credentials and region come from the
/// standard AWS provider chain.
#[derive(Debug, Clone)]
pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
    topic_arn: String,
}

impl SnsPublisher {
    pub async fn from_env(topic_arn: String) -> Self {
        let config = aws_config::load_from_env().await;
        Self::with_client(aws_sdk_sns::Client::new(&config), topic_arn)
    }

    pub fn with_client(client: aws_sdk_sns::Client, topic_arn: String) -> Self {
        Self { client, topic_arn }
    }

    async fn publish(&self, subject: &str, message: &str) -> Result<PublishReceipt, HandlerError> {
        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| {
                let detail = DisplayErrorContext(&e).to_string();
                error!(topic_arn = %self.topic_arn, error = %detail, "SNS publish failed");
                HandlerError::Publish(detail)
            })?;

        let message_id = output.message_id().map(str::to_string);
        info!(topic_arn = %self.topic_arn, message_id = ?message_id, "published to SNS");
        Ok(PublishReceipt { message_id })
    }
}

// ── Dummy ─────────────────────────────────────────────────────────────────────

/// A message captured by [`DummyPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub subject: String,
    pub message: String,
}

/// Logs and records messages instead of sending them. Clones share the
/// same record.
#[derive(Debug, Clone, Default)]
pub struct DummyPublisher {
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl DummyPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything published so far, oldest first.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    async fn publish(&self, subject: &str, message: &str) -> Result<PublishReceipt, HandlerError> {
        info!(%subject, bytes = message.len(), "dummy publisher: not sending");
        info!("{message}");

        let mut sent = self
            .sent
            .lock()
            .map_err(|_| HandlerError::Publish("dummy publisher lock poisoned".into()))?;
        sent.push(SentMessage { subject: subject.to_string(), message: message.to_string() });

        Ok(PublishReceipt { message_id: Some(format!("dummy-{}", sent.len())) })
    }
}
