//! Mail collaborator seam
//!
//! The core only needs to hand an intent to something that attempts
//! delivery. Template rendering and the actual transport live behind this
//! trait.

use std::sync::Mutex;

use super::NotificationIntent;

/// Delivery failure reported by the mail collaborator.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Mail transport timed out")]
    Timeout,

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Accepts a notification intent and attempts delivery.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, intent: &NotificationIntent) -> Result<(), MailError>;
}

/// Production stand-in at the transport seam: records the intent in the
/// log and reports success. An SMTP or API client plugs in here.
#[derive(Debug, Default)]
pub struct LoggingMailer;

#[async_trait::async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, intent: &NotificationIntent) -> Result<(), MailError> {
        tracing::info!(
            to = %intent.to,
            template = %intent.template,
            subject = %intent.subject,
            "Outbound notification"
        );
        Ok(())
    }
}

/// Test double that records every intent it is asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<NotificationIntent>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<NotificationIntent> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, intent: &NotificationIntent) -> Result<(), MailError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(intent.clone());
        Ok(())
    }
}
