//! Outbound notification dispatch
//!
//! An unbounded queue consumed by a background worker. Queueing never
//! blocks the mutation path; each send runs under a timeout; failures are
//! logged and swallowed, never retried, never surfaced to the caller.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{Mailer, NotificationIntent};

/// Handle for queueing notification intents.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: mpsc::UnboundedSender<NotificationIntent>,
}

impl Dispatcher {
    /// Start the background worker. The worker drains the queue until
    /// every `Dispatcher` clone has been dropped, then exits.
    pub fn spawn(
        mailer: Arc<dyn Mailer>,
        send_timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(rx, mailer, send_timeout));
        (Self { tx }, handle)
    }

    /// Queue a batch of intents. Once queued, individual sends are not
    /// abortable and complete in no particular order relative to the
    /// caller.
    pub fn dispatch(&self, intents: Vec<NotificationIntent>) {
        for intent in intents {
            if self.tx.send(intent).is_err() {
                tracing::error!("Notification worker has stopped; intent dropped");
            }
        }
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<NotificationIntent>,
    mailer: Arc<dyn Mailer>,
    send_timeout: Duration,
) {
    tracing::debug!("Notification worker started");

    while let Some(intent) = rx.recv().await {
        match tokio::time::timeout(send_timeout, mailer.send(&intent)).await {
            Ok(Ok(())) => {
                tracing::debug!(to = %intent.to, template = %intent.template, "Notification delivered");
            }
            Ok(Err(e)) => {
                tracing::error!(
                    to = %intent.to,
                    template = %intent.template,
                    error = %e,
                    "Notification delivery failed"
                );
            }
            Err(_) => {
                tracing::error!(
                    to = %intent.to,
                    template = %intent.template,
                    timeout_secs = send_timeout.as_secs(),
                    "Notification delivery timed out"
                );
            }
        }
    }

    tracing::debug!("Notification worker stopped");
}
