// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! One-writer, one-reader ordered event channel between an audit and its client.

use crate::error::AuditError;
use crate::models::audit::AuditResult;
use crate::models::progress::{AuditEvent, Stage};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Create a bounded progress channel.
pub fn progress_channel(capacity: usize) -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (ProgressSender { tx }, ProgressReceiver { rx })
}

/// Writing half, owned by the orchestrator.
///
/// `finish` consumes the sender, so at most one terminal event can be sent,
/// and the channel closes right after it.
pub struct ProgressSender {
    tx: mpsc::Sender<AuditEvent>,
}

impl ProgressSender {
    /// Announce that `stage` is starting.
    /// Returns `false` if the reader is gone.
    pub async fn stage(&self, stage: Stage) -> bool {
        self.tx.send(AuditEvent::from(stage)).await.is_ok()
    }

    /// Send the terminal event and close the channel.
    pub async fn finish(self, outcome: Result<AuditResult, AuditError>) {
        let event = match outcome {
            Ok(result) => AuditEvent::Results(Box::new(result)),
            Err(e) => AuditEvent::Error(e.to_string()),
        };

        if self.tx.send(event).await.is_err() {
            tracing::debug!("client went away before the terminal event");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Reading half, owned by the transport.
pub struct ProgressReceiver {
    rx: mpsc::Receiver<AuditEvent>,
}

impl ProgressReceiver {
    pub async fn recv(&mut self) -> Option<AuditEvent> {
        self.rx.recv().await
    }

    pub fn into_stream(self) -> ReceiverStream<AuditEvent> {
        ReceiverStream::new(self.rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_events_arrive_in_order_and_channel_closes() {
        let (tx, rx) = progress_channel(8);

        assert!(tx.stage(Stage::Fetching).await);
        assert!(tx.stage(Stage::BrowserAuditing).await);
        tx.finish(Err(AuditError::BrowserAudit("exit 1".to_string())))
            .await;

        let events: Vec<AuditEvent> = rx.into_stream().collect().await;
        assert_eq!(
            events,
            vec![
                AuditEvent::Progress("Fetching HTML…".to_string()),
                AuditEvent::Progress("Running quality audit…".to_string()),
                AuditEvent::Error("Quality audit failed: exit 1".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_stage_reports_dropped_reader() {
        let (tx, rx) = progress_channel(8);
        drop(rx);

        assert!(tx.is_closed());
        assert!(!tx.stage(Stage::Fetching).await);
    }
}
