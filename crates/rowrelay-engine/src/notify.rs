//! User-facing notification dispatch.

use tokio::sync::mpsc::Sender;
use tracing::{debug, info};

/// Notification severity; embeddings map this to toast styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// Neutral information.
    Info,
    /// An operation verifiably succeeded.
    Success,
    /// Something worked with caveats.
    Warn,
    /// An operation failed.
    Error,
}

/// A user-visible notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity class.
    pub severity: Severity,
    /// Message text.
    pub text: String,
}

/// Fire-and-forget notification dispatcher.
///
/// The engine never blocks on the notification surface: a full or closed
/// channel drops the notice. Every send is logged at info level for
/// traceability regardless of delivery.
#[derive(Clone)]
pub struct Notifier {
    tx: Option<Sender<Notice>>,
}

impl Notifier {
    /// Dispatcher over the embedding's notice channel.
    #[must_use]
    pub const fn new(tx: Sender<Notice>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Dispatcher with no sink; notices are logged and dropped.
    #[must_use]
    pub const fn disconnected() -> Self {
        Self { tx: None }
    }

    /// Send a notice without waiting for delivery.
    pub fn notify(&self, severity: Severity, text: impl Into<String>) {
        let text = text.into();
        info!(severity = ?severity, text = %text, "notification");
        if let Some(tx) = &self.tx
            && tx.try_send(Notice { severity, text }).is_err()
        {
            debug!("notification_dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_delivers_without_blocking() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(4);
        let notifier = Notifier::new(tx);
        notifier.notify(Severity::Error, "could not move");
        let notice = rx.try_recv().expect("notice delivered");
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.text, "could not move");
    }

    #[tokio::test]
    async fn full_channel_drops_instead_of_blocking() {
        let (tx, rx) = tokio::sync::mpsc::channel(1);
        let notifier = Notifier::new(tx);
        notifier.notify(Severity::Info, "first");
        notifier.notify(Severity::Info, "second");
        drop(rx);
        // Reaching here without await proves nothing blocked.
        notifier.notify(Severity::Info, "third");
    }
}
