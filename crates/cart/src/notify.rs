//! User-facing notification channel.
//!
//! The store calls a [`Notifier`] with one short message each time an
//! operation fails. What happens next (a toast, a status line, a log entry)
//! is up to the front-end.

use tokio::sync::mpsc;

use crate::error::CartOperation;

/// A failure message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Operation that failed.
    pub operation: CartOperation,
    /// Short human-readable message.
    pub message: String,
}

/// Receives user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

impl<F> Notifier for F
where
    F: Fn(&Notification) + Send + Sync,
{
    fn notify(&self, notification: &Notification) {
        self(notification);
    }
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::warn!(
            operation = notification.operation.as_str(),
            "{}",
            notification.message
        );
    }
}

/// Forwards notifications to an unbounded channel.
///
/// Messages sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiver that drains it.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: &Notification) {
        if self.tx.send(notification.clone()).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn failure() -> Notification {
        Notification {
            operation: CartOperation::Add,
            message: CartOperation::Add.failure_message().to_string(),
        }
    }

    #[test]
    fn test_closure_notifier() {
        let seen = Mutex::new(Vec::new());
        let notifier = |n: &Notification| seen.lock().unwrap().push(n.message.clone());

        notifier.notify(&failure());

        assert_eq!(seen.lock().unwrap().as_slice(), ["Error adding product"]);
    }

    #[test]
    fn test_channel_notifier() {
        let (notifier, mut rx) = ChannelNotifier::channel();
        notifier.notify(&failure());

        assert_eq!(rx.try_recv().unwrap(), failure());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_tracing_notifier_as_trait_object() {
        let notifiers: Vec<Box<dyn Notifier>> = vec![
            Box::new(TracingNotifier),
            Box::new(|_: &Notification| {}),
        ];
        for notifier in &notifiers {
            notifier.notify(&failure());
        }
    }

    #[test]
    fn test_channel_notifier_after_receiver_dropped() {
        let (notifier, rx) = ChannelNotifier::channel();
        drop(rx);
        notifier.notify(&failure());
    }
}
