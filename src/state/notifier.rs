//! State change notifier for attribute observers.
//!
//! When capabilities finish updating the store they call `notify()` once.
//! Observers (the MQTT publisher) wake up and re-read whatever they need
//! from the store; the notification itself carries no payload.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

/// Wakes state observers when attributes change.
///
/// Each notification bumps a version counter. Observers hold a
/// `watch::Receiver` and only see the latest version, so bursts of
/// notifications collapse into one wake-up.
///
/// # Usage
/// ```ignore
/// let mut rx = notifier.subscribe();
/// while rx.changed().await.is_ok() {
///     // re-read the store
/// }
/// ```
pub struct StateNotifier {
    version: AtomicU64,
    sender: watch::Sender<u64>,
}

impl StateNotifier {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(0);
        Self {
            version: AtomicU64::new(0),
            sender,
        }
    }

    /// Notify that one or more attributes changed.
    ///
    /// Non-blocking; succeeds even when nobody is subscribed.
    pub fn notify(&self) {
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        self.sender.send_replace(version);
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.sender.subscribe()
    }

    /// Number of notifications sent so far.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

impl Default for StateNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_without_subscribers() {
        let notifier = StateNotifier::new();
        notifier.notify();
        notifier.notify();
        assert_eq!(notifier.version(), 2);
    }

    #[tokio::test]
    async fn test_subscriber_sees_latest_version() {
        let notifier = StateNotifier::new();
        let mut rx = notifier.subscribe();

        notifier.notify();
        notifier.notify();
        notifier.notify();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 3);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_subscriber_wakes_on_notify() {
        let notifier = StateNotifier::new();
        let mut rx = notifier.subscribe();

        let mut changed = tokio_test::task::spawn(rx.changed());
        tokio_test::assert_pending!(changed.poll());

        notifier.notify();
        assert!(changed.is_woken());
        tokio_test::assert_ready_ok!(changed.poll());
    }
}
