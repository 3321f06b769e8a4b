//! Fan-out of report and warning events to live views.
//!
//! Backed by `tokio::sync::broadcast`; dropping a receiver unsubscribes it.

use tokio::sync::broadcast;
use tracing::debug;

use crate::models::{WsEvent, WsEventMessage};

const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcasts [`WsEventMessage`]s to every connected live view.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<WsEventMessage>,
}

impl EventBroadcaster {
    /// Create a broadcaster with the default channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a broadcaster that buffers up to `capacity` events per
    /// subscriber before slow receivers start lagging.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<WsEventMessage> {
        self.sender.subscribe()
    }

    /// Stamp `event` and deliver it to current subscribers.
    /// Returns how many received it; zero subscribers is not an error.
    pub fn publish(&self, event: WsEvent) -> usize {
        let delivered = self.sender.send(WsEventMessage::new(event)).unwrap_or(0);
        debug!(delivered, "Event published");
        delivered
    }

    /// Number of live receivers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportStatus;

    #[tokio::test]
    async fn test_publish_reaches_every_subscriber() {
        let events = EventBroadcaster::new();
        let mut rx1 = events.subscribe();
        let mut rx2 = events.subscribe();

        let delivered = events.publish(WsEvent::report_status_changed(
            "r1",
            ReportStatus::Received,
            ReportStatus::Verified,
            "user_admin",
        ));
        assert_eq!(delivered, 2);
        assert!(rx1.recv().await.is_ok());
        assert!(rx2.recv().await.is_ok());
    }

    #[test]
    fn test_dropped_receiver_unsubscribes() {
        let events = EventBroadcaster::new();
        let rx = events.subscribe();
        assert_eq!(events.subscriber_count(), 1);
        drop(rx);
        assert_eq!(events.subscriber_count(), 0);
        assert_eq!(events.publish(WsEvent::snapshot(vec![])), 0);
    }

    #[tokio::test]
    async fn test_small_capacity_lags_slow_receiver() {
        let events = EventBroadcaster::with_capacity(1);
        let mut rx = events.subscribe();
        events.publish(WsEvent::snapshot(vec![]));
        events.publish(WsEvent::snapshot(vec![]));
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert!(rx.recv().await.is_ok());
    }
}
