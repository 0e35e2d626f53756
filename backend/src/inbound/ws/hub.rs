//! Broadcast hub fanning notice events out to connected channels.
//!
//! Delivery is best-effort: a session that lags past the channel capacity
//! drops the missed events and stays connected — the client heals on its
//! next foreground-triggered full resync. There is no acknowledgement and
//! no redelivery.

use notice_sync::NoticeEvent;
use tokio::sync::broadcast;

use crate::domain::ports::EventPublisher;

const DEFAULT_CAPACITY: usize = 64;

/// Fan-out point between the notice service and WebSocket sessions.
#[derive(Debug, Clone)]
pub struct NoticeHub {
    sender: broadcast::Sender<NoticeEvent>,
}

impl NoticeHub {
    /// A hub with the default per-session buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A hub with an explicit per-session buffer capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe a new session to all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<NoticeEvent> {
        self.sender.subscribe()
    }

    /// Number of currently subscribed sessions.
    #[must_use]
    pub fn connected(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NoticeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for NoticeHub {
    fn publish(&self, event: NoticeEvent) {
        // send only errors when nobody is subscribed, which is fine here
        drop(self.sender.send(event));
    }
}
