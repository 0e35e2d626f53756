//! Driving port for broadcasting notice events to connected channels.

use notice_sync::NoticeEvent;

/// Fans one event out to every connected realtime channel.
///
/// Publishing is best-effort: there is no acknowledgement and no delivery
/// guarantee for transiently disconnected channels — a client that misses an
/// event stays stale until its next foreground-triggered full resync.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: NoticeEvent);
}

/// Publisher that drops events; used in wiring that has no channel hub.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventPublisher;

impl EventPublisher for NoopEventPublisher {
    fn publish(&self, _event: NoticeEvent) {}
}
