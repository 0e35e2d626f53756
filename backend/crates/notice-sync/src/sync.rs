//! Client-side synchronisation driver.
//!
//! Owns the notice board and the two behaviours layered on top of raw event
//! application: the foreground trigger (a full resync whenever the app
//! returns to the foreground) and local alert scheduling for added notices.
//! Transport and platform notification APIs stay behind the [`CommandSink`]
//! and [`AlertScheduler`] seams.

use crate::board::NoticeBoard;
use crate::event::{ClientCommand, NoticeEvent};
use crate::record::{NoticeDraftRecord, NoticeRecord};

/// Application lifecycle states as reported by the embedding platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    /// App is in the foreground and interactive.
    Active,
    /// App is transitioning or obscured.
    Inactive,
    /// App is fully backgrounded.
    Background,
}

/// Transport seam: delivers commands toward the realtime channel.
pub trait CommandSink {
    fn send(&mut self, command: ClientCommand);
}

/// An immediate local alert bound to a notice.
///
/// The notice identifier is the tap-through payload; the embedding platform
/// navigates to the notice board when the alert is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAlert {
    pub notice_id: String,
    pub title: String,
    pub body: String,
}

/// Platform notification seam.
pub trait AlertScheduler {
    fn schedule(&mut self, alert: LocalAlert);
}

/// Drives one client's notice board against the realtime channel.
#[derive(Debug)]
pub struct SyncClient<S, A> {
    board: NoticeBoard,
    sink: S,
    alerts: A,
    lifecycle: AppLifecycle,
}

impl<S: CommandSink, A: AlertScheduler> SyncClient<S, A> {
    /// A client with an empty board, considered foregrounded.
    pub fn new(sink: S, alerts: A) -> Self {
        Self {
            board: NoticeBoard::new(),
            sink,
            alerts,
            lifecycle: AppLifecycle::Active,
        }
    }

    /// The local notice board.
    pub fn board(&self) -> &NoticeBoard {
        &self.board
    }

    /// Request the initial full board. Call once after the channel connects.
    pub fn start(&mut self) {
        self.sink.send(ClientCommand::FetchNotices);
    }

    /// Apply one server event, scheduling a local alert for added notices.
    pub fn handle_event(&mut self, event: NoticeEvent) {
        if let NoticeEvent::NoticeAdded(record) = &event {
            self.alerts.schedule(LocalAlert {
                notice_id: record.id.clone(),
                title: record.title.clone(),
                body: record.notice.clone(),
            });
        }
        self.board.apply(event);
    }

    /// Observe a lifecycle transition; resuming to the foreground forces a
    /// full resync, the only recovery path for events missed while away.
    pub fn handle_lifecycle(&mut self, next: AppLifecycle) {
        let resumed = matches!(
            self.lifecycle,
            AppLifecycle::Inactive | AppLifecycle::Background
        ) && next == AppLifecycle::Active;
        if resumed {
            self.sink.send(ClientCommand::FetchNotices);
        }
        self.lifecycle = next;
    }

    /// Submit a new notice draft.
    pub fn add_notice(&mut self, draft: NoticeDraftRecord) {
        self.sink.send(ClientCommand::AddNotice(draft));
    }

    /// Replace an existing notice in full.
    pub fn edit_notice(&mut self, record: NoticeRecord) {
        self.sink.send(ClientCommand::EditNotice(record));
    }

    /// Delete a notice by identifier.
    pub fn delete_notice(&mut self, id: impl Into<String>) {
        self.sink.send(ClientCommand::DeleteNotice(id.into()));
    }

    /// Register this device's push token with the server.
    pub fn register_push_token(&mut self, token: impl Into<String>) {
        self.sink.send(ClientCommand::RegisterPushToken(token.into()));
    }
}
