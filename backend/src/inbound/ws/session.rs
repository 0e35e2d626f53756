//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge while deferring
//! application behaviour to the domain services. The public contract pings
//! every 5s and considers a connection idle after 10s without client
//! traffic; tests shorten these intervals.
//!
//! Channel handlers run sequentially: one board mutation per command, one
//! outbound frame per hub event. Mutating commands are dropped (with a log
//! line, never an error frame — the protocol has no error event) unless the
//! upgrade carried a Teacher bearer token.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use notice_sync::{ClientCommand, NoticeEvent};
use tokio::sync::broadcast;
use tokio::time;
use tracing::warn;

use crate::domain::ports::PushToken;
use crate::domain::{DomainError, NoticeService, NoticeUpdate, User};
use crate::inbound::ws::state::WsState;

/// Time between heartbeats to the client.
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client.
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    state: WsState,
    author: Option<User>,
    events: broadcast::Receiver<NoticeEvent>,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(state, author)
        .run(events, session, stream)
        .await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    HubClosed,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    state: WsState,
    author: Option<User>,
}

impl WsSession {
    fn new(state: WsState, author: Option<User>) -> Self {
        Self { state, author }
    }

    async fn run(
        &self,
        mut events: broadcast::Receiver<NoticeEvent>,
        mut session: Session,
        mut stream: MessageStream,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                event = events.recv() => {
                    self.handle_hub_event(&mut session, event).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_hub_event(
        &self,
        session: &mut Session,
        event: Result<NoticeEvent, broadcast::error::RecvError>,
    ) -> Result<(), SessionError> {
        match event {
            Ok(event) => self.send_event(session, &event).await,
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                // The client stays subscribed and heals on its next full
                // resync; the dropped events are gone for this channel.
                warn!(missed, "session lagged behind the notice hub");
                Ok(())
            }
            Err(broadcast::error::RecvError::Closed) => Err(SessionError::HubClosed),
        }
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let command = match serde_json::from_str::<ClientCommand>(text) {
            Ok(command) => command,
            Err(error) => {
                warn!(error = %error, "rejected malformed channel payload");
                return Err(SessionError::InvalidPayload);
            }
        };

        match command {
            ClientCommand::FetchNotices => self.send_full_board(session).await,
            ClientCommand::AddNotice(draft) => {
                self.authorised_mutation("add_notice", |notices| async move {
                    notices.create(draft).await.map(|_| ())
                })
                .await;
                Ok(())
            }
            ClientCommand::EditNotice(record) => {
                let id = record.id.clone();
                let update = NoticeUpdate::from(record);
                self.authorised_mutation("edit_notice", |notices| async move {
                    notices.replace(&id, update).await.map(|_| ())
                })
                .await;
                Ok(())
            }
            ClientCommand::DeleteNotice(id) => {
                self.authorised_mutation("delete_notice", |notices| async move {
                    notices.delete(&id).await
                })
                .await;
                Ok(())
            }
            ClientCommand::RegisterPushToken(raw) => {
                self.register_push_token(raw).await;
                Ok(())
            }
        }
    }

    /// Answer `fetch_notices` with a full board for this channel only.
    async fn send_full_board(&self, session: &mut Session) -> Result<(), SessionError> {
        match self.state.notices.list().await {
            Ok(notices) => {
                self.send_event(session, &NoticeEvent::Notices(notices))
                    .await
            }
            Err(error) => {
                warn!(error = %error, "failed to load notices for fetch_notices");
                Ok(())
            }
        }
    }

    async fn authorised_mutation<F, Fut>(&self, command: &'static str, operation: F)
    where
        F: FnOnce(Arc<NoticeService>) -> Fut,
        Fut: Future<Output = Result<(), DomainError>>,
    {
        let authorised = self
            .author
            .as_ref()
            .is_some_and(|user| user.role().can_author_notices());
        if !authorised {
            warn!(command, "dropping mutating command from unauthorised channel");
            return;
        }

        if let Err(error) = operation(self.state.notices.clone()).await {
            warn!(command, error = %error, "channel mutation failed");
        }
    }

    async fn register_push_token(&self, raw: String) {
        let Some(token) = PushToken::new(raw) else {
            warn!("ignoring blank push token registration");
            return;
        };
        if let Err(error) = self.state.push_tokens.register(token).await {
            warn!(error = %error, "failed to register push token");
        }
    }

    async fn send_event(
        &self,
        session: &mut Session,
        event: &NoticeEvent,
    ) -> Result<(), SessionError> {
        match serde_json::to_string(event) {
            Ok(body) => session.text(body).await.map_err(SessionError::Network),
            Err(error) => {
                warn!(error = %error, "failed to serialise channel event");
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("channel heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "channel protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "channel send failed; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed
            | SessionError::HubClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::HubClosed => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Away,
                description: Some("server shutting down".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "failed to close channel session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
