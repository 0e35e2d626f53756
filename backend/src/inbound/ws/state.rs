//! Shared WebSocket adapter state.
//!
//! Sessions depend on domain services and the broadcast hub; everything else
//! (framing, heartbeats) stays inside the session module.

use std::sync::Arc;

use crate::domain::ports::PushTokenRegistry;
use crate::domain::{AuthService, NoticeService};
use crate::inbound::ws::hub::NoticeHub;

/// Dependency bundle for WebSocket sessions.
#[derive(Clone)]
pub struct WsState {
    pub notices: Arc<NoticeService>,
    pub auth: Arc<AuthService>,
    pub push_tokens: Arc<dyn PushTokenRegistry>,
    pub hub: NoticeHub,
}

impl WsState {
    /// Construct state from explicit services and the shared hub.
    pub fn new(
        notices: Arc<NoticeService>,
        auth: Arc<AuthService>,
        push_tokens: Arc<dyn PushTokenRegistry>,
        hub: NoticeHub,
    ) -> Self {
        Self {
            notices,
            auth,
            push_tokens,
            hub,
        }
    }
}
