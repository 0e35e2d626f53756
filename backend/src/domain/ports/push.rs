//! Ports for push-token registration and remote push delivery.

use async_trait::async_trait;
use tracing::debug;

use super::define_port_error;

/// An opaque device push token as registered by a client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushToken(String);

impl PushToken {
    /// Wrap a raw token string; `None` when blank.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }
}

impl AsRef<str> for PushToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

define_port_error! {
    /// Errors raised by push-token registry adapters.
    pub enum PushRegistryError {
        /// Registry storage failed.
        Storage { message: String } => "push token registry failure: {message}",
    }
}

/// Driven port recording device tokens for notice-added fan-out.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushTokenRegistry: Send + Sync {
    /// Record a token; registering the same token twice is a no-op.
    async fn register(&self, token: PushToken) -> Result<(), PushRegistryError>;

    /// All currently registered tokens.
    async fn all(&self) -> Result<Vec<PushToken>, PushRegistryError>;
}

define_port_error! {
    /// Errors raised by push gateway adapters.
    pub enum PushGatewayError {
        /// The gateway could not be reached.
        Transport { message: String } => "push gateway transport failure: {message}",
        /// The gateway rejected the message.
        Rejected { message: String } => "push gateway rejected the message: {message}",
    }
}

/// One remote push message; the notice identifier is the tap-through payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub to: PushToken,
    pub title: String,
    pub body: String,
    pub notice_id: String,
}

/// Driven port for the remote push service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Deliver one message. Callers log failures and never retry.
    async fn deliver(&self, message: &PushMessage) -> Result<(), PushGatewayError>;
}

/// Gateway that drops messages; dev wiring when no endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPushGateway;

#[async_trait]
impl PushGateway for NoopPushGateway {
    async fn deliver(&self, message: &PushMessage) -> Result<(), PushGatewayError> {
        debug!(notice_id = %message.notice_id, "push gateway disabled; dropping message");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_rejected() {
        assert!(PushToken::new("  ").is_none());
        assert!(PushToken::new("").is_none());
        let token = PushToken::new("ExponentPushToken[abc]").expect("valid token");
        assert_eq!(token.as_ref(), "ExponentPushToken[abc]");
    }
}
