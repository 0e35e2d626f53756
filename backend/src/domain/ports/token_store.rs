//! Port abstraction for bearer-token storage.

use async_trait::async_trait;

use crate::domain::auth::AuthToken;
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by token store adapters.
    pub enum TokenStoreError {
        /// Token storage failed.
        Storage { message: String } => "token store failure: {message}",
    }
}

/// Driven port mapping opaque bearer tokens to user identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Mint and record a token for the user.
    async fn issue(&self, user: UserId) -> Result<AuthToken, TokenStoreError>;

    /// Resolve a presented token to the user it was issued for.
    async fn resolve(&self, token: &AuthToken) -> Result<Option<UserId>, TokenStoreError>;
}
