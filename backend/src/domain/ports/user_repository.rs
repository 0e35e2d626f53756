//! Port abstraction for user persistence adapters.

use async_trait::async_trait;

use crate::domain::user::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// The username is already registered.
        DuplicateUsername => "username is already taken",
        /// The email is already registered.
        DuplicateEmail => "email is already registered",
    }
}

/// Driven port for account storage. Adapters enforce username and email
/// uniqueness and report violations via the duplicate variants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account.
    async fn insert(&self, user: &User) -> Result<(), UserStoreError>;

    /// Look an account up by login email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError>;

    /// Look an account up by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError>;
}
