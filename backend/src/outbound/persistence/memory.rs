//! In-memory persistence adapters.
//!
//! Default wiring when no database URL is configured, and the test double of
//! choice for integration tests. Each adapter is a mutex-guarded map or list;
//! locks are held only for the duration of one synchronous mutation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::auth::AuthToken;
use crate::domain::notice::{Notice, NoticeId};
use crate::domain::ports::{
    NoticeRepository, NoticeStoreError, PushRegistryError, PushToken, PushTokenRegistry,
    TokenStore, TokenStoreError, UserRepository, UserStoreError,
};
use crate::domain::user::{User, UserId};

/// Process-local notice collection.
#[derive(Debug, Default)]
pub struct InMemoryNoticeRepository {
    notices: Mutex<Vec<Notice>>,
}

impl InMemoryNoticeRepository {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A collection pre-populated with the given notices.
    #[must_use]
    pub fn with_notices(notices: Vec<Notice>) -> Self {
        Self {
            notices: Mutex::new(notices),
        }
    }
}

#[async_trait]
impl NoticeRepository for InMemoryNoticeRepository {
    async fn list(&self) -> Result<Vec<Notice>, NoticeStoreError> {
        let notices = self
            .notices
            .lock()
            .map_err(|_| NoticeStoreError::query("poisoned notice lock"))?;
        Ok(notices.clone())
    }

    async fn find(&self, id: NoticeId) -> Result<Option<Notice>, NoticeStoreError> {
        let notices = self
            .notices
            .lock()
            .map_err(|_| NoticeStoreError::query("poisoned notice lock"))?;
        Ok(notices.iter().find(|stored| stored.id() == id).cloned())
    }

    async fn insert(&self, notice: &Notice) -> Result<(), NoticeStoreError> {
        let mut notices = self
            .notices
            .lock()
            .map_err(|_| NoticeStoreError::query("poisoned notice lock"))?;
        notices.push(notice.clone());
        Ok(())
    }

    async fn replace(&self, notice: &Notice) -> Result<bool, NoticeStoreError> {
        let mut notices = self
            .notices
            .lock()
            .map_err(|_| NoticeStoreError::query("poisoned notice lock"))?;
        match notices.iter_mut().find(|stored| stored.id() == notice.id()) {
            Some(stored) => {
                *stored = notice.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: NoticeId) -> Result<bool, NoticeStoreError> {
        let mut notices = self
            .notices
            .lock()
            .map_err(|_| NoticeStoreError::query("poisoned notice lock"))?;
        let before = notices.len();
        notices.retain(|stored| stored.id() != id);
        Ok(notices.len() != before)
    }
}

/// Process-local account store enforcing username and email uniqueness.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| UserStoreError::query("poisoned user lock"))?;
        if users
            .iter()
            .any(|stored| stored.profile().username == user.profile().username)
        {
            return Err(UserStoreError::duplicate_username());
        }
        if users
            .iter()
            .any(|stored| stored.profile().email == user.profile().email)
        {
            return Err(UserStoreError::duplicate_email());
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let users = self
            .users
            .lock()
            .map_err(|_| UserStoreError::query("poisoned user lock"))?;
        Ok(users.iter().find(|user| user.profile().email == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserStoreError> {
        let users = self
            .users
            .lock()
            .map_err(|_| UserStoreError::query("poisoned user lock"))?;
        Ok(users.iter().find(|user| user.id() == id).cloned())
    }
}

/// Process-local bearer-token table.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: Mutex<HashMap<String, UserId>>,
}

impl InMemoryTokenStore {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn issue(&self, user: UserId) -> Result<AuthToken, TokenStoreError> {
        let token = AuthToken::random();
        let mut tokens = self
            .tokens
            .lock()
            .map_err(|_| TokenStoreError::storage("poisoned token lock"))?;
        tokens.insert(token.as_ref().to_owned(), user);
        Ok(token)
    }

    async fn resolve(&self, token: &AuthToken) -> Result<Option<UserId>, TokenStoreError> {
        let tokens = self
            .tokens
            .lock()
            .map_err(|_| TokenStoreError::storage("poisoned token lock"))?;
        Ok(tokens.get(token.as_ref()).copied())
    }
}

/// Process-local device-token registry.
#[derive(Debug, Default)]
pub struct InMemoryPushTokenRegistry {
    tokens: Mutex<Vec<PushToken>>,
}

impl InMemoryPushTokenRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PushTokenRegistry for InMemoryPushTokenRegistry {
    async fn register(&self, token: PushToken) -> Result<(), PushRegistryError> {
        let mut tokens = self
            .tokens
            .lock()
            .map_err(|_| PushRegistryError::storage("poisoned registry lock"))?;
        if !tokens.contains(&token) {
            tokens.push(token);
        }
        Ok(())
    }

    async fn all(&self) -> Result<Vec<PushToken>, PushRegistryError> {
        let tokens = self
            .tokens
            .lock()
            .map_err(|_| PushRegistryError::storage("poisoned registry lock"))?;
        Ok(tokens.clone())
    }
}
