//! Registration, login, and bearer-token resolution.

use std::sync::Arc;

use serde_json::json;

use crate::domain::auth::{AuthToken, LoginCredentials, PasswordDigest};
use crate::domain::error::DomainError;
use crate::domain::ports::{TokenStore, TokenStoreError, UserRepository, UserStoreError};
use crate::domain::user::{Profile, User, UserId};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;

/// Driving service for the auth REST surface and channel authorisation.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenStore>,
}

impl AuthService {
    /// Wire the service from its ports.
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { users, tokens }
    }

    /// Register an account and issue its first bearer token.
    pub async fn register(
        &self,
        profile: Profile,
        password: &str,
    ) -> Result<(AuthToken, User), DomainError> {
        profile
            .validate()
            .map_err(|error| DomainError::invalid_request(error.to_string()))?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(DomainError::invalid_request(format!(
                "password must be at least {PASSWORD_MIN} characters"
            ))
            .with_details(json!({ "field": "password" })));
        }

        let user = User::new(
            UserId::random(),
            profile,
            PasswordDigest::derive(password),
        );
        self.users
            .insert(&user)
            .await
            .map_err(map_user_store_error)?;

        let token = self
            .tokens
            .issue(user.id())
            .await
            .map_err(map_token_store_error)?;
        Ok((token, user))
    }

    /// Authenticate by email and password, issuing a fresh token.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<(AuthToken, User), DomainError> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_store_error)?
            .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

        if !user.password().matches(credentials.password()) {
            return Err(DomainError::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self
            .tokens
            .issue(user.id())
            .await
            .map_err(map_token_store_error)?;
        Ok((token, user))
    }

    /// Resolve a bearer token to the account it was issued for.
    pub async fn resolve(&self, token: &AuthToken) -> Result<Option<User>, DomainError> {
        let Some(user_id) = self
            .tokens
            .resolve(token)
            .await
            .map_err(map_token_store_error)?
        else {
            return Ok(None);
        };
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_store_error)
    }

    /// Require a token belonging to the notice-authoring role.
    pub async fn require_author(&self, token: Option<&AuthToken>) -> Result<User, DomainError> {
        let token = token.ok_or_else(|| DomainError::unauthorized("login required"))?;
        let user = self
            .resolve(token)
            .await?
            .ok_or_else(|| DomainError::unauthorized("invalid or expired token"))?;
        if !user.role().can_author_notices() {
            return Err(DomainError::forbidden("only teachers may manage notices"));
        }
        Ok(user)
    }
}

fn map_user_store_error(error: UserStoreError) -> DomainError {
    match error {
        UserStoreError::DuplicateUsername | UserStoreError::DuplicateEmail => {
            DomainError::conflict(error.to_string())
        }
        other => DomainError::internal(other.to_string()),
    }
}

fn map_token_store_error(error: TokenStoreError) -> DomainError {
    DomainError::internal(error.to_string())
}
