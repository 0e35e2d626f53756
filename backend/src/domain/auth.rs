//! Credentials, password digests, and bearer tokens.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Validation errors for login credentials.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Login input: the original client authenticates by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and construct credentials.
    pub fn try_from_parts(
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CredentialsError> {
        let email = email.into();
        let password = password.into();
        if email.trim().is_empty() {
            return Err(CredentialsError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self { email, password })
    }

    /// Login email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Raw password; only ever compared against a digest.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Salted SHA-256 password digest.
///
/// The salt is stored alongside the hex digest; the raw password is dropped
/// immediately after derivation and never serialised or logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordDigest {
    salt: String,
    digest: String,
}

impl PasswordDigest {
    /// Derive a digest for a new password under a fresh random salt.
    #[must_use]
    pub fn derive(password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let digest = Self::digest_hex(&salt, password);
        Self { salt, digest }
    }

    /// Rehydrate a stored digest.
    #[must_use]
    pub fn from_parts(salt: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            digest: digest.into(),
        }
    }

    /// Constant-shape comparison of a candidate password.
    #[must_use]
    pub fn matches(&self, password: &str) -> bool {
        Self::digest_hex(&self.salt, password) == self.digest
    }

    /// Stored salt.
    #[must_use]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Stored hex digest.
    #[must_use]
    pub fn digest(&self) -> &str {
        &self.digest
    }

    fn digest_hex(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Opaque bearer token handed to clients on login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    /// Mint a fresh random token.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap a token received on the wire.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }
}

impl AsRef<str> for AuthToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
