//! User accounts and roles.
//!
//! ## Invariants
//! - `username` and `email` are unique within the collection (enforced by the
//!   user repository).
//! - A Student profile must carry a batch; other roles may omit it.
//!
//! Password digests live on the aggregate but never serialise outward; the
//! HTTP layer projects users through [`Profile`] only.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::PasswordDigest;

/// Stable user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its wire form.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Account role. Teachers are the authoring role for notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Student,
    Teacher,
    Intern,
}

impl Role {
    /// Whether this role may create, edit, or delete notices.
    #[must_use]
    pub fn can_author_notices(self) -> bool {
        matches!(self, Self::Teacher)
    }
}

/// Student batch assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Batch {
    Morning,
    Afternoon,
    Both,
}

/// Validation errors for registration profiles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must contain an @")]
    InvalidEmail,
    #[error("phone must not be empty")]
    EmptyPhone,
    #[error("address must not be empty")]
    EmptyAddress,
    #[error("students must be assigned a batch")]
    MissingBatch,
}

/// User profile as registered and as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub age: u8,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<Batch>,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
    pub address: String,
    pub username: String,
    pub email: String,
}

impl Profile {
    /// Check the profile's field-level invariants.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if self.username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if self.email.trim().is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !self.email.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        if self.phone.trim().is_empty() {
            return Err(UserValidationError::EmptyPhone);
        }
        if self.address.trim().is_empty() {
            return Err(UserValidationError::EmptyAddress);
        }
        if self.role == Role::Student && self.batch.is_none() {
            return Err(UserValidationError::MissingBatch);
        }
        Ok(())
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    profile: Profile,
    password: PasswordDigest,
}

impl User {
    /// Assemble an account from validated parts.
    #[must_use]
    pub fn new(id: UserId, profile: Profile, password: PasswordDigest) -> Self {
        Self {
            id,
            profile,
            password,
        }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Profile fields safe to return to clients.
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Stored password digest.
    #[must_use]
    pub fn password(&self) -> &PasswordDigest {
        &self.password
    }

    /// Account role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.profile.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    pub(crate) fn profile(role: Role, batch: Option<Batch>) -> Profile {
        Profile {
            name: "Asha Rao".to_owned(),
            age: 16,
            role,
            batch,
            phone: "555-0100".to_owned(),
            emergency_contact: None,
            address: "12 College Road".to_owned(),
            username: "asha".to_owned(),
            email: "asha@example.edu".to_owned(),
        }
    }

    #[test]
    fn teacher_is_the_authoring_role() {
        assert!(Role::Teacher.can_author_notices());
        assert!(!Role::Student.can_author_notices());
        assert!(!Role::Intern.can_author_notices());
    }

    #[test]
    fn student_requires_a_batch() {
        let error = profile(Role::Student, None)
            .validate()
            .expect_err("batchless student must be rejected");
        assert_eq!(error, UserValidationError::MissingBatch);
        assert!(profile(Role::Student, Some(Batch::Morning)).validate().is_ok());
    }

    #[test]
    fn non_students_may_omit_the_batch() {
        assert!(profile(Role::Teacher, None).validate().is_ok());
        assert!(profile(Role::Intern, None).validate().is_ok());
    }

    #[rstest]
    #[case("no-at-sign", UserValidationError::InvalidEmail)]
    #[case("", UserValidationError::EmptyEmail)]
    fn rejects_bad_emails(#[case] email: &str, #[case] expected: UserValidationError) {
        let mut p = profile(Role::Teacher, None);
        p.email = email.to_owned();
        assert_eq!(p.validate().expect_err("must reject"), expected);
    }

    #[test]
    fn batch_serialises_lowercase() {
        let value = serde_json::to_value(Batch::Both).expect("serialise");
        assert_eq!(value, serde_json::json!("both"));
        let role = serde_json::to_value(Role::Teacher).expect("serialise");
        assert_eq!(role, serde_json::json!("Teacher"));
    }
}
