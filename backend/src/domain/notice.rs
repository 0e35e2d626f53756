//! Notice aggregate and validation.
//!
//! ## Invariants
//! - `id` is server-assigned and unique within the collection.
//! - `title` is non-empty once trimmed and at most [`TITLE_MAX`] characters.
//! - `body` and `author` are non-empty.
//!
//! No other cross-field invariant exists; `time` is display-only free text.

use std::fmt;

use chrono::{DateTime, Utc};
use notice_sync::{NoticeDraftRecord, NoticeRecord};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum allowed length for a notice title.
pub const TITLE_MAX: usize = 120;

/// Validation errors raised when building notices from wire input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoticeValidationError {
    #[error("notice id must be a valid UUID")]
    InvalidId,
    #[error("notice title must not be empty")]
    EmptyTitle,
    #[error("notice title must be at most {max} characters")]
    TitleTooLong { max: usize },
    #[error("notice body must not be empty")]
    EmptyBody,
    #[error("notice author must not be empty")]
    EmptyAuthor,
}

/// Server-assigned opaque notice identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoticeId(Uuid);

impl NoticeId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its wire form.
    pub fn parse(raw: &str) -> Result<Self, NoticeValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| NoticeValidationError::InvalidId)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for NoticeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<NoticeId> for String {
    fn from(value: NoticeId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for NoticeId {
    type Error = NoticeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Validated notice headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NoticeTitle(String);

impl NoticeTitle {
    /// Validate and construct a title.
    pub fn new(title: impl Into<String>) -> Result<Self, NoticeValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(NoticeValidationError::EmptyTitle);
        }
        if title.chars().count() > TITLE_MAX {
            return Err(NoticeValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(title))
    }
}

impl AsRef<str> for NoticeTitle {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NoticeTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<NoticeTitle> for String {
    fn from(value: NoticeTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for NoticeTitle {
    type Error = NoticeValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated notice fields without an identifier; input to creation and
/// full-document replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeDraft {
    title: NoticeTitle,
    body: String,
    date: DateTime<Utc>,
    time: String,
    author: String,
}

impl NoticeDraft {
    /// Validate a wire draft.
    pub fn from_record(record: NoticeDraftRecord) -> Result<Self, NoticeValidationError> {
        let title = NoticeTitle::new(record.title)?;
        if record.notice.trim().is_empty() {
            return Err(NoticeValidationError::EmptyBody);
        }
        if record.user.trim().is_empty() {
            return Err(NoticeValidationError::EmptyAuthor);
        }
        Ok(Self {
            title,
            body: record.notice,
            date: record.date,
            time: record.time,
            author: record.user,
        })
    }

    /// Promote the draft into a notice under a server-assigned identifier.
    #[must_use]
    pub fn into_notice(self, id: NoticeId) -> Notice {
        Notice {
            id,
            title: self.title,
            body: self.body,
            date: self.date,
            time: self.time,
            author: self.author,
        }
    }
}

impl TryFrom<NoticeDraftRecord> for NoticeDraft {
    type Error = NoticeValidationError;

    fn try_from(value: NoticeDraftRecord) -> Result<Self, Self::Error> {
        Self::from_record(value)
    }
}

/// Partial or full update for an existing notice.
///
/// Fields left `None` keep their stored value; the merged result is
/// re-validated as a whole before it replaces the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeUpdate {
    pub title: Option<String>,
    pub notice: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub time: Option<String>,
    pub user: Option<String>,
}

impl NoticeUpdate {
    /// Merge the update over an existing notice, yielding the replacement
    /// draft.
    #[must_use]
    pub fn apply_to(self, existing: &Notice) -> NoticeDraftRecord {
        let record = existing.to_record();
        NoticeDraftRecord {
            title: self.title.unwrap_or(record.title),
            notice: self.notice.unwrap_or(record.notice),
            date: self.date.unwrap_or(record.date),
            time: self.time.unwrap_or(record.time),
            user: self.user.unwrap_or(record.user),
        }
    }
}

impl From<NoticeRecord> for NoticeUpdate {
    /// A full record acts as an update of every field.
    fn from(value: NoticeRecord) -> Self {
        Self {
            title: Some(value.title),
            notice: Some(value.notice),
            date: Some(value.date),
            time: Some(value.time),
            user: Some(value.user),
        }
    }
}

/// A school announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    id: NoticeId,
    title: NoticeTitle,
    body: String,
    date: DateTime<Utc>,
    time: String,
    author: String,
}

impl Notice {
    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> NoticeId {
        self.id
    }

    /// Headline shown on the board.
    #[must_use]
    pub fn title(&self) -> &NoticeTitle {
        &self.title
    }

    /// Body text.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Calendar date of the announced event.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Display time, free text.
    #[must_use]
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Authoring user reference, opaque at this layer.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Project the notice onto its wire record.
    #[must_use]
    pub fn to_record(&self) -> NoticeRecord {
        NoticeRecord {
            id: self.id.to_string(),
            title: self.title.to_string(),
            notice: self.body.clone(),
            date: self.date,
            time: self.time.clone(),
            user: self.author.clone(),
        }
    }

    /// Rehydrate a notice from a stored wire record.
    pub fn from_record(record: NoticeRecord) -> Result<Self, NoticeValidationError> {
        let id = NoticeId::parse(&record.id)?;
        let draft = NoticeDraft::from_record(NoticeDraftRecord {
            title: record.title,
            notice: record.notice,
            date: record.date,
            time: record.time,
            user: record.user,
        })?;
        Ok(draft.into_notice(id))
    }
}
