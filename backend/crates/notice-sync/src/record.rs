//! Wire-level notice records.
//!
//! Field names match the payloads the realtime channel and REST surface
//! exchange: `notice` is the body text, `date` travels as RFC 3339, `time`
//! is display-only free text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A school announcement as it appears on the wire and on the client board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoticeRecord {
    /// Server-assigned opaque identifier, unique within the collection.
    pub id: String,
    /// Headline shown on the notice board.
    pub title: String,
    /// Body text of the announcement.
    pub notice: String,
    /// Calendar date of the announced event.
    pub date: DateTime<Utc>,
    /// Display time, free text such as `9:00 AM`.
    pub time: String,
    /// Authoring user reference.
    pub user: String,
}

/// Notice fields before the server has assigned an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NoticeDraftRecord {
    pub title: String,
    pub notice: String,
    pub date: DateTime<Utc>,
    pub time: String,
    pub user: String,
}

impl NoticeDraftRecord {
    /// Attach a server-assigned identifier, producing a full record.
    #[must_use]
    pub fn into_record(self, id: impl Into<String>) -> NoticeRecord {
        NoticeRecord {
            id: id.into(),
            title: self.title,
            notice: self.notice,
            date: self.date,
            time: self.time,
            user: self.user,
        }
    }
}
