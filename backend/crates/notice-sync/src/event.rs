//! Event and command envelopes for the realtime channel.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`. The
//! names are part of the public contract; renaming a variant is a protocol
//! break.

use serde::{Deserialize, Serialize};

use crate::record::{NoticeDraftRecord, NoticeRecord};

/// Server→client notice events.
///
/// Events carry no sequence number; clients apply them in arrival order and
/// recover from missed events via the foreground-triggered full resync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum NoticeEvent {
    /// Full replacement of the client board.
    Notices(Vec<NoticeRecord>),
    /// A notice was created.
    NoticeAdded(NoticeRecord),
    /// A notice was replaced in full.
    NoticeUpdated(NoticeRecord),
    /// A notice was removed; only the identifier travels.
    NoticeDeleted(String),
}

/// Client→server commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientCommand {
    /// Request a fresh `Notices` event for this channel only.
    FetchNotices,
    /// Create a notice from the draft payload.
    AddNotice(NoticeDraftRecord),
    /// Replace the notice matching the embedded identifier.
    EditNotice(NoticeRecord),
    /// Delete the notice with this identifier.
    DeleteNotice(String),
    /// Record a device push token for notice-added fan-out.
    RegisterPushToken(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn record(id: &str) -> NoticeRecord {
        NoticeRecord {
            id: id.to_owned(),
            title: "Exam Schedule".to_owned(),
            notice: "The exam schedule has been updated.".to_owned(),
            date: Utc.with_ymd_and_hms(2024, 9, 15, 0, 0, 0).single().expect("valid date"),
            time: "9:00 AM".to_owned(),
            user: "u1".to_owned(),
        }
    }

    #[rstest]
    #[case(NoticeEvent::Notices(vec![record("a")]), "notices")]
    #[case(NoticeEvent::NoticeAdded(record("a")), "notice_added")]
    #[case(NoticeEvent::NoticeUpdated(record("a")), "notice_updated")]
    #[case(NoticeEvent::NoticeDeleted("a".to_owned()), "notice_deleted")]
    fn events_carry_their_wire_names(#[case] event: NoticeEvent, #[case] name: &str) {
        let value = serde_json::to_value(&event).expect("event serialises");
        assert_eq!(value.get("event").and_then(Value::as_str), Some(name));
    }

    #[test]
    fn deleted_event_carries_only_the_identifier() {
        let value =
            serde_json::to_value(NoticeEvent::NoticeDeleted("abc".to_owned())).expect("serialise");
        assert_eq!(value.get("data"), Some(&json!("abc")));
    }

    #[test]
    fn fetch_notices_has_no_payload() {
        let value = serde_json::to_value(ClientCommand::FetchNotices).expect("serialise");
        assert_eq!(value, json!({ "event": "fetch_notices" }));

        let parsed: ClientCommand =
            serde_json::from_value(json!({ "event": "fetch_notices" })).expect("parse");
        assert_eq!(parsed, ClientCommand::FetchNotices);
    }

    #[test]
    fn commands_round_trip_through_json() {
        let command = ClientCommand::EditNotice(record("abc"));
        let text = serde_json::to_string(&command).expect("serialise");
        let parsed: ClientCommand = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, command);
    }

    #[test]
    fn record_date_travels_as_rfc3339() {
        let value = serde_json::to_value(record("abc")).expect("serialise");
        assert_eq!(
            value.get("date").and_then(Value::as_str),
            Some("2024-09-15T00:00:00Z")
        );
    }
}
