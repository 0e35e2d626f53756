//! The client notice board.
//!
//! An owned, exclusively mutated list of notice records behind a single
//! update entry point. Channel handlers run sequentially, so one `apply` per
//! event is the whole concurrency story on the client.
//!
//! ## Invariants
//! - No two records share an identifier. `NoticeAdded` is applied as an
//!   idempotent upsert, so the invariant survives duplicated or re-delivered
//!   insert events.
//! - `Notices` replaces the list with the payload verbatim, regardless of
//!   prior state.
//! - `NoticeUpdated` and `NoticeDeleted` for an absent identifier are silent
//!   no-ops.

use crate::event::NoticeEvent;
use crate::record::NoticeRecord;

/// Authoritative local view of the notice collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeBoard {
    notices: Vec<NoticeRecord>,
}

impl NoticeBoard {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current records in display order.
    #[must_use]
    pub fn notices(&self) -> &[NoticeRecord] {
        &self.notices
    }

    /// Number of records on the board.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notices.len()
    }

    /// Whether the board holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Look up a record by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&NoticeRecord> {
        self.notices.iter().find(|notice| notice.id == id)
    }

    /// Apply one event to the board.
    pub fn apply(&mut self, event: NoticeEvent) {
        match event {
            NoticeEvent::Notices(all) => self.notices = all,
            NoticeEvent::NoticeAdded(record) => self.upsert(record),
            NoticeEvent::NoticeUpdated(record) => {
                if let Some(existing) = self.find_mut(&record.id) {
                    *existing = record;
                }
            }
            NoticeEvent::NoticeDeleted(id) => self.notices.retain(|notice| notice.id != id),
        }
    }

    fn upsert(&mut self, record: NoticeRecord) {
        match self.find_mut(&record.id) {
            Some(existing) => *existing = record,
            None => self.notices.push(record),
        }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut NoticeRecord> {
        self.notices.iter_mut().find(|notice| notice.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn record(id: &str, title: &str) -> NoticeRecord {
        NoticeRecord {
            id: id.to_owned(),
            title: title.to_owned(),
            notice: format!("{title} details"),
            date: Utc.with_ymd_and_hms(2024, 9, 20, 0, 0, 0).single().expect("valid date"),
            time: "9:00 AM".to_owned(),
            user: "u1".to_owned(),
        }
    }

    fn ids(board: &NoticeBoard) -> Vec<&str> {
        board.notices().iter().map(|n| n.id.as_str()).collect()
    }

    #[test]
    fn replace_yields_exactly_the_payload() {
        let mut board = NoticeBoard::new();
        board.apply(NoticeEvent::NoticeAdded(record("stale", "Old")));

        let payload = vec![record("a", "Exam"), record("b", "Trip")];
        board.apply(NoticeEvent::Notices(payload.clone()));
        assert_eq!(board.notices(), payload.as_slice());
    }

    #[test]
    fn insert_appends_new_records_in_arrival_order() {
        let mut board = NoticeBoard::new();
        board.apply(NoticeEvent::NoticeAdded(record("a", "Exam")));
        board.apply(NoticeEvent::NoticeAdded(record("b", "Trip")));
        assert_eq!(ids(&board), vec!["a", "b"]);
    }

    #[test]
    fn duplicate_insert_upserts_instead_of_duplicating() {
        let mut board = NoticeBoard::new();
        board.apply(NoticeEvent::NoticeAdded(record("a", "Exam")));
        board.apply(NoticeEvent::NoticeAdded(record("a", "Exam (moved)")));

        assert_eq!(board.len(), 1);
        assert_eq!(board.get("a").map(|n| n.title.as_str()), Some("Exam (moved)"));
    }

    #[test]
    fn update_replaces_matching_record_in_place() {
        let mut board = NoticeBoard::new();
        board.apply(NoticeEvent::NoticeAdded(record("a", "Exam")));
        board.apply(NoticeEvent::NoticeAdded(record("b", "Trip")));

        board.apply(NoticeEvent::NoticeUpdated(record("a", "Exam (hall 3)")));
        assert_eq!(ids(&board), vec!["a", "b"]);
        assert_eq!(board.get("a").map(|n| n.title.as_str()), Some("Exam (hall 3)"));
    }

    #[rstest]
    #[case::update(NoticeEvent::NoticeUpdated(record("ghost", "Ghost")))]
    #[case::delete(NoticeEvent::NoticeDeleted("ghost".to_owned()))]
    fn absent_identifier_is_a_silent_no_op(#[case] event: NoticeEvent) {
        let mut board = NoticeBoard::new();
        board.apply(NoticeEvent::NoticeAdded(record("a", "Exam")));
        let before = board.clone();

        board.apply(event);
        assert_eq!(board, before);
    }

    #[test]
    fn delete_removes_matching_record() {
        let mut board = NoticeBoard::new();
        board.apply(NoticeEvent::NoticeAdded(record("a", "Exam")));
        board.apply(NoticeEvent::NoticeAdded(record("b", "Trip")));

        board.apply(NoticeEvent::NoticeDeleted("a".to_owned()));
        assert_eq!(ids(&board), vec!["b"]);
    }

    // Out-of-order delivery: an update racing ahead of its insert is dropped,
    // and the board stays consistent once the insert lands.
    #[test]
    fn update_before_insert_never_fabricates_records() {
        let mut board = NoticeBoard::new();
        board.apply(NoticeEvent::NoticeUpdated(record("a", "Early update")));
        assert!(board.is_empty());

        board.apply(NoticeEvent::NoticeAdded(record("a", "Exam")));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn identifiers_stay_unique_across_event_sequences() {
        let mut board = NoticeBoard::new();
        let events = vec![
            NoticeEvent::NoticeAdded(record("a", "Exam")),
            NoticeEvent::NoticeAdded(record("b", "Trip")),
            NoticeEvent::NoticeAdded(record("a", "Exam again")),
            NoticeEvent::NoticeUpdated(record("b", "Trip (new bus)")),
            NoticeEvent::Notices(vec![record("c", "Sports Day"), record("a", "Exam")]),
            NoticeEvent::NoticeAdded(record("c", "Sports Day (moved)")),
            NoticeEvent::NoticeDeleted("missing".to_owned()),
        ];
        for event in events {
            board.apply(event);
            let mut seen = board
                .notices()
                .iter()
                .map(|n| n.id.as_str())
                .collect::<Vec<_>>();
            seen.sort_unstable();
            let len = seen.len();
            seen.dedup();
            assert_eq!(seen.len(), len, "duplicate identifier on the board");
        }
    }
}
