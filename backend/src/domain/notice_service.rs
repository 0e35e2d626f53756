//! Notice CRUD use-case.
//!
//! Stateless per request: each operation performs one repository mutation,
//! broadcasts the corresponding event to every connected channel, and (for
//! creation) fans a remote push out to registered devices. There is no
//! transaction or optimistic-lock guard; concurrent mutations of the same
//! identifier race in either order without error.

use std::sync::Arc;

use notice_sync::{NoticeDraftRecord, NoticeEvent, NoticeRecord};
use tracing::warn;

use crate::domain::error::DomainError;
use crate::domain::notice::{Notice, NoticeDraft, NoticeId, NoticeUpdate, NoticeValidationError};
use crate::domain::ports::{
    EventPublisher, NoticeRepository, NoticeStoreError, PushGateway, PushMessage,
    PushTokenRegistry,
};

const NOT_FOUND_MESSAGE: &str = "Notice not found.";

/// Driving service behind both the REST surface and the realtime channel.
pub struct NoticeService {
    repository: Arc<dyn NoticeRepository>,
    events: Arc<dyn EventPublisher>,
    push_tokens: Arc<dyn PushTokenRegistry>,
    push: Arc<dyn PushGateway>,
}

impl NoticeService {
    /// Wire the service from its ports.
    pub fn new(
        repository: Arc<dyn NoticeRepository>,
        events: Arc<dyn EventPublisher>,
        push_tokens: Arc<dyn PushTokenRegistry>,
        push: Arc<dyn PushGateway>,
    ) -> Self {
        Self {
            repository,
            events,
            push_tokens,
            push,
        }
    }

    /// All notices as wire records, insertion order.
    pub async fn list(&self) -> Result<Vec<NoticeRecord>, DomainError> {
        let notices = self.repository.list().await.map_err(map_store_error)?;
        Ok(notices.iter().map(Notice::to_record).collect())
    }

    /// Create a notice from a draft, broadcast `notice_added`, and fan out a
    /// remote push to every registered device.
    pub async fn create(&self, draft: NoticeDraftRecord) -> Result<NoticeRecord, DomainError> {
        let draft = NoticeDraft::from_record(draft).map_err(map_validation_error)?;
        let notice = draft.into_notice(NoticeId::random());
        self.repository
            .insert(&notice)
            .await
            .map_err(map_store_error)?;

        let record = notice.to_record();
        self.events.publish(NoticeEvent::NoticeAdded(record.clone()));
        self.fan_out_push(&record).await;
        Ok(record)
    }

    /// Merge a partial or full update over the stored document and replace
    /// it; broadcasts `notice_updated`.
    ///
    /// The find-then-replace pair is unguarded: a delete racing this update
    /// wins in either order without error.
    pub async fn replace(&self, id: &str, update: NoticeUpdate) -> Result<NoticeRecord, DomainError> {
        let id = parse_id(id)?;
        let existing = self
            .repository
            .find(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| DomainError::not_found(NOT_FOUND_MESSAGE))?;

        let draft =
            NoticeDraft::from_record(update.apply_to(&existing)).map_err(map_validation_error)?;
        let notice = draft.into_notice(id);
        let replaced = self
            .repository
            .replace(&notice)
            .await
            .map_err(map_store_error)?;
        if !replaced {
            return Err(DomainError::not_found(NOT_FOUND_MESSAGE));
        }

        let record = notice.to_record();
        self.events
            .publish(NoticeEvent::NoticeUpdated(record.clone()));
        Ok(record)
    }

    /// Delete by identifier; broadcasts `notice_deleted` with the id only.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let parsed = parse_id(id)?;
        let removed = self
            .repository
            .remove(parsed)
            .await
            .map_err(map_store_error)?;
        if !removed {
            return Err(DomainError::not_found(NOT_FOUND_MESSAGE));
        }

        self.events
            .publish(NoticeEvent::NoticeDeleted(parsed.to_string()));
        Ok(())
    }

    async fn fan_out_push(&self, record: &NoticeRecord) {
        let tokens = match self.push_tokens.all().await {
            Ok(tokens) => tokens,
            Err(error) => {
                warn!(error = %error, "push token registry unavailable; skipping fan-out");
                return;
            }
        };

        for token in tokens {
            let message = PushMessage {
                to: token,
                title: record.title.clone(),
                body: record.notice.clone(),
                notice_id: record.id.clone(),
            };
            // No retry policy anywhere in this flow; a failed delivery is
            // terminal for that device.
            if let Err(error) = self.push.deliver(&message).await {
                warn!(error = %error, notice_id = %record.id, "push delivery failed");
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<NoticeId, DomainError> {
    // An identifier that cannot exist in the collection is indistinguishable
    // from an absent one at the API surface.
    NoticeId::parse(raw).map_err(|_| DomainError::not_found(NOT_FOUND_MESSAGE))
}

fn map_validation_error(error: NoticeValidationError) -> DomainError {
    DomainError::invalid_request(error.to_string())
}

fn map_store_error(error: NoticeStoreError) -> DomainError {
    DomainError::internal(error.to_string())
}
