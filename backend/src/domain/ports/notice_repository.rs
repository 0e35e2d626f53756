//! Port abstraction for notice persistence adapters.

use async_trait::async_trait;

use crate::domain::notice::{Notice, NoticeId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by notice repository adapters.
    pub enum NoticeStoreError {
        /// Repository connection could not be established.
        Connection { message: String } => "notice repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "notice repository query failed: {message}",
    }
}

/// Driven port for the notice collection.
///
/// `replace` and `remove` report whether a matching record existed so the
/// service can surface the 404 contract; there is no transactional guard, so
/// concurrent mutations of the same identifier race in either order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    /// All notices in insertion order.
    async fn list(&self) -> Result<Vec<Notice>, NoticeStoreError>;

    /// Look a notice up by identifier.
    async fn find(&self, id: NoticeId) -> Result<Option<Notice>, NoticeStoreError>;

    /// Insert a freshly created notice.
    async fn insert(&self, notice: &Notice) -> Result<(), NoticeStoreError>;

    /// Full-document replace; `false` when the identifier is absent.
    async fn replace(&self, notice: &Notice) -> Result<bool, NoticeStoreError>;

    /// Delete by identifier; `false` when the identifier is absent.
    async fn remove(&self, id: NoticeId) -> Result<bool, NoticeStoreError>;
}
