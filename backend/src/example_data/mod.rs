//! Startup seeding of sample notices.
//!
//! Enabled by the `example-data` feature and a `SEED_NOTICES` seed value.
//! Seeding writes through the repository port directly — no broadcast, no
//! push fan-out — and is skipped when the collection already holds notices,
//! so restarting a seeded instance does not duplicate records.

use std::sync::Arc;

use example_data::sample_notices;
use notice_sync::NoticeDraftRecord;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{NoticeRepository, NoticeStoreError};
use crate::domain::{NoticeDraft, NoticeId, NoticeValidationError};

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// Repository access failed.
    #[error("seeding repository error: {0}")]
    Store(#[from] NoticeStoreError),
    /// A generated notice failed domain validation.
    #[error("generated notice failed validation: {0}")]
    Validation(#[from] NoticeValidationError),
}

/// Author reference attached to seeded notices.
const SEED_AUTHOR: &str = "seed";

/// Seed `count` deterministic notices unless the collection is non-empty.
///
/// Returns how many notices were written.
pub async fn seed_notices_on_startup(
    repository: &Arc<dyn NoticeRepository>,
    seed: u64,
    count: usize,
) -> Result<usize, SeedingError> {
    if !repository.list().await?.is_empty() {
        info!(seed, "collection already populated; skipping sample notices");
        return Ok(0);
    }

    let mut written = 0;
    for sample in sample_notices(seed, count) {
        let draft = NoticeDraft::from_record(NoticeDraftRecord {
            title: sample.title,
            notice: sample.notice,
            date: sample.date,
            time: sample.time,
            user: SEED_AUTHOR.to_owned(),
        })?;
        repository.insert(&draft.into_notice(NoticeId::random())).await?;
        written += 1;
    }
    info!(seed, written, "seeded sample notices");
    Ok(written)
}
