//! Deterministic sample notice generation for demonstration purposes.
//!
//! Given the same seed, generation always produces the same notices, so
//! seeded environments are reproducible across restarts and machines. The
//! crate is independent of backend domain types to avoid circular
//! dependencies: it emits plain field bundles the backend validates on its
//! side of the boundary.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Headlines sampled for generated notices.
const TITLES: &[&str] = &[
    "Orientation Day",
    "Exam Schedule",
    "Guest Lecture",
    "Sports Day",
    "Science Fair",
    "Parent-Teacher Meeting",
    "Library Week",
    "Annual Concert",
];

/// Display times sampled for generated notices.
const TIMES: &[&str] = &["9:00 AM", "10:00 AM", "11:30 AM", "2:00 PM", "4:30 PM"];

/// Window of event dates: autumn term, starting 1 September 2024.
const TERM_DAYS: i64 = 90;

/// One generated notice, ready for validation by the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleNotice {
    pub title: String,
    pub notice: String,
    pub date: DateTime<Utc>,
    pub time: String,
}

/// Generate `count` sample notices from the given seed.
///
/// Output is fully determined by `(seed, count)`; a longer run starts with
/// the same notices a shorter run produced.
#[must_use]
pub fn sample_notices(seed: u64, count: usize) -> Vec<SampleNotice> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let term_start = Utc
        .with_ymd_and_hms(2024, 9, 1, 0, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("term start must be a valid timestamp"));

    (0..count)
        .map(|index| {
            let title = TITLES[rng.random_range(0..TITLES.len())];
            let body: String = Sentence(4..10).fake_with_rng(&mut rng);
            let date = term_start + Duration::days(rng.random_range(0..TERM_DAYS));
            let time = TIMES[rng.random_range(0..TIMES.len())];
            SampleNotice {
                // Suffix keeps titles distinct when the pool repeats.
                title: format!("{title} #{n}", n = index + 1),
                notice: body,
                date,
                time: time.to_owned(),
            }
        })
        .collect()
}
