//! Chaos score: an auditable 0-10 instability indicator for a repository.
//!
//! ```text
//! +2 if mysteryMeatCount   >= 3   (blank body or nobody assigned)
//! +2 if unresolvedUrgent   >= 3   (urgent label, created more than 24h ago)
//! +2 if touchedRecently    >= 6   (updated in the last 60 minutes)
//! +2 if afterHoursSignal          (any update outside 08:00-18:00 local or on a weekend)
//! +2 if distinctLabelCount >= 12
//!
//! score = min(10, sum)            -1 when the repository was never synced
//! ```
//!
//! Binary thresholds keep the score stable under small input changes.

use crate::SCHEMA_VERSION;
use crate::clock::Clock;
use crate::item::WorkItem;
use crate::labels;
use crate::synthetic_time;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const NOT_SYNCED_SCORE: f64 = -1.0;
pub const MAX_SCORE: f64 = 10.0;

const SIGNAL_POINTS: f64 = 2.0;
const MYSTERY_MEAT_THRESHOLD: u32 = 3;
const UNRESOLVED_URGENT_THRESHOLD: u32 = 3;
const TOUCHED_RECENTLY_THRESHOLD: u32 = 6;
const DISTINCT_LABEL_THRESHOLD: u32 = 12;

/// Window for "touched recently".
pub const RECENT_WINDOW_MINUTES: i64 = 60;
/// Urgent items older than this count as unresolved.
pub const URGENT_STALE_HOURS: i64 = 24;

/// Chaos signals measured over one item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaosMetrics {
    pub items_touched_recently: u32,
    pub unresolved_urgent: u32,
    pub distinct_label_count: u32,
    pub after_hours_signal: bool,
    pub mystery_meat_count: u32,
    pub score: f64,
    #[serde(default = "crate::schema_version")]
    pub schema_version: u32,
}

impl ChaosMetrics {
    /// Sentinel for a repository with no data yet.
    pub fn not_synced() -> Self {
        Self {
            items_touched_recently: 0,
            unresolved_urgent: 0,
            distinct_label_count: 0,
            after_hours_signal: false,
            mystery_meat_count: 0,
            score: NOT_SYNCED_SCORE,
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn is_not_synced(&self) -> bool {
        self.score < 0.0
    }

    /// Score rounded to the integer shown on dashboards; `-1` when not synced.
    pub fn rounded_score(&self) -> i32 {
        self.score.round() as i32
    }
}

/// Measure chaos signals over all items (open or closed, any assignee).
pub fn calculate(items: &[WorkItem], clock: &Clock) -> ChaosMetrics {
    let recent = Duration::minutes(RECENT_WINDOW_MINUTES);
    let urgent_age = Duration::hours(URGENT_STALE_HOURS);

    let items_touched_recently = count(items, |i| synthetic_time::touched_within(i, clock, recent));
    let unresolved_urgent = count(items, |i| {
        i.has_label(labels::URGENT) && synthetic_time::created_before(i, clock, urgent_age)
    });
    let distinct_label_count = items
        .iter()
        .flat_map(WorkItem::label_names)
        .collect::<BTreeSet<_>>()
        .len();
    let distinct_label_count = saturating_u32(distinct_label_count);
    let after_hours_signal = items
        .iter()
        .any(|i| synthetic_time::updated_after_hours(i, clock));
    let mystery_meat_count = count(items, WorkItem::is_mystery_meat);

    let signals = [
        mystery_meat_count >= MYSTERY_MEAT_THRESHOLD,
        unresolved_urgent >= UNRESOLVED_URGENT_THRESHOLD,
        items_touched_recently >= TOUCHED_RECENTLY_THRESHOLD,
        after_hours_signal,
        distinct_label_count >= DISTINCT_LABEL_THRESHOLD,
    ];
    let fired = saturating_u32(signals.iter().filter(|fired| **fired).count());
    let score = (f64::from(fired) * SIGNAL_POINTS).min(MAX_SCORE);

    tracing::debug!(
        items = items.len(),
        items_touched_recently,
        unresolved_urgent,
        distinct_label_count,
        after_hours_signal,
        mystery_meat_count,
        score,
        "chaos signals"
    );

    ChaosMetrics {
        items_touched_recently,
        unresolved_urgent,
        distinct_label_count,
        after_hours_signal,
        mystery_meat_count,
        score,
        schema_version: SCHEMA_VERSION,
    }
}

fn count(items: &[WorkItem], pred: impl Fn(&WorkItem) -> bool) -> u32 {
    saturating_u32(items.iter().filter(|item| pred(item)).count())
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
