//! Time-bucketed item checks with synthetic-time overrides.
//!
//! Demo and test data can pin a signal with a `demo:` label instead of crafting
//! timestamps. When an item carries the specific override label the check is
//! true. When it carries any other `demo:` label, real timestamps are ignored and
//! the check is false. Items without `demo:` labels are judged by their real
//! timestamps against the [`Clock`].
//!
//! Every scorer that buckets items by time goes through this module.

use crate::clock::Clock;
use crate::item::WorkItem;
use chrono::{Duration, Weekday};

pub const DEMO_PREFIX: &str = "demo:";
pub const TOUCHED_TODAY: &str = "demo:touched-today";
pub const AFTER_HOURS: &str = "demo:after-hours";
pub const STALE_14D: &str = "demo:stale-14d";
pub const FRIDAY: &str = "demo:friday";

/// Local working hours: [start, end).
pub const WORKDAY_START_HOUR: u32 = 8;
pub const WORKDAY_END_HOUR: u32 = 18;

pub fn has_demo_label(item: &WorkItem) -> bool {
    item.label_names().any(is_demo_label)
}

fn is_demo_label(name: &str) -> bool {
    name.get(..DEMO_PREFIX.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DEMO_PREFIX))
}

/// `Some(forced)` when demo labels decide the check, `None` to fall through to
/// real timestamps.
fn resolve_override(item: &WorkItem, label: &str) -> Option<bool> {
    if item.has_label(label) {
        Some(true)
    } else if has_demo_label(item) {
        Some(false)
    } else {
        None
    }
}

/// Age forced by a `demo:stale-<N>d` label, if present.
fn forced_staleness(item: &WorkItem) -> Option<Duration> {
    item.label_names().find_map(|name| {
        let lower = name.to_ascii_lowercase();
        lower
            .strip_prefix("demo:stale-")?
            .strip_suffix('d')?
            .parse::<i64>()
            .ok()
            .map(Duration::days)
    })
}

/// Staleness checks: a `demo:stale-<N>d` label satisfies any threshold up to N
/// days; other demo labels fail; otherwise `real` decides.
fn resolve_staleness(item: &WorkItem, threshold: Duration, real: impl FnOnce() -> bool) -> bool {
    match forced_staleness(item) {
        Some(forced) => forced >= threshold,
        None if has_demo_label(item) => false,
        None => real(),
    }
}

/// Updated within the trailing `window` ending at `clock.now()`.
pub fn touched_within(item: &WorkItem, clock: &Clock, window: Duration) -> bool {
    resolve_override(item, TOUCHED_TODAY).unwrap_or_else(|| {
        let cutoff = clock.now() - window;
        item.updated_at.is_some_and(|at| at > cutoff)
    })
}

/// Last update fell outside local working hours or on a weekend.
pub fn updated_after_hours(item: &WorkItem, clock: &Clock) -> bool {
    resolve_override(item, AFTER_HOURS).unwrap_or_else(|| {
        item.updated_at.is_some_and(|at| {
            let hour = clock.local_hour_of(at);
            let weekday = clock.local_weekday_of(at);
            hour < WORKDAY_START_HOUR
                || hour >= WORKDAY_END_HOUR
                || matches!(weekday, Weekday::Sat | Weekday::Sun)
        })
    })
}

/// Created more than `age` before now. Missing creation time is never old.
pub fn created_before(item: &WorkItem, clock: &Clock, age: Duration) -> bool {
    resolve_staleness(item, age, || {
        let cutoff = clock.now() - age;
        item.created_at.is_some_and(|at| at < cutoff)
    })
}

/// Not updated for more than `days`. Missing update time counts as idle.
pub fn idle_for_days(item: &WorkItem, clock: &Clock, days: i64) -> bool {
    let threshold = Duration::days(days);
    resolve_staleness(item, threshold, || {
        let cutoff = clock.now() - threshold;
        item.updated_at.is_none_or(|at| at < cutoff)
    })
}

/// Friday-ish: forced by config, requested by a `demo:friday` label, or a real
/// local Thursday or Friday.
pub fn is_friday_scenario(items: &[WorkItem], clock: &Clock, forced: bool) -> bool {
    forced
        || items.iter().any(|item| item.has_label(FRIDAY))
        || matches!(clock.local_weekday(), Weekday::Thu | Weekday::Fri)
}
