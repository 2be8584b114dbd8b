//! Workload classification: assigns each work item to one of four buckets.
//!
//! Precedence is fixed, first match wins:
//! - **Deep work**: priority/architecture/security/deep-work label, estimate above
//!   2h, or an `epic*` / `feature*` label
//! - **Quick win**: non-blank body and a quick-win label, a sub-30-minute estimate
//!   with scope markers in the body, or a short enhancement
//! - **Maintenance**: any chore/docs/dependency/tech-debt/ci label
//! - **Deferred**: everything else

use crate::item::WorkItem;
use crate::labels;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumIter};

/// Workload bucket for a single item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    DeepWork,
    QuickWin,
    Maintenance,
    Deferred,
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Effort estimate used when nothing on the item says otherwise.
pub const DEFAULT_ESTIMATE_HOURS: f64 = 2.0;

/// Enhancements with bodies shorter than this are treated as quick wins.
const SHORT_ENHANCEMENT_BODY: usize = 500;

/// Classify a single item. Pure; never cached on the item.
pub fn classify(item: &WorkItem) -> Classification {
    if is_deep_work(item) {
        Classification::DeepWork
    } else if is_quick_win(item) {
        Classification::QuickWin
    } else if is_maintenance(item) {
        Classification::Maintenance
    } else {
        Classification::Deferred
    }
}

fn is_deep_work(item: &WorkItem) -> bool {
    item.has_any_label(labels::DEEP_WORK_LABELS)
        || estimate_hours(item) > 2.0
        || item.label_names().any(has_deep_work_prefix)
}

fn has_deep_work_prefix(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    labels::DEEP_WORK_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

fn is_quick_win(item: &WorkItem) -> bool {
    let Some(body) = item.body_text() else {
        return false;
    };

    item.has_any_label(labels::QUICK_WIN_LABELS)
        || (estimate_hours(item) < 0.5 && has_clear_scope(body))
        || (item.has_label(labels::ENHANCEMENT)
            && raw_body_len(item) < SHORT_ENHANCEMENT_BODY)
}

fn is_maintenance(item: &WorkItem) -> bool {
    item.has_any_label(labels::MAINTENANCE_LABELS)
}

fn has_clear_scope(body: &str) -> bool {
    let lower = body.to_lowercase();
    labels::SCOPE_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}

fn raw_body_len(item: &WorkItem) -> usize {
    item.body.as_deref().map_or(0, |b| b.chars().count())
}

/// Estimated effort in hours.
///
/// Labels are scanned in order and the first estimate or size label wins. An
/// unparseable `estimate:` label yields the default. Without labels the body
/// length decides: under 100 chars is half an hour, under 500 is two hours,
/// anything longer is four.
pub fn estimate_hours(item: &WorkItem) -> f64 {
    for name in item.label_names() {
        let lower = name.to_ascii_lowercase();
        if let Some(raw) = lower.strip_prefix("estimate:") {
            return parse_estimate(raw);
        }
        match lower.as_str() {
            "size:s" | "small" => return 0.5,
            "size:m" | "medium" => return 2.0,
            "size:l" | "large" => return 4.0,
            "size:xl" => return 8.0,
            _ => {}
        }
    }

    match item.body.as_deref() {
        Some(body) => match body.chars().count() {
            0..100 => 0.5,
            100..500 => 2.0,
            _ => 4.0,
        },
        None => DEFAULT_ESTIMATE_HOURS,
    }
}

fn parse_estimate(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let number = trimmed
        .strip_suffix("hr")
        .or_else(|| trimmed.strip_suffix('h'))
        .unwrap_or(trimmed);
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|hours| hours.is_finite())
        .unwrap_or(DEFAULT_ESTIMATE_HOURS)
}
