//! Label vocabulary shared by the classifier, scorers, and actions.
//!
//! All comparisons against these names are case-insensitive.

use crate::item::WorkItem;

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

pub const PRIORITY_CRITICAL: &str = "priority:critical";
pub const PRIORITY_HIGH: &str = "priority:high";
pub const URGENT: &str = "urgent";

/// Labels that make an item count as urgent-and-unowned when nobody is assigned.
pub const URGENT_LABELS: &[&str] = &[URGENT, PRIORITY_CRITICAL];

/// Sort weight for planner and day-plan ordering: lower sorts first.
pub fn priority_weight(item: &WorkItem) -> u8 {
    if item.has_label(PRIORITY_CRITICAL) {
        0
    } else if item.has_label(PRIORITY_HIGH) || item.has_label(URGENT) {
        1
    } else {
        2
    }
}

// ---------------------------------------------------------------------------
// Classification signals
// ---------------------------------------------------------------------------

pub const ARCHITECTURE: &str = "architecture";
pub const DEEP_WORK: &str = "deep-work";
pub const ENHANCEMENT: &str = "enhancement";
pub const BUG: &str = "bug";

pub const DEEP_WORK_LABELS: &[&str] = &[
    PRIORITY_CRITICAL,
    PRIORITY_HIGH,
    ARCHITECTURE,
    "security",
    DEEP_WORK,
];

/// Label prefixes that mark large, multi-day items.
pub const DEEP_WORK_PREFIXES: &[&str] = &["epic", "feature"];

pub const QUICK_WIN_LABELS: &[&str] = &["good-first-issue", "quick-win", "low-hanging-fruit", "trivial"];

pub const MAINTENANCE_LABELS: &[&str] = &[
    "dependencies",
    "documentation",
    "triage",
    "chore",
    "refactor",
    "tech-debt",
    "ci",
    "devops",
    "maintenance",
];

/// Body markers that indicate a well-scoped item.
pub const SCOPE_MARKERS: &[&str] = &[
    "- [ ]",
    "acceptance criteria",
    "done when",
    "steps:",
    "expected:",
];

// ---------------------------------------------------------------------------
// Labels written or checked by reshape actions
// ---------------------------------------------------------------------------

pub const DEFERRED: &str = "deferred";
pub const NEXT_SPRINT: &str = "next-sprint";
pub const DELEGATED: &str = "delegated";
pub const NEEDS_OWNER: &str = "needs-owner";
pub const QUICK_WIN: &str = "quick-win";
pub const SIZE_S: &str = "size:S";
pub const MAINTENANCE: &str = "maintenance";
pub const STRUCTURE_133: &str = "1-3-3";
pub const FOCUS: &str = "focus";
pub const NEEDS_SCOPE: &str = "needs-scope";
pub const BLOCKED: &str = "blocked";
pub const SCOPE_DEFINED: &str = "scope-defined";

/// Labels that mark routine upkeep an item can be reclassified into.
pub const ROUTINE_UPKEEP_LABELS: &[&str] = &["documentation", "tech-debt", "cleanup", "routine"];

/// Labels that already carry a size or scope decision.
pub const SCOPED_LABELS: &[&str] = &["size:S", "size:M", "size:L", SCOPE_DEFINED, NEEDS_SCOPE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_weight_orders_critical_first() {
        let critical = WorkItem::new(1, "a").with_labels(["Priority:Critical"]);
        let urgent = WorkItem::new(2, "b").with_labels(["urgent"]);
        let high = WorkItem::new(3, "c").with_labels(["priority:high"]);
        let plain = WorkItem::new(4, "d").with_labels(["bug"]);

        assert_eq!(priority_weight(&critical), 0);
        assert_eq!(priority_weight(&urgent), 1);
        assert_eq!(priority_weight(&high), 1);
        assert_eq!(priority_weight(&plain), 2);
    }
}
