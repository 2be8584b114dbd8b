//! 1-3-3 compliance analysis for one user's open work.
//!
//! Rules are independent and always all evaluated; the violation list keeps
//! detection order. Score is `100 - 25*critical - 10*warning - 5*info`, floored
//! at zero.

use crate::SCHEMA_VERSION;
use crate::classifier::{Classification, classify};
use crate::clock::Clock;
use crate::item::{WorkItem, open_assigned};
use crate::synthetic_time;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

pub const MAX_DEEP_WORK: usize = 1;
pub const MAX_QUICK_WINS: usize = 3;
pub const MAX_MAINTENANCE: usize = 3;
pub const MAX_ACTIVE: usize = MAX_DEEP_WORK + MAX_QUICK_WINS + MAX_MAINTENANCE;

/// Trailing window for context-switch counting.
pub const CONTEXT_SWITCH_WINDOW_HOURS: i64 = 8;
const CONTEXT_SWITCH_LIMIT: usize = 5;
const STALE_DEFERRED_DAYS: i64 = 14;
const STALE_DEFERRED_LIMIT: usize = 5;

pub const NOT_SYNCED_SCORE: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Points deducted from the compliance score.
    pub fn penalty(self) -> i32 {
        match self {
            Self::Critical => 25,
            Self::Warning => 10,
            Self::Info => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    MultipleDeepWork,
    QuickWinOverload,
    MaintenanceOverload,
    NoDeepWork,
    ExcessiveContextSwitching,
    UnclearQuickWins,
    DeferredBacklogGrowing,
    TotalOverload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationType,
    pub severity: Severity,
    pub message: String,
    /// Numbers of the items the violation points at, in bucket order.
    pub affected_items: Vec<u64>,
    pub recommendation: String,
    /// Item field a fix would touch.
    pub field: String,
}

impl Violation {
    fn new(
        kind: ViolationType,
        severity: Severity,
        message: String,
        affected: &[&WorkItem],
        recommendation: String,
        field: &str,
    ) -> Self {
        Self {
            kind,
            severity,
            message,
            affected_items: affected.iter().map(|item| item.number).collect(),
            recommendation,
            field: field.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    /// `None` only for the not-synced sentinel.
    pub user_id: Option<String>,
    pub is_compliant: bool,
    pub violations: Vec<Violation>,
    pub bucket_counts: BTreeMap<Classification, u32>,
    pub compliance_score: i32,
    #[serde(default = "crate::schema_version")]
    pub schema_version: u32,
}

impl ComplianceReport {
    /// Sentinel for a repository with no data yet.
    pub fn not_synced() -> Self {
        Self {
            user_id: None,
            is_compliant: false,
            violations: Vec::new(),
            bucket_counts: BTreeMap::new(),
            compliance_score: NOT_SYNCED_SCORE,
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn is_synced(&self) -> bool {
        self.compliance_score >= 0
    }

    pub fn bucket_count(&self, classification: Classification) -> u32 {
        self.bucket_counts
            .get(&classification)
            .copied()
            .unwrap_or_default()
    }

    pub fn has_violation(&self, kind: ViolationType) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }
}

/// Open items assigned to one user, grouped by classification in input order.
#[derive(Debug, Default)]
pub(crate) struct Buckets<'a> {
    pub deep_work: Vec<&'a WorkItem>,
    pub quick_wins: Vec<&'a WorkItem>,
    pub maintenance: Vec<&'a WorkItem>,
    pub deferred: Vec<&'a WorkItem>,
}

impl<'a> Buckets<'a> {
    pub fn collect(items: &'a [WorkItem], user: &'a str) -> Self {
        let mut buckets = Self::default();
        for item in open_assigned(items, user) {
            buckets.bucket_mut(classify(item)).push(item);
        }
        buckets
    }

    fn bucket_mut(&mut self, classification: Classification) -> &mut Vec<&'a WorkItem> {
        match classification {
            Classification::DeepWork => &mut self.deep_work,
            Classification::QuickWin => &mut self.quick_wins,
            Classification::Maintenance => &mut self.maintenance,
            Classification::Deferred => &mut self.deferred,
        }
    }

    pub fn get(&self, classification: Classification) -> &[&'a WorkItem] {
        match classification {
            Classification::DeepWork => &self.deep_work,
            Classification::QuickWin => &self.quick_wins,
            Classification::Maintenance => &self.maintenance,
            Classification::Deferred => &self.deferred,
        }
    }

    pub fn total(&self) -> usize {
        self.deep_work.len() + self.quick_wins.len() + self.maintenance.len() + self.deferred.len()
    }

    pub fn active(&self) -> usize {
        self.deep_work.len() + self.quick_wins.len() + self.maintenance.len()
    }

    pub fn all(&self) -> impl Iterator<Item = &'a WorkItem> + '_ {
        Classification::iter().flat_map(|c| self.get(c).iter().copied())
    }
}

/// Check `user`'s open items against the 1-3-3 structure.
pub fn analyze(items: &[WorkItem], user: &str, clock: &Clock) -> ComplianceReport {
    let buckets = Buckets::collect(items, user);
    let deep = &buckets.deep_work;
    let quick = &buckets.quick_wins;
    let maint = &buckets.maintenance;
    let mut violations = Vec::new();

    if deep.len() > MAX_DEEP_WORK {
        violations.push(Violation::new(
            ViolationType::MultipleDeepWork,
            Severity::Critical,
            format!(
                "You have {} deep-work items active. Max is {MAX_DEEP_WORK}.",
                deep.len()
            ),
            deep,
            "Pick ONE critical item. Move others to next sprint or delegate.".to_string(),
            "labels",
        ));
    }

    if quick.len() > MAX_QUICK_WINS {
        violations.push(Violation::new(
            ViolationType::QuickWinOverload,
            Severity::Warning,
            format!(
                "You have {} quick wins. Max is {MAX_QUICK_WINS} per day.",
                quick.len()
            ),
            &quick[MAX_QUICK_WINS..],
            format!("Defer {} quick wins to tomorrow.", quick.len() - MAX_QUICK_WINS),
            "labels",
        ));
    }

    if maint.len() > MAX_MAINTENANCE {
        violations.push(Violation::new(
            ViolationType::MaintenanceOverload,
            Severity::Warning,
            format!(
                "You have {} maintenance tasks. Max is {MAX_MAINTENANCE}.",
                maint.len()
            ),
            &maint[MAX_MAINTENANCE..],
            "Batch remaining maintenance for a dedicated maintenance day.".to_string(),
            "labels",
        ));
    }

    if deep.is_empty() && buckets.total() > 0 {
        violations.push(Violation::new(
            ViolationType::NoDeepWork,
            Severity::Info,
            "No deep-work item assigned. You may be stuck in reactive mode.".to_string(),
            &[],
            "Identify one priority:critical or architecture item to focus on.".to_string(),
            "labels",
        ));
    }

    let window = Duration::hours(CONTEXT_SWITCH_WINDOW_HOURS);
    let touched = buckets
        .all()
        .filter(|item| synthetic_time::touched_within(item, clock, window))
        .count();
    if touched > CONTEXT_SWITCH_LIMIT {
        violations.push(Violation::new(
            ViolationType::ExcessiveContextSwitching,
            Severity::Critical,
            format!("You've touched {touched} items today. High context-switch cost."),
            &[],
            "Focus on completing one item before moving to the next.".to_string(),
            "updatedAt",
        ));
    }

    let unclear: Vec<&WorkItem> = quick.iter().copied().filter(|i| !i.has_body()).collect();
    if !unclear.is_empty() {
        violations.push(Violation::new(
            ViolationType::UnclearQuickWins,
            Severity::Warning,
            format!("{} quick wins have no description.", unclear.len()),
            &unclear,
            "Add scope/acceptance criteria or reclassify as deferred.".to_string(),
            "body",
        ));
    }

    let stale_age = Duration::days(STALE_DEFERRED_DAYS);
    let stale: Vec<&WorkItem> = buckets
        .deferred
        .iter()
        .copied()
        .filter(|item| synthetic_time::created_before(item, clock, stale_age))
        .collect();
    if stale.len() > STALE_DEFERRED_LIMIT {
        violations.push(Violation::new(
            ViolationType::DeferredBacklogGrowing,
            Severity::Info,
            format!(
                "{} deferred items are >{STALE_DEFERRED_DAYS} days old.",
                stale.len()
            ),
            &stale,
            "Schedule a backlog grooming session.".to_string(),
            "createdAt",
        ));
    }

    let active = buckets.active();
    if active > MAX_ACTIVE {
        violations.push(Violation::new(
            ViolationType::TotalOverload,
            Severity::Critical,
            format!("Total active items: {active}. Max for 1-3-3 is {MAX_ACTIVE}."),
            &[],
            format!("Defer {} items to protect your focus.", active - MAX_ACTIVE),
            "assignees",
        ));
    }

    let bucket_counts = Classification::iter()
        .map(|c| (c, u32::try_from(buckets.get(c).len()).unwrap_or(u32::MAX)))
        .collect();
    let compliance_score = score(&violations);

    tracing::debug!(
        user,
        violations = violations.len(),
        compliance_score,
        "compliance analyzed"
    );

    ComplianceReport {
        user_id: Some(user.to_string()),
        is_compliant: violations.is_empty(),
        violations,
        bucket_counts,
        compliance_score,
        schema_version: SCHEMA_VERSION,
    }
}

fn score(violations: &[Violation]) -> i32 {
    let penalty: i32 = violations.iter().map(|v| v.severity.penalty()).sum();
    (100 - penalty).max(0)
}
