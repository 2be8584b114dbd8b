//! Discrete world state the planner reasons over.
//!
//! Every counter is clamped to a small ceiling (`min(measured, cap)`, never a
//! floor) so the search space stays bounded. States are plain `Copy` values:
//! each `with_*` returns a new state with one field changed.
//!
//! Stress score (0-100):
//!
//! ```text
//! stress = min(20, max(0, totalAssigned - 7) * 4)
//!        + (deepWork > 1 ? (deepWork - 1) * 10 : 0)
//!        + (deepWork == 0 && totalAssigned > 0 ? 5 : 0)
//!        + chaosBucket * 10
//!        + min(15, max(0, touchedToday - 5) * 3)
//!        + min(10, mysteryMeat * 2)
//!        + min(5, unclearQuickWins)
//!        + min(15, consecutiveHighChaosDays * 5)
//!        + min(10, updatedAfterHours * 5)
//! capped at 100
//! ```

use crate::chaos::ChaosMetrics;
use crate::classifier::Classification;
use crate::clock::Clock;
use crate::compliance::{Buckets, ComplianceReport, MAX_DEEP_WORK, MAX_MAINTENANCE, MAX_QUICK_WINS};
use crate::item::WorkItem;
use crate::labels;
use crate::synthetic_time;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Field ceilings.
pub mod caps {
    pub const BUCKET: u32 = 5;
    pub const DEFERRED: u32 = 10;
    pub const DELEGATED: u32 = 10;
    pub const URGENT_UNASSIGNED: u32 = 10;
    pub const CONTRADICTORY: u32 = 5;
    pub const TOUCHED_TODAY: u32 = 10;
    pub const AFTER_HOURS: u32 = 5;
    pub const STALE: u32 = 10;
    pub const MYSTERY_MEAT: u32 = 10;
    pub const UNCLEAR_QUICK_WINS: u32 = 5;
    pub const TOTAL_ASSIGNED: u32 = 15;
    pub const HIGH_CHAOS_DAYS: u32 = 10;
}

/// "Touched today" means updated within this trailing window.
pub const TOUCHED_TODAY_WINDOW_HOURS: i64 = 8;
/// Items idle longer than this count as stale.
pub const STALE_DAYS: i64 = 14;

/// Coarse chaos level derived from the 0-10 chaos score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChaosBucket {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl ChaosBucket {
    /// `<=2` low, `<=5` medium, `<=8` high, else critical. The not-synced
    /// sentinel maps to low.
    pub fn from_score(score: f64) -> Self {
        if score <= 2.0 {
            Self::Low
        } else if score <= 5.0 {
            Self::Medium
        } else if score <= 8.0 {
            Self::High
        } else {
            Self::Critical
        }
    }

    pub fn ordinal(self) -> u32 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Critical => 3,
        }
    }

    /// One level calmer; `Low` stays `Low`.
    pub fn step_down(self) -> Self {
        match self {
            Self::Critical => Self::High,
            Self::High => Self::Medium,
            Self::Medium | Self::Low => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl StressLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            70.. => Self::Critical,
            50.. => Self::High,
            30.. => Self::Moderate,
            _ => Self::Low,
        }
    }
}

/// Per-component view of the stress score for dashboards.
///
/// Components mirror the stress formula, except that workload is capped at 40
/// and unclear quick wins have no entry, so they need not sum to the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressBreakdown {
    pub workload: u32,
    pub chaos: u32,
    pub context_switching: u32,
    pub clarity: u32,
    pub sustained: u32,
    pub after_hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorldState {
    pub deep_work_count: u32,
    pub quick_win_count: u32,
    pub maintenance_count: u32,
    pub deferred_count: u32,
    pub delegated_count: u32,
    pub urgent_unassigned: u32,
    pub contradictory_labels: u32,
    pub issues_touched_today: u32,
    pub issues_updated_after_hours: u32,
    pub stale_issue_count: u32,
    pub mystery_meat_count: u32,
    pub unclear_quick_wins: u32,
    pub total_assigned: u32,
    pub chaos_bucket: ChaosBucket,
    /// Multiple of 5 in `0..=100`, or `-1` when the repository was never synced.
    pub compliance_score: i32,
    pub is_compliant: bool,
    pub calendar_blocked: bool,
    pub consecutive_high_chaos_days: u32,
}

fn capped(measured: usize, cap: u32) -> u32 {
    u32::try_from(measured).map_or(cap, |n| n.min(cap))
}

fn count_where<'a>(
    items: impl IntoIterator<Item = &'a WorkItem>,
    pred: impl Fn(&WorkItem) -> bool,
) -> usize {
    items.into_iter().filter(|item| pred(item)).count()
}

fn round_to_five(score: i32) -> i32 {
    if score < 0 {
        score
    } else {
        ((score + 2) / 5) * 5
    }
}

impl WorldState {
    /// Build the planning state for `user` from one snapshot's items and the
    /// already-computed chaos and compliance results.
    ///
    /// Bucket counts, touched-today, after-hours, unclear quick wins and total
    /// cover the user's open items. Urgent-unassigned, contradictory, stale and
    /// mystery-meat counts cover every item in the snapshot.
    pub fn from(
        items: &[WorkItem],
        user: &str,
        chaos: &ChaosMetrics,
        compliance: &ComplianceReport,
        clock: &Clock,
    ) -> Self {
        let buckets = Buckets::collect(items, user);
        let touched_window = Duration::hours(TOUCHED_TODAY_WINDOW_HOURS);

        Self {
            deep_work_count: capped(buckets.get(Classification::DeepWork).len(), caps::BUCKET),
            quick_win_count: capped(buckets.get(Classification::QuickWin).len(), caps::BUCKET),
            maintenance_count: capped(
                buckets.get(Classification::Maintenance).len(),
                caps::BUCKET,
            ),
            deferred_count: capped(buckets.get(Classification::Deferred).len(), caps::DEFERRED),
            delegated_count: 0,
            urgent_unassigned: capped(
                count_where(items, |i| {
                    i.has_any_label(labels::URGENT_LABELS) && !i.has_assignees()
                }),
                caps::URGENT_UNASSIGNED,
            ),
            contradictory_labels: capped(
                count_where(items, |i| {
                    i.has_label(labels::BUG) && i.has_label(labels::ENHANCEMENT)
                }),
                caps::CONTRADICTORY,
            ),
            issues_touched_today: capped(
                count_where(buckets.all(), |i| {
                    synthetic_time::touched_within(i, clock, touched_window)
                }),
                caps::TOUCHED_TODAY,
            ),
            issues_updated_after_hours: capped(
                count_where(buckets.all(), |i| synthetic_time::updated_after_hours(i, clock)),
                caps::AFTER_HOURS,
            ),
            stale_issue_count: capped(
                count_where(items, |i| synthetic_time::idle_for_days(i, clock, STALE_DAYS)),
                caps::STALE,
            ),
            mystery_meat_count: capped(
                count_where(items, WorkItem::is_mystery_meat),
                caps::MYSTERY_MEAT,
            ),
            unclear_quick_wins: capped(
                count_where(buckets.all(), is_unclear_quick_win),
                caps::UNCLEAR_QUICK_WINS,
            ),
            total_assigned: capped(buckets.total(), caps::TOTAL_ASSIGNED),
            chaos_bucket: ChaosBucket::from_score(chaos.score),
            compliance_score: round_to_five(compliance.compliance_score),
            is_compliant: compliance.is_compliant,
            calendar_blocked: false,
            consecutive_high_chaos_days: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Copy-with-one-field-changed constructors. Counters are re-clamped.
    // -----------------------------------------------------------------------

    pub fn with_deep_work_count(self, v: u32) -> Self {
        Self {
            deep_work_count: v.min(caps::BUCKET),
            ..self
        }
    }

    pub fn with_quick_win_count(self, v: u32) -> Self {
        Self {
            quick_win_count: v.min(caps::BUCKET),
            ..self
        }
    }

    pub fn with_maintenance_count(self, v: u32) -> Self {
        Self {
            maintenance_count: v.min(caps::BUCKET),
            ..self
        }
    }

    pub fn with_deferred_count(self, v: u32) -> Self {
        Self {
            deferred_count: v.min(caps::DEFERRED),
            ..self
        }
    }

    pub fn with_delegated_count(self, v: u32) -> Self {
        Self {
            delegated_count: v.min(caps::DELEGATED),
            ..self
        }
    }

    pub fn with_total_assigned(self, v: u32) -> Self {
        Self {
            total_assigned: v.min(caps::TOTAL_ASSIGNED),
            ..self
        }
    }

    pub fn with_mystery_meat_count(self, v: u32) -> Self {
        Self {
            mystery_meat_count: v.min(caps::MYSTERY_MEAT),
            ..self
        }
    }

    pub fn with_unclear_quick_wins(self, v: u32) -> Self {
        Self {
            unclear_quick_wins: v.min(caps::UNCLEAR_QUICK_WINS),
            ..self
        }
    }

    pub fn with_issues_touched_today(self, v: u32) -> Self {
        Self {
            issues_touched_today: v.min(caps::TOUCHED_TODAY),
            ..self
        }
    }

    pub fn with_issues_updated_after_hours(self, v: u32) -> Self {
        Self {
            issues_updated_after_hours: v.min(caps::AFTER_HOURS),
            ..self
        }
    }

    pub fn with_chaos_bucket(self, chaos_bucket: ChaosBucket) -> Self {
        Self {
            chaos_bucket,
            ..self
        }
    }

    pub fn with_calendar_blocked(self, calendar_blocked: bool) -> Self {
        Self {
            calendar_blocked,
            ..self
        }
    }

    pub fn with_consecutive_high_chaos_days(self, v: u32) -> Self {
        Self {
            consecutive_high_chaos_days: v.min(caps::HIGH_CHAOS_DAYS),
            ..self
        }
    }

    /// Bucket counter for a classification.
    pub fn bucket_count(&self, classification: Classification) -> u32 {
        match classification {
            Classification::DeepWork => self.deep_work_count,
            Classification::QuickWin => self.quick_win_count,
            Classification::Maintenance => self.maintenance_count,
            Classification::Deferred => self.deferred_count,
        }
    }

    /// Copy with one bucket counter replaced.
    pub fn with_bucket_count(self, classification: Classification, v: u32) -> Self {
        match classification {
            Classification::DeepWork => self.with_deep_work_count(v),
            Classification::QuickWin => self.with_quick_win_count(v),
            Classification::Maintenance => self.with_maintenance_count(v),
            Classification::Deferred => self.with_deferred_count(v),
        }
    }

    /// Re-derive the compliance flag and score from the bucket counters.
    ///
    /// Compliant iff deep <= 1, quick <= 3, maintenance <= 3. Score is
    /// `100 - 25*(deep > 1) - 10*(quick > 3) - 10*(maintenance > 3)`.
    pub fn recalculate_compliance(self) -> Self {
        let deep_over = self.deep_work_count > capped(MAX_DEEP_WORK, u32::MAX);
        let quick_over = self.quick_win_count > capped(MAX_QUICK_WINS, u32::MAX);
        let maint_over = self.maintenance_count > capped(MAX_MAINTENANCE, u32::MAX);

        let penalty: i32 = [(deep_over, 25), (quick_over, 10), (maint_over, 10)]
            .iter()
            .filter(|(over, _)| *over)
            .map(|(_, points)| points)
            .sum();
        let score = 100 - penalty;

        Self {
            is_compliant: !(deep_over || quick_over || maint_over),
            compliance_score: score.max(0),
            ..self
        }
    }

    fn workload_stress(&self) -> u32 {
        let overload = (self.total_assigned.saturating_sub(7) * 4).min(20);
        let split_focus = self.deep_work_count.saturating_sub(1) * 10;
        let no_focus = if self.deep_work_count == 0 && self.total_assigned > 0 {
            5
        } else {
            0
        };
        overload + split_focus + no_focus
    }

    fn chaos_stress(&self) -> u32 {
        self.chaos_bucket.ordinal() * 10
    }

    fn context_switch_stress(&self) -> u32 {
        (self.issues_touched_today.saturating_sub(5) * 3).min(15)
    }

    fn clarity_stress(&self) -> u32 {
        (self.mystery_meat_count * 2).min(10)
    }

    fn sustained_stress(&self) -> u32 {
        (self.consecutive_high_chaos_days * 5).min(15)
    }

    fn after_hours_stress(&self) -> u32 {
        (self.issues_updated_after_hours * 5).min(10)
    }

    pub fn stress_score(&self) -> u32 {
        let stress = self.workload_stress()
            + self.chaos_stress()
            + self.context_switch_stress()
            + self.clarity_stress()
            + self.unclear_quick_wins.min(5)
            + self.sustained_stress()
            + self.after_hours_stress();
        stress.min(100)
    }

    pub fn stress_level(&self) -> StressLevel {
        StressLevel::from_score(self.stress_score())
    }

    pub fn stress_breakdown(&self) -> StressBreakdown {
        StressBreakdown {
            workload: self.workload_stress().min(40),
            chaos: self.chaos_stress(),
            context_switching: self.context_switch_stress(),
            clarity: self.clarity_stress(),
            sustained: self.sustained_stress(),
            after_hours: self.after_hours_stress(),
        }
    }
}

/// Quick-win-labelled but with nothing in the body to act on.
fn is_unclear_quick_win(item: &WorkItem) -> bool {
    item.has_any_label(&[labels::QUICK_WIN, "good-first-issue"]) && !item.has_body()
}
