//! Reshape actions.
//!
//! Per-item actions close over an [`ItemTarget`]: the facts about one open,
//! assigned item captured when the pool is built. Global actions act on the
//! state alone and imply no external mutation.

use super::ActionPolicy;
use super::mutation::Mutation;
use crate::classifier::{Classification, classify};
use crate::item::WorkItem;
use crate::labels;
use crate::world_state::WorldState;

/// Facts about one item that per-item actions depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTarget {
    pub number: u64,
    pub title: String,
    pub classification: Classification,
    pub has_body: bool,
    pub urgent: bool,
    pub critical: bool,
    pub deferred: bool,
    pub delegated: bool,
    /// Carries a priority:critical or architecture label.
    pub focus_candidate: bool,
    pub has_deep_work_label: bool,
    /// Carries a documentation/tech-debt/cleanup/routine label.
    pub routine_upkeep: bool,
    /// Already sized or scoped.
    pub scoped: bool,
    pub unclear_quick_win: bool,
}

impl From<&WorkItem> for ItemTarget {
    fn from(item: &WorkItem) -> Self {
        let has_body = item.has_body();
        Self {
            number: item.number,
            title: item.title.clone(),
            classification: classify(item),
            has_body,
            urgent: item.has_label(labels::URGENT),
            critical: item.has_label(labels::PRIORITY_CRITICAL),
            deferred: item.has_label(labels::DEFERRED),
            delegated: item.has_label(labels::DELEGATED),
            focus_candidate: item.has_any_label(&[labels::PRIORITY_CRITICAL, labels::ARCHITECTURE]),
            has_deep_work_label: item.has_label(labels::DEEP_WORK),
            routine_upkeep: item.has_any_label(labels::ROUTINE_UPKEEP_LABELS),
            scoped: item.has_any_label(labels::SCOPED_LABELS),
            unclear_quick_win: !has_body
                && item.has_any_label(&[labels::QUICK_WIN, "good-first-issue"]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    DeferIssue(ItemTarget),
    DelegateIssue(ItemTarget),
    ReclassifyAsQuickWin(ItemTarget),
    ReclassifyAsMaintenance(ItemTarget),
    MarkDeepWorkFocus(ItemTarget),
    AddScopeToIssue(ItemTarget),
    SlowIntake,
    SuggestBreak,
    BlockCalendarTime,
}

impl Action {
    /// The six per-item actions for one item, in pool order.
    pub fn for_item(item: &WorkItem) -> [Action; 6] {
        let target = ItemTarget::from(item);
        [
            Action::DeferIssue(target.clone()),
            Action::DelegateIssue(target.clone()),
            Action::ReclassifyAsQuickWin(target.clone()),
            Action::ReclassifyAsMaintenance(target.clone()),
            Action::MarkDeepWorkFocus(target.clone()),
            Action::AddScopeToIssue(target),
        ]
    }

    /// State-only actions appended after every per-item action.
    pub fn globals() -> [Action; 3] {
        [Action::SlowIntake, Action::SuggestBreak, Action::BlockCalendarTime]
    }

    pub fn target(&self) -> Option<&ItemTarget> {
        match self {
            Action::DeferIssue(t)
            | Action::DelegateIssue(t)
            | Action::ReclassifyAsQuickWin(t)
            | Action::ReclassifyAsMaintenance(t)
            | Action::MarkDeepWorkFocus(t)
            | Action::AddScopeToIssue(t) => Some(t),
            Action::SlowIntake | Action::SuggestBreak | Action::BlockCalendarTime => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Action::DeferIssue(_) => "DeferIssue",
            Action::DelegateIssue(_) => "DelegateIssue",
            Action::ReclassifyAsQuickWin(_) => "ReclassifyAsQuickWin",
            Action::ReclassifyAsMaintenance(_) => "ReclassifyAsMaintenance",
            Action::MarkDeepWorkFocus(_) => "MarkDeepWorkFocus",
            Action::AddScopeToIssue(_) => "AddScopeToIssue",
            Action::SlowIntake => "SlowIntake",
            Action::SuggestBreak => "SuggestBreak",
            Action::BlockCalendarTime => "BlockCalendarTime",
        }
    }
}

/// Moves one item out of its current bucket.
fn leave_bucket(state: WorldState, target: &ItemTarget) -> WorldState {
    let from = target.classification;
    state.with_bucket_count(from, state.bucket_count(from).saturating_sub(1))
}

impl ActionPolicy for Action {
    fn id(&self) -> String {
        match self.target() {
            Some(t) => format!("{}#{}", self.kind(), t.number),
            None => self.kind().to_string(),
        }
    }

    fn name(&self) -> String {
        match self {
            Action::DeferIssue(t) => format!("Defer: {}", t.title),
            Action::DelegateIssue(t) => format!("Delegate: {}", t.title),
            Action::ReclassifyAsQuickWin(t) => format!("Quick-win: {}", t.title),
            Action::ReclassifyAsMaintenance(t) => format!("Maintenance: {}", t.title),
            Action::MarkDeepWorkFocus(t) => format!("Focus: {}", t.title),
            Action::AddScopeToIssue(t) => format!("Add scope: {}", t.title),
            Action::SlowIntake => "Slow intake (hide new items)".to_string(),
            Action::SuggestBreak => "Suggest break".to_string(),
            Action::BlockCalendarTime => "Block calendar for deep work".to_string(),
        }
    }

    fn precondition_met(&self, s: &WorldState) -> bool {
        match self {
            Action::DeferIssue(t) => !t.urgent && !t.deferred && s.total_assigned > 1,
            Action::DelegateIssue(t) => !t.critical && !t.delegated && s.total_assigned > 3,
            // Only deferred items: the added labels move them into the new bucket.
            Action::ReclassifyAsQuickWin(t) => {
                t.has_body
                    && !t.critical
                    && t.classification == Classification::Deferred
                    && s.quick_win_count < 3
            }
            Action::ReclassifyAsMaintenance(t) => {
                t.routine_upkeep
                    && t.classification == Classification::Deferred
                    && s.maintenance_count < 3
            }
            Action::MarkDeepWorkFocus(t) => {
                s.deep_work_count == 0 && t.focus_candidate && !t.has_deep_work_label
            }
            Action::AddScopeToIssue(t) => !t.has_body && !t.scoped,
            Action::SlowIntake => s.stress_score() >= 70,
            Action::SuggestBreak => {
                s.consecutive_high_chaos_days >= 2 || s.issues_updated_after_hours > 0
            }
            Action::BlockCalendarTime => s.deep_work_count > 0 && !s.calendar_blocked,
        }
    }

    fn cost(&self, s: &WorldState) -> u32 {
        let overloaded = s.total_assigned > 7;
        match self {
            Action::DeferIssue(_) => {
                if overloaded {
                    5
                } else {
                    15
                }
            }
            Action::DelegateIssue(_) => {
                if overloaded {
                    3
                } else {
                    12
                }
            }
            Action::ReclassifyAsQuickWin(_) => {
                if s.quick_win_count >= 3 {
                    20
                } else {
                    8
                }
            }
            Action::ReclassifyAsMaintenance(_) => {
                if s.maintenance_count >= 3 {
                    20
                } else {
                    6
                }
            }
            Action::MarkDeepWorkFocus(_) => {
                if s.deep_work_count == 0 {
                    5
                } else {
                    25
                }
            }
            Action::AddScopeToIssue(_) => 12,
            Action::SlowIntake => 10,
            Action::SuggestBreak => 5,
            Action::BlockCalendarTime => 8,
        }
    }

    fn apply(&self, s: &WorldState) -> WorldState {
        let s = *s;
        match self {
            Action::DeferIssue(t) => {
                let moved = if t.classification == Classification::Deferred {
                    s
                } else {
                    leave_bucket(s, t).with_deferred_count(s.deferred_count + 1)
                };
                moved
                    .with_total_assigned(s.total_assigned.saturating_sub(1))
                    .recalculate_compliance()
            }
            Action::DelegateIssue(t) => leave_bucket(s, t)
                .with_total_assigned(s.total_assigned.saturating_sub(1))
                .with_delegated_count(s.delegated_count + 1)
                .recalculate_compliance(),
            Action::ReclassifyAsQuickWin(t) => leave_bucket(s, t)
                .with_quick_win_count(s.quick_win_count + 1)
                .recalculate_compliance(),
            Action::ReclassifyAsMaintenance(t) => leave_bucket(s, t)
                .with_maintenance_count(s.maintenance_count + 1)
                .recalculate_compliance(),
            Action::MarkDeepWorkFocus(_) => s.with_deep_work_count(1).recalculate_compliance(),
            Action::AddScopeToIssue(t) => {
                let unclear = if t.unclear_quick_win {
                    s.unclear_quick_wins.saturating_sub(1)
                } else {
                    s.unclear_quick_wins
                };
                s.with_mystery_meat_count(s.mystery_meat_count.saturating_sub(1))
                    .with_unclear_quick_wins(unclear)
                    .recalculate_compliance()
            }
            Action::SlowIntake => s.with_chaos_bucket(s.chaos_bucket.step_down()),
            Action::SuggestBreak => s.with_consecutive_high_chaos_days(
                s.consecutive_high_chaos_days.saturating_sub(1),
            ),
            Action::BlockCalendarTime => s.with_calendar_blocked(true),
        }
    }

    fn mutations(&self) -> Vec<Mutation> {
        match self {
            Action::DeferIssue(t) => {
                let mut out = vec![Mutation::add_labels(
                    t.number,
                    &[labels::DEFERRED, labels::NEXT_SPRINT],
                )];
                if t.critical {
                    out.push(Mutation::remove_labels(t.number, &[labels::PRIORITY_CRITICAL]));
                }
                out.push(Mutation::comment(
                    t.number,
                    "Deferred to protect your focus. Revisit next sprint.",
                ));
                out
            }
            Action::DelegateIssue(t) => vec![
                Mutation::add_labels(t.number, &[labels::DELEGATED, labels::NEEDS_OWNER]),
                Mutation::comment(t.number, "Marked for delegation to balance workload."),
            ],
            Action::ReclassifyAsQuickWin(t) => vec![
                Mutation::add_labels(t.number, &[labels::QUICK_WIN, labels::SIZE_S]),
                Mutation::comment(t.number, "Reclassified as quick win for today's 1-3-3 plan."),
            ],
            Action::ReclassifyAsMaintenance(t) => vec![
                Mutation::add_labels(t.number, &[labels::MAINTENANCE, labels::STRUCTURE_133]),
                Mutation::comment(t.number, "Classified as maintenance task for the 1-3-3 plan."),
            ],
            Action::MarkDeepWorkFocus(t) => vec![
                Mutation::add_labels(t.number, &[labels::DEEP_WORK, labels::FOCUS]),
                Mutation::comment(
                    t.number,
                    "Marked as today's deep work focus. Protect this time.",
                ),
            ],
            Action::AddScopeToIssue(t) => vec![
                Mutation::add_labels(t.number, &[labels::NEEDS_SCOPE, labels::BLOCKED]),
                Mutation::comment(
                    t.number,
                    "Needs clearer scope before starting. What does 'done' look like?",
                ),
            ],
            Action::SlowIntake | Action::SuggestBreak | Action::BlockCalendarTime => Vec::new(),
        }
    }
}
