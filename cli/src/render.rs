//! Compact text rendering for terminal output.
//!
//! Colour is applied only when stdout is a terminal, so piped output and test
//! captures stay plain.

use dayshape_engine::{
    ChaosMetrics, ComplianceReport, DayPlan, FridayReadiness, FridayStatus, PlannedItem,
    ReshapeReport, Severity, StressBreakdown, StressLevel, WorldState,
};
use owo_colors::OwoColorize;
use std::fmt::Write as _;
use std::io::IsTerminal;

/// Whether to emit ANSI colour codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    color: bool,
}

impl Style {
    pub fn detect() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    fn good(self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn warn(self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn bad(self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    fn heading(self, text: &str) -> String {
        if self.color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn stress_level(self, level: StressLevel) -> String {
        let label = stress_level_name(level);
        match level {
            StressLevel::Low => self.good(label),
            StressLevel::Moderate => self.warn(label),
            StressLevel::High | StressLevel::Critical => self.bad(label),
        }
    }

    fn friday_status(self, status: FridayStatus) -> String {
        match status {
            FridayStatus::Ready => self.good(status.as_str()),
            FridayStatus::Caution => self.warn(status.as_str()),
            FridayStatus::NotReady | FridayStatus::NotSynced => self.bad(status.as_str()),
        }
    }
}

pub fn stress_level_name(level: StressLevel) -> &'static str {
    match level {
        StressLevel::Low => "LOW",
        StressLevel::Moderate => "MODERATE",
        StressLevel::High => "HIGH",
        StressLevel::Critical => "CRITICAL",
    }
}

fn not_synced(repo: &str) -> String {
    format!("{repo}: not synced (no item snapshot)\n")
}

// ─────────────────────────────────────────────────────────────────────────────
// Single-stage views
// ─────────────────────────────────────────────────────────────────────────────

pub fn chaos(style: Style, repo: &str, metrics: &ChaosMetrics) -> String {
    if metrics.is_not_synced() {
        return not_synced(repo);
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} chaos {}/10",
        style.heading(repo),
        metrics.rounded_score()
    );
    let _ = writeln!(out, "  touched in last hour  {}", metrics.items_touched_recently);
    let _ = writeln!(out, "  unresolved urgent     {}", metrics.unresolved_urgent);
    let _ = writeln!(out, "  distinct labels       {}", metrics.distinct_label_count);
    let _ = writeln!(out, "  after-hours activity  {}", yes_no(metrics.after_hours_signal));
    let _ = writeln!(out, "  mystery meat          {}", metrics.mystery_meat_count);
    out
}

pub fn compliance(style: Style, repo: &str, report: &ComplianceReport) -> String {
    if !report.is_synced() {
        return not_synced(repo);
    }
    let mut out = String::new();
    let user = report.user_id.as_deref().unwrap_or("?");
    let verdict = if report.is_compliant {
        style.good("compliant")
    } else {
        style.bad("not compliant")
    };
    let _ = writeln!(
        out,
        "{} {verdict} (score {})",
        style.heading(&format!("{user} @ {repo}")),
        report.compliance_score
    );
    for v in &report.violations {
        let tag = match v.severity {
            Severity::Critical => style.bad("[CRITICAL]"),
            Severity::Warning => style.warn("[WARNING]"),
            Severity::Info => "[INFO]".to_string(),
        };
        let _ = writeln!(out, "  {tag} {}", v.message);
        if !v.affected_items.is_empty() {
            let _ = writeln!(out, "         items: {}", item_refs(&v.affected_items));
        }
        let _ = writeln!(out, "         fix: {}", v.recommendation);
    }
    out
}

pub fn stress(style: Style, repo: &str, user: &str, state: Option<&WorldState>) -> String {
    let Some(state) = state else {
        return not_synced(repo);
    };
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} stress {} ({})",
        style.heading(&format!("{user} @ {repo}")),
        state.stress_score(),
        style.stress_level(state.stress_level())
    );
    breakdown(&mut out, &state.stress_breakdown());
    out
}

pub fn friday(style: Style, repo: &str, readiness: &FridayReadiness) -> String {
    if readiness.status == FridayStatus::NotSynced {
        return not_synced(repo);
    }
    format!(
        "{} friday {} {}\n",
        style.heading(repo),
        readiness.score,
        style.friday_status(readiness.status)
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Full reshape
// ─────────────────────────────────────────────────────────────────────────────

pub fn reshape(style: Style, report: &ReshapeReport) -> String {
    if !report.is_synced() {
        return not_synced(&report.repo);
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        style.heading(&format!("Reshape for {} @ {}", report.user_id, report.repo))
    );
    let _ = writeln!(
        out,
        "  stress {} ({}) -> {} expected",
        report.stress_score,
        style.stress_level(report.stress_level),
        report.expected_stress_score
    );
    let _ = writeln!(
        out,
        "  chaos {}/10  compliance {}  friday {} {}",
        report.chaos.rounded_score(),
        report.compliance.compliance_score,
        report.friday.score,
        style.friday_status(report.friday.status)
    );

    if let Some(plan) = &report.day_plan {
        day_plan(&mut out, style, plan);
    }

    let outcome = report
        .outcome
        .map(|o| format!("{o:?}"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "{} ({}, {outcome})",
        style.heading("Actions"),
        report.actions.len()
    );
    for (i, (action, step)) in report.actions.iter().zip(&report.steps).enumerate() {
        let _ = writeln!(
            out,
            "  {}. {} [cost {}] -> stress {}  ({})",
            i + 1,
            action.name,
            action.cost,
            step.stress_after,
            step.goal
        );
    }

    if report.dry_run {
        let _ = writeln!(out, "{}: none (dry run)", style.heading("Mutations"));
    } else {
        let _ = writeln!(
            out,
            "{} ({})",
            style.heading("Mutations"),
            report.mutation_plan.actions.len()
        );
        for m in &report.mutation_plan.actions {
            let _ = writeln!(out, "  {m}");
        }
    }
    out
}

fn day_plan(out: &mut String, style: Style, plan: &DayPlan) {
    let _ = writeln!(out, "{}", style.heading("Day plan"));
    let deep = plan
        .deep_work
        .as_ref()
        .map(planned)
        .unwrap_or_else(|| "-".to_string());
    let _ = writeln!(out, "  deep work    {deep}");
    let _ = writeln!(out, "  quick wins   {}", planned_list(&plan.quick_wins));
    let _ = writeln!(out, "  maintenance  {}", planned_list(&plan.maintenance));
    let _ = writeln!(out, "  deferred     {}", planned_list(&plan.deferred));
}

fn breakdown(out: &mut String, b: &StressBreakdown) {
    let _ = writeln!(out, "  workload           {}", b.workload);
    let _ = writeln!(out, "  chaos              {}", b.chaos);
    let _ = writeln!(out, "  context switching  {}", b.context_switching);
    let _ = writeln!(out, "  clarity            {}", b.clarity);
    let _ = writeln!(out, "  sustained          {}", b.sustained);
    let _ = writeln!(out, "  after hours        {}", b.after_hours);
}

fn planned(item: &PlannedItem) -> String {
    format!("#{} {}", item.number, item.title)
}

fn planned_list(items: &[PlannedItem]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.iter().map(planned).collect::<Vec<_>>().join(", ")
    }
}

fn item_refs(numbers: &[u64]) -> String {
    numbers
        .iter()
        .map(|n| format!("#{n}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayshape_engine::ReshapeRequest;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_synced_views_say_so() {
        let style = Style::plain();
        assert_eq!(
            chaos(style, "acme/widgets", &ChaosMetrics::not_synced()),
            "acme/widgets: not synced (no item snapshot)\n"
        );
        let report = ReshapeReport::not_synced("acme/widgets", &ReshapeRequest::new("alice"));
        assert!(reshape(style, &report).contains("not synced"));
        assert!(stress(style, "acme/widgets", "alice", None).contains("not synced"));
    }

    #[test]
    fn stress_view_lists_components() {
        let state = WorldState::default().with_total_assigned(3);
        let text = stress(Style::plain(), "acme/widgets", "alice", Some(&state));
        assert!(text.starts_with("alice @ acme/widgets stress 5 (LOW)"));
        assert!(text.contains("workload           5"));
    }

    #[test]
    fn plain_style_has_no_escapes() {
        let text = friday(Style::plain(), "r", &FridayReadiness::not_synced());
        assert!(!text.contains('\u{1b}'));
        assert_eq!(item_refs(&[3, 9]), "#3 #9");
    }
}
