//! Request and response records for one reshape run.

use crate::SCHEMA_VERSION;
use crate::chaos::ChaosMetrics;
use crate::compliance::ComplianceReport;
use crate::day_plan::DayPlan;
use crate::friday::FridayReadiness;
use crate::goap::{ActionSummary, MutationPlan, PlanOutcome, PlanStep};
use crate::world_state::{StressBreakdown, StressLevel};
use serde::{Deserialize, Serialize};

/// Who to reshape for, and whether to emit mutations.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReshapeRequest {
    pub user_id: String,
    /// Plan as usual but return an empty mutation plan.
    pub dry_run: bool,
    /// Caller-tracked run of consecutive high-chaos days.
    pub consecutive_high_chaos_days: u32,
}

impl ReshapeRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_high_chaos_days(mut self, days: u32) -> Self {
        self.consecutive_high_chaos_days = days;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReshapeStatus {
    Ok,
    NotSynced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReshapeReport {
    pub status: ReshapeStatus,
    pub repo: String,
    pub user_id: String,
    /// `None` when not synced.
    pub day_plan: Option<DayPlan>,
    pub mutation_plan: MutationPlan,
    pub actions: Vec<ActionSummary>,
    pub steps: Vec<PlanStep>,
    pub outcome: Option<PlanOutcome>,
    pub chaos: ChaosMetrics,
    pub compliance: ComplianceReport,
    /// `-1` when not synced.
    pub stress_score: i32,
    pub stress_level: StressLevel,
    pub stress_breakdown: Option<StressBreakdown>,
    /// Stress after applying every chosen action; `-1` when not synced.
    pub expected_stress_score: i32,
    pub friday: FridayReadiness,
    pub dry_run: bool,
    #[serde(default = "crate::schema_version")]
    pub schema_version: u32,
}

impl ReshapeReport {
    pub fn not_synced(repo: impl Into<String>, request: &ReshapeRequest) -> Self {
        let repo = repo.into();
        Self {
            status: ReshapeStatus::NotSynced,
            mutation_plan: MutationPlan::empty(repo.clone()),
            repo,
            user_id: request.user_id.clone(),
            day_plan: None,
            actions: Vec::new(),
            steps: Vec::new(),
            outcome: None,
            chaos: ChaosMetrics::not_synced(),
            compliance: ComplianceReport::not_synced(),
            stress_score: -1,
            stress_level: StressLevel::Low,
            stress_breakdown: None,
            expected_stress_score: -1,
            friday: FridayReadiness::not_synced(),
            dry_run: request.dry_run,
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn is_synced(&self) -> bool {
        self.status == ReshapeStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_synced_report_uses_sentinels() {
        let request = ReshapeRequest::new("alice").dry_run(true);
        let report = ReshapeReport::not_synced("acme/widgets", &request);
        assert!(!report.is_synced());
        assert_eq!(report.stress_score, -1);
        assert_eq!(report.expected_stress_score, -1);
        assert_eq!(report.friday.score, -1);
        assert!(report.mutation_plan.is_empty());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "not_synced");
        assert_eq!(json["chaos"]["score"], -1.0);
        assert_eq!(json["compliance"]["complianceScore"], -1);
        assert_eq!(json["schemaVersion"], 1);
    }

    #[test]
    fn request_builder() {
        let request = ReshapeRequest::new("alice").with_high_chaos_days(2);
        assert_eq!(request.user_id, "alice");
        assert!(!request.dry_run);
        assert_eq!(request.consecutive_high_chaos_days, 2);
    }
}
