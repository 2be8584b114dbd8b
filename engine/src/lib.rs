//! Day-reshape engine.
//!
//! Models one person's assigned work items as a small discrete world state and
//! searches for a short sequence of actions (defer, delegate, reclassify,
//! focus, scope) that brings the day back to a 1-3-3 shape: one deep-work
//! item, three quick wins, three maintenance tasks.
//!
//! The crate is pure computation over an injected [`ItemSnapshot`] and
//! [`Clock`]. It never talks to an issue tracker; it emits a [`MutationPlan`]
//! for an external executor to apply.
//!
//! Pipeline per request:
//! - [`chaos::calculate`]: repository instability score (0-10)
//! - [`compliance::analyze`]: 1-3-3 violations for one user
//! - [`WorldState::from`]: clamped planning state
//! - [`Planner::plan`]: greedy goal-directed search
//! - [`friday::assess`]: deploy readiness

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod chaos;
pub mod classifier;
pub mod clock;
pub mod compliance;
pub mod config;
pub mod day_plan;
pub mod errors;
pub mod friday;
pub mod goap;
pub mod item;
pub mod labels;
pub mod reshape;
pub mod synthetic_time;
pub mod world_state;

pub use chaos::ChaosMetrics;
pub use classifier::{Classification, classify, estimate_hours};
pub use clock::Clock;
pub use compliance::{ComplianceReport, Severity, Violation, ViolationType};
pub use config::EngineConfig;
pub use day_plan::{DayPlan, PlannedItem, build_day_plan};
pub use errors::{EngineError, ErrorCategory, Result};
pub use friday::{FridayReadiness, FridayStatus};
pub use goap::{
    Action, ActionPlan, ActionSummary, Goal, Mutation, MutationPlan, PlanOutcome, PlanStep,
    Planner,
};
pub use item::{ItemSnapshot, ItemState, WorkItem};
pub use reshape::{ReshapeReport, ReshapeRequest, ReshapeStatus};
pub use world_state::{ChaosBucket, StressBreakdown, StressLevel, WorldState};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version stamped on every serialised report.
pub const SCHEMA_VERSION: u32 = 1;

/// Serde default for `schema_version` fields.
pub fn schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Main entry point: runs the full reshape pipeline against one snapshot.
#[derive(Debug, Clone)]
pub struct ReshapeEngine {
    cfg: EngineConfig,
    planner: Planner,
}

impl ReshapeEngine {
    /// Load config from the environment / default path and build an engine
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::load()?)
    }

    /// Build an engine from an explicit config (validated)
    pub fn with_config(cfg: EngineConfig) -> Result<Self> {
        cfg.validate()?;
        let planner = Planner::from_config(&cfg);

        tracing::info!(
            version = VERSION,
            action_budget = planner.action_budget(),
            friday_forced = cfg.friday.forced,
            "reshape engine initialized"
        );

        Ok(Self { cfg, planner })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Clock from the `[clock]` section: pinned if `fixed` is set, else system time.
    pub fn clock(&self) -> Result<Clock> {
        Clock::from_config(&self.cfg.clock)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Single-stage helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn chaos(&self, snapshot: Option<&ItemSnapshot>, clock: &Clock) -> ChaosMetrics {
        match snapshot {
            Some(snapshot) => chaos::calculate(&snapshot.items, clock),
            None => ChaosMetrics::not_synced(),
        }
    }

    pub fn compliance(
        &self,
        snapshot: Option<&ItemSnapshot>,
        user: &str,
        clock: &Clock,
    ) -> ComplianceReport {
        match snapshot {
            Some(snapshot) => compliance::analyze(&snapshot.items, user, clock),
            None => ComplianceReport::not_synced(),
        }
    }

    /// Planning state for `user`, or `None` when not synced.
    pub fn world_state(
        &self,
        snapshot: Option<&ItemSnapshot>,
        user: &str,
        clock: &Clock,
        consecutive_high_chaos_days: u32,
    ) -> Option<WorldState> {
        let snapshot = snapshot?;
        let chaos = chaos::calculate(&snapshot.items, clock);
        let compliance = compliance::analyze(&snapshot.items, user, clock);
        let state = WorldState::from(&snapshot.items, user, &chaos, &compliance, clock)
            .with_consecutive_high_chaos_days(consecutive_high_chaos_days);
        Some(state)
    }

    /// Friday readiness; the compliance deduction only applies when `user` is given.
    pub fn friday(
        &self,
        snapshot: Option<&ItemSnapshot>,
        user: Option<&str>,
        clock: &Clock,
    ) -> FridayReadiness {
        let Some(snapshot) = snapshot else {
            return FridayReadiness::not_synced();
        };
        let chaos = chaos::calculate(&snapshot.items, clock);
        let compliance = user.map(|u| compliance::analyze(&snapshot.items, u, clock));
        friday::assess(&chaos, compliance.as_ref())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Full pipeline
    // ─────────────────────────────────────────────────────────────────────────

    /// Run chaos, compliance, world state, day plan, planner and Friday
    /// readiness for one user. `None` means the repository was never synced.
    pub fn reshape(
        &self,
        repo: &str,
        snapshot: Option<&ItemSnapshot>,
        request: &ReshapeRequest,
        clock: &Clock,
    ) -> ReshapeReport {
        let Some(snapshot) = snapshot else {
            tracing::info!(repo, "repository not synced, nothing to reshape");
            return ReshapeReport::not_synced(repo, request);
        };
        let items = &snapshot.items;
        let user = request.user_id.as_str();

        let chaos = chaos::calculate(items, clock);
        let compliance = compliance::analyze(items, user, clock);
        let state = WorldState::from(items, user, &chaos, &compliance, clock)
            .with_consecutive_high_chaos_days(request.consecutive_high_chaos_days);

        let day_plan = build_day_plan(items, user);
        let plan = self.planner.plan(&state, items, user, clock);
        let mutation_plan = if request.dry_run {
            MutationPlan::empty(repo)
        } else {
            plan.to_mutation_plan(repo)
        };
        let friday = friday::assess(&chaos, Some(&compliance));
        let stress_score = state.stress_score();

        tracing::info!(
            repo,
            user,
            stress = stress_score,
            expected_stress = plan.final_stress,
            mutations = mutation_plan.actions.len(),
            dry_run = request.dry_run,
            "reshape complete"
        );

        ReshapeReport {
            status: ReshapeStatus::Ok,
            repo: repo.to_string(),
            user_id: request.user_id.clone(),
            day_plan: Some(day_plan),
            mutation_plan,
            actions: plan.summaries(),
            steps: plan.steps.clone(),
            outcome: Some(plan.outcome),
            chaos,
            compliance,
            stress_score: i32::try_from(stress_score).unwrap_or(i32::MAX),
            stress_level: state.stress_level(),
            stress_breakdown: Some(state.stress_breakdown()),
            expected_stress_score: i32::try_from(plan.final_stress).unwrap_or(i32::MAX),
            friday,
            dry_run: request.dry_run,
            schema_version: SCHEMA_VERSION,
        }
    }
}
