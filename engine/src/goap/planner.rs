//! Greedy goal-directed planner.
//!
//! Each iteration:
//! 1. pick the unsatisfied goal with the highest `priority + insistence`
//!    (registry order breaks ties); stop if every goal is satisfied
//! 2. among unused actions whose precondition holds and whose hypothetical
//!    result strictly lowers that goal's insistence, pick the cheapest (pool
//!    order breaks ties); stop if none qualifies
//! 3. apply it and mark its id used
//!
//! The loop runs at most `action_budget` times. Work is bounded by
//! `budget * pool * goals`; nothing here allocates per candidate beyond ids.

use super::action::Action;
use super::goal::Goal;
use super::mutation::{Mutation, MutationPlan};
use super::{ActionPolicy, GoalPolicy};
use crate::clock::Clock;
use crate::config::{EngineConfig, RECOMMENDED_MAX_ACTION_BUDGET};
use crate::item::{WorkItem, open_assigned};
use crate::labels::priority_weight;
use crate::synthetic_time;
use crate::world_state::{TOUCHED_TODAY_WINDOW_HOURS, WorldState};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Why the search loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanOutcome {
    /// No goal left unsatisfied.
    Complete,
    /// The top goal has no qualifying action.
    NoProgress,
    /// Hit the action budget with goals still open.
    BudgetExhausted,
}

/// One iteration of the search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub goal: String,
    pub action_id: String,
    /// Cost in the state the action was selected from.
    pub cost: u32,
    pub stress_after: u32,
}

/// Result of [`search`]: chosen pool indices plus the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTrace {
    pub chosen: Vec<usize>,
    pub steps: Vec<PlanStep>,
    pub final_state: WorldState,
    pub outcome: PlanOutcome,
}

/// Run the greedy loop over arbitrary goal and action policies.
pub fn search<G, A>(initial: &WorldState, goals: &[G], pool: &[A], budget: usize) -> SearchTrace
where
    G: GoalPolicy,
    A: ActionPolicy,
{
    let mut state = *initial;
    let mut used: HashSet<String> = HashSet::new();
    let mut chosen = Vec::new();
    let mut steps = Vec::new();

    let outcome = loop {
        let Some(goal) = most_urgent_goal(goals, &state) else {
            break PlanOutcome::Complete;
        };
        if chosen.len() >= budget {
            break PlanOutcome::BudgetExhausted;
        }

        let Some((index, cost)) = cheapest_helpful_action(goal, pool, &used, &state) else {
            tracing::debug!(goal = goal.name(), "no qualifying action");
            break PlanOutcome::NoProgress;
        };

        let action = &pool[index];
        let id = action.id();
        state = action.apply(&state);
        let stress_after = state.stress_score();

        tracing::debug!(
            step = chosen.len() + 1,
            goal = goal.name(),
            action = %id,
            cost,
            stress_after,
            "planner step"
        );

        steps.push(PlanStep {
            goal: goal.name().to_string(),
            action_id: id.clone(),
            cost,
            stress_after,
        });
        used.insert(id);
        chosen.push(index);
    };

    SearchTrace {
        chosen,
        steps,
        final_state: state,
        outcome,
    }
}

fn most_urgent_goal<'g, G: GoalPolicy>(goals: &'g [G], state: &WorldState) -> Option<&'g G> {
    let mut best: Option<(&G, u32)> = None;
    for goal in goals.iter().filter(|g| !g.is_satisfied(state)) {
        let urgency = goal.priority() + goal.insistence(state);
        if best.is_none_or(|(_, top)| urgency > top) {
            best = Some((goal, urgency));
        }
    }
    best.map(|(goal, _)| goal)
}

fn cheapest_helpful_action<G: GoalPolicy, A: ActionPolicy>(
    goal: &G,
    pool: &[A],
    used: &HashSet<String>,
    state: &WorldState,
) -> Option<(usize, u32)> {
    let current = goal.insistence(state);
    pool.iter()
        .enumerate()
        .filter(|(_, a)| !used.contains(&a.id()))
        .filter(|(_, a)| a.precondition_met(state))
        .filter(|(_, a)| goal.insistence(&a.apply(state)) < current)
        .map(|(index, a)| (index, a.cost(state)))
        .min_by_key(|(_, cost)| *cost)
}

/// Id, name and selection-time cost of a chosen action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSummary {
    pub id: String,
    pub name: String,
    pub cost: u32,
}

/// Ordered actions chosen for one planning request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    pub actions: Vec<Action>,
    pub steps: Vec<PlanStep>,
    pub initial_stress: u32,
    pub final_stress: u32,
    pub outcome: PlanOutcome,
}

impl ActionPlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn summaries(&self) -> Vec<ActionSummary> {
        self.actions
            .iter()
            .zip(&self.steps)
            .map(|(action, step)| ActionSummary {
                id: action.id(),
                name: action.name(),
                cost: step.cost,
            })
            .collect()
    }

    /// Every chosen action's mutations, flattened in plan order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.actions.iter().flat_map(ActionPolicy::mutations).collect()
    }

    pub fn to_mutation_plan(&self, repo: &str) -> MutationPlan {
        MutationPlan::new(repo, self.mutations())
    }
}

/// Planner over the fixed goal registry and the reshape action pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planner {
    action_budget: usize,
    friday_forced: bool,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(RECOMMENDED_MAX_ACTION_BUDGET)
    }
}

impl Planner {
    pub fn new(action_budget: usize) -> Self {
        Self {
            action_budget,
            friday_forced: false,
        }
    }

    pub fn from_config(cfg: &EngineConfig) -> Self {
        Self::new(cfg.planner.action_budget).with_friday_forced(cfg.friday.forced)
    }

    pub fn with_friday_forced(mut self, forced: bool) -> Self {
        self.friday_forced = forced;
        self
    }

    pub fn action_budget(&self) -> usize {
        self.action_budget
    }

    /// Per-item actions for `user`'s open items in stable order, then the
    /// global actions.
    ///
    /// Items sort by priority weight, touched-today first, most recently
    /// updated first (missing last), then number.
    pub fn action_pool(items: &[WorkItem], user: &str, clock: &Clock) -> Vec<Action> {
        let window = Duration::hours(TOUCHED_TODAY_WINDOW_HOURS);
        let mut candidates: Vec<&WorkItem> = open_assigned(items, user).collect();
        candidates.sort_by_key(|item| {
            (
                priority_weight(item),
                !synthetic_time::touched_within(item, clock, window),
                Reverse(item.updated_at),
                item.number,
            )
        });

        candidates
            .into_iter()
            .flat_map(Action::for_item)
            .chain(Action::globals())
            .collect()
    }

    pub fn plan(
        &self,
        initial: &WorldState,
        items: &[WorkItem],
        user: &str,
        clock: &Clock,
    ) -> ActionPlan {
        let fridayish = synthetic_time::is_friday_scenario(items, clock, self.friday_forced);
        let goals = Goal::registry(fridayish);
        let pool = Self::action_pool(items, user, clock);

        let trace = search(initial, &goals, &pool, self.action_budget);
        let actions: Vec<Action> = trace.chosen.iter().map(|&i| pool[i].clone()).collect();
        let initial_stress = initial.stress_score();
        let final_stress = trace.final_state.stress_score();

        tracing::info!(
            user,
            pool = pool.len(),
            actions = actions.len(),
            initial_stress,
            final_stress,
            outcome = ?trace.outcome,
            "plan computed"
        );

        ActionPlan {
            actions,
            steps: trace.steps,
            initial_stress,
            final_stress,
            outcome: trace.outcome,
        }
    }
}
