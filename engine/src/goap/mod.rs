//! Goal-oriented action planning over [`WorldState`].
//!
//! Goals say how badly they want the state to change; actions say when they
//! apply, what they cost, and how they transform the state. The planner greedily
//! serves the most urgent unsatisfied goal with the cheapest action that helps.
//!
//! The registries are closed enums ([`Goal`], [`Action`]). The search itself is
//! written against the [`GoalPolicy`] / [`ActionPolicy`] traits so tests can
//! drive it with hand-made policies.

pub mod action;
pub mod goal;
pub mod mutation;
pub mod planner;

pub use action::{Action, ItemTarget};
pub use goal::Goal;
pub use mutation::{Mutation, MutationPlan};
pub use planner::{ActionPlan, ActionSummary, PlanOutcome, PlanStep, Planner, search};

use crate::world_state::WorldState;

/// A fixed objective with a static rank and a dynamic urgency.
pub trait GoalPolicy {
    /// Stable display name.
    fn name(&self) -> &'static str;

    /// Static rank; added to insistence when choosing the next goal.
    fn priority(&self) -> u32;

    fn is_satisfied(&self, state: &WorldState) -> bool;

    /// Urgency in `0..=100` for this state.
    fn insistence(&self, state: &WorldState) -> u32;
}

/// A state transformation the planner may choose at most once per plan.
pub trait ActionPolicy {
    /// Unique within one pool, e.g. `DeferIssue#12` or `SlowIntake`.
    fn id(&self) -> String;

    fn name(&self) -> String;

    fn precondition_met(&self, state: &WorldState) -> bool;

    fn cost(&self, state: &WorldState) -> u32;

    fn apply(&self, state: &WorldState) -> WorldState;

    /// External mutations implied by choosing this action, in execution order.
    fn mutations(&self) -> Vec<Mutation>;
}
