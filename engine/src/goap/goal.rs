//! The six planning goals, in registry order.
//!
//! | goal                 | priority | satisfied when                                  |
//! |----------------------|----------|-------------------------------------------------|
//! | PreventBurnout       | 100      | stress < 50 and fewer than 3 high-chaos days    |
//! | Achieve133Compliance | 90       | compliant                                       |
//! | ProtectDeepWork      | 85       | exactly one deep-work item, touched-today <= 3  |
//! | ReduceChaos          | 80       | chaos bucket <= MEDIUM                          |
//! | EnableFridayDeploy   | 70       | chaos <= MEDIUM, compliant, no urgent unowned   |
//! | ClearMysteryMeat     | 60       | no mystery meat                                 |

use super::GoalPolicy;
use crate::world_state::{ChaosBucket, WorldState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    PreventBurnout,
    Achieve133Compliance,
    ProtectDeepWork,
    ReduceChaos,
    /// Only urgent when the day is Friday-ish.
    EnableFridayDeploy {
        fridayish: bool,
    },
    ClearMysteryMeat,
}

impl Goal {
    /// Fixed registry; order breaks priority ties.
    pub fn registry(fridayish: bool) -> [Goal; 6] {
        [
            Goal::PreventBurnout,
            Goal::Achieve133Compliance,
            Goal::ProtectDeepWork,
            Goal::ReduceChaos,
            Goal::EnableFridayDeploy { fridayish },
            Goal::ClearMysteryMeat,
        ]
    }
}

fn chaos_contained(state: &WorldState) -> bool {
    state.chaos_bucket <= ChaosBucket::Medium
}

impl GoalPolicy for Goal {
    fn name(&self) -> &'static str {
        match self {
            Goal::PreventBurnout => "PreventBurnout",
            Goal::Achieve133Compliance => "Achieve133Compliance",
            Goal::ProtectDeepWork => "ProtectDeepWork",
            Goal::ReduceChaos => "ReduceChaos",
            Goal::EnableFridayDeploy { .. } => "EnableFridayDeploy",
            Goal::ClearMysteryMeat => "ClearMysteryMeat",
        }
    }

    fn priority(&self) -> u32 {
        match self {
            Goal::PreventBurnout => 100,
            Goal::Achieve133Compliance => 90,
            Goal::ProtectDeepWork => 85,
            Goal::ReduceChaos => 80,
            Goal::EnableFridayDeploy { .. } => 70,
            Goal::ClearMysteryMeat => 60,
        }
    }

    fn is_satisfied(&self, state: &WorldState) -> bool {
        match self {
            Goal::PreventBurnout => {
                state.stress_score() < 50 && state.consecutive_high_chaos_days < 3
            }
            Goal::Achieve133Compliance => state.is_compliant,
            Goal::ProtectDeepWork => {
                state.deep_work_count == 1 && state.issues_touched_today <= 3
            }
            Goal::ReduceChaos => chaos_contained(state),
            Goal::EnableFridayDeploy { .. } => {
                chaos_contained(state) && state.is_compliant && state.urgent_unassigned == 0
            }
            Goal::ClearMysteryMeat => state.mystery_meat_count == 0,
        }
    }

    fn insistence(&self, state: &WorldState) -> u32 {
        match self {
            Goal::PreventBurnout => {
                let stress = state.stress_score();
                if stress >= 70 {
                    100
                } else if state.consecutive_high_chaos_days >= 3 {
                    90
                } else {
                    stress
                }
            }
            Goal::Achieve133Compliance => {
                if state.is_compliant {
                    0
                } else {
                    // the not-synced sentinel (-1) reads as a zero score
                    100 - u32::try_from(state.compliance_score.clamp(0, 100)).unwrap_or(0)
                }
            }
            Goal::ProtectDeepWork => match state.deep_work_count {
                0 => 30,
                1 if state.issues_touched_today > 3 => 40,
                1 => 0,
                _ => 50,
            },
            Goal::ReduceChaos => state.chaos_bucket.ordinal() * 25,
            Goal::EnableFridayDeploy { fridayish } => {
                if *fridayish && !self.is_satisfied(state) {
                    80
                } else {
                    0
                }
            }
            Goal::ClearMysteryMeat => state.mystery_meat_count * 15,
        }
    }
}
