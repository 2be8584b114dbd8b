//! Friday deploy readiness.
//!
//! A separate scoring model from the world-state stress score. Both read the
//! same signals but weigh them differently, so they are kept apart.
//!
//! ```text
//! score = 100
//!       - 20 if chaos > 5
//!       - 20 if chaos > 8         (on top of the above)
//!       - 15 if unresolved urgent > 0
//!       - 10 if after-hours signal
//!       - 10 if mystery meat > 3
//!       - 15 if a user was given and is not compliant
//! floored at 0
//! ```

use crate::SCHEMA_VERSION;
use crate::chaos::ChaosMetrics;
use crate::compliance::ComplianceReport;
use serde::{Deserialize, Serialize};

pub const READY_THRESHOLD: i32 = 80;
pub const CAUTION_THRESHOLD: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FridayStatus {
    Ready,
    Caution,
    NotReady,
    NotSynced,
}

impl FridayStatus {
    pub fn from_score(score: i32) -> Self {
        if score >= READY_THRESHOLD {
            Self::Ready
        } else if score >= CAUTION_THRESHOLD {
            Self::Caution
        } else {
            Self::NotReady
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "READY",
            Self::Caution => "CAUTION",
            Self::NotReady => "NOT_READY",
            Self::NotSynced => "NOT_SYNCED",
        }
    }
}

impl std::fmt::Display for FridayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FridayReadiness {
    /// `0..=100`, or `-1` when not synced.
    pub score: i32,
    pub status: FridayStatus,
    pub chaos_score: f64,
    pub unresolved_urgent: u32,
    pub after_hours_signal: bool,
    pub mystery_meat_count: u32,
    #[serde(default = "crate::schema_version")]
    pub schema_version: u32,
}

impl FridayReadiness {
    pub fn not_synced() -> Self {
        Self {
            score: -1,
            status: FridayStatus::NotSynced,
            chaos_score: ChaosMetrics::not_synced().score,
            unresolved_urgent: 0,
            after_hours_signal: false,
            mystery_meat_count: 0,
            schema_version: SCHEMA_VERSION,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == FridayStatus::Ready
    }
}

/// Score deploy readiness from chaos signals and, if a user was given, their
/// compliance report.
pub fn assess(chaos: &ChaosMetrics, compliance: Option<&ComplianceReport>) -> FridayReadiness {
    if chaos.is_not_synced() {
        return FridayReadiness::not_synced();
    }

    let deductions = [
        (chaos.score > 5.0, 20),
        (chaos.score > 8.0, 20),
        (chaos.unresolved_urgent > 0, 15),
        (chaos.after_hours_signal, 10),
        (chaos.mystery_meat_count > 3, 10),
        (compliance.is_some_and(|r| !r.is_compliant), 15),
    ];
    let penalty: i32 = deductions
        .iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, points)| points)
        .sum();
    let score = (100 - penalty).max(0);
    let status = FridayStatus::from_score(score);

    tracing::debug!(score, status = status.as_str(), "friday readiness assessed");

    FridayReadiness {
        score,
        status,
        chaos_score: chaos.score,
        unresolved_urgent: chaos.unresolved_urgent,
        after_hours_signal: chaos.after_hours_signal,
        mystery_meat_count: chaos.mystery_meat_count,
        schema_version: SCHEMA_VERSION,
    }
}
