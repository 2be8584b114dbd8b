//! Single-stage commands: `chaos`, `compliance`, `stress`, `friday`.

use crate::render::{self, Style};
use crate::{CommonArgs, Session, StressArgs, print_json};
use anyhow::Result;
use dayshape_engine::{StressBreakdown, StressLevel, WorldState};
use serde::Serialize;
use std::path::Path;

pub fn run_chaos(config: Option<&Path>, args: &CommonArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    let clock = session.engine.clock()?;
    let metrics = session.engine.chaos(session.snapshot.as_ref(), &clock);

    if args.json {
        print_json(&metrics)
    } else {
        print!("{}", render::chaos(Style::detect(), &session.repo, &metrics));
        Ok(())
    }
}

pub fn run_compliance(config: Option<&Path>, args: &CommonArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    let user = session.require_user()?;
    let clock = session.engine.clock()?;
    let report = session
        .engine
        .compliance(session.snapshot.as_ref(), user, &clock);

    if args.json {
        print_json(&report)
    } else {
        print!("{}", render::compliance(Style::detect(), &session.repo, &report));
        Ok(())
    }
}

/// JSON shape of `dayshape stress --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StressView {
    user_id: String,
    /// `-1` when not synced.
    stress_score: i32,
    stress_level: StressLevel,
    breakdown: Option<StressBreakdown>,
    world_state: Option<WorldState>,
}

impl StressView {
    fn new(user: &str, state: Option<WorldState>) -> Self {
        Self {
            user_id: user.to_string(),
            stress_score: state.map_or(-1, |s| {
                i32::try_from(s.stress_score()).unwrap_or(i32::MAX)
            }),
            stress_level: state.map_or(StressLevel::Low, |s| s.stress_level()),
            breakdown: state.map(|s| s.stress_breakdown()),
            world_state: state,
        }
    }
}

pub fn run_stress(config: Option<&Path>, args: &StressArgs) -> Result<()> {
    let session = Session::open(config, &args.common)?;
    let user = session.require_user()?;
    let clock = session.engine.clock()?;
    let state = session.engine.world_state(
        session.snapshot.as_ref(),
        user,
        &clock,
        args.high_chaos_days,
    );

    if args.common.json {
        print_json(&StressView::new(user, state))
    } else {
        print!(
            "{}",
            render::stress(Style::detect(), &session.repo, user, state.as_ref())
        );
        Ok(())
    }
}

pub fn run_friday(config: Option<&Path>, args: &CommonArgs) -> Result<()> {
    let session = Session::open(config, args)?;
    let clock = session.engine.clock()?;
    let readiness = session
        .engine
        .friday(session.snapshot.as_ref(), session.user.as_deref(), &clock);

    if args.json {
        print_json(&readiness)
    } else {
        print!("{}", render::friday(Style::detect(), &session.repo, &readiness));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stress_view_not_synced() {
        let view = StressView::new("alice", None);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["stressScore"], -1);
        assert_eq!(json["stressLevel"], "LOW");
        assert!(json["worldState"].is_null());
    }

    #[test]
    fn stress_view_carries_breakdown() {
        let state = WorldState::default().with_deep_work_count(3);
        let view = StressView::new("alice", Some(state));
        assert_eq!(view.stress_score, 20);
        assert_eq!(view.breakdown.map(|b| b.workload), Some(20));
    }
}
