//! End-to-end scenarios over the public engine API.
//!
//! Each test builds a small snapshot by hand, pins the clock, and checks the
//! numbers a dashboard would show.

use chrono::{DateTime, Duration, TimeZone, Utc};
use dayshape_engine::goap::ActionPolicy;
use dayshape_engine::item::Label;
use dayshape_engine::{
    ChaosBucket, Classification, Clock, EngineConfig, FridayStatus, ItemSnapshot, Mutation,
    MutationPlan, PlanOutcome, Planner, ReshapeEngine, ReshapeRequest, ViolationType, WorkItem,
    WorldState, chaos, compliance, labels,
};
use pretty_assertions::assert_eq;

const USER: &str = "alice";
const REPO: &str = "acme/widgets";

// Wednesday 2026-01-28 14:00 UTC
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 28, 14, 0, 0).unwrap()
}

fn clock() -> Clock {
    Clock::fixed_utc(now())
}

fn mine(number: u64, labels: &[&str], body: &str) -> WorkItem {
    WorkItem::new(number, format!("item {number}"))
        .with_body(body)
        .with_labels(labels.iter().copied())
        .with_assignee(USER)
}

// ─────────────────────────────────────────────────────────────────────────────
// Compliance
// ─────────────────────────────────────────────────────────────────────────────

fn one_four_four() -> Vec<WorkItem> {
    let mut items = vec![mine(1, &["priority:critical", "architecture"], "rebuild auth")];
    items.extend((2..=5).map(|n| mine(n, &["quick-win"], "fix the typo")));
    items.extend((6..=9).map(|n| mine(n, &["maintenance"], "bump deps")));
    items
}

#[test]
fn one_four_four_overloads_quick_wins_and_maintenance() {
    let clock = clock();
    let items = one_four_four();
    let report = compliance::analyze(&items, USER, &clock);

    assert_eq!(report.bucket_count(Classification::DeepWork), 1);
    assert_eq!(report.bucket_count(Classification::QuickWin), 4);
    assert_eq!(report.bucket_count(Classification::Maintenance), 4);
    assert!(!report.is_compliant);

    let kinds: Vec<ViolationType> = report.violations.iter().map(|v| v.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ViolationType::QuickWinOverload,
            ViolationType::MaintenanceOverload,
            ViolationType::TotalOverload,
        ]
    );
    assert_eq!(report.violations[0].affected_items, vec![5]);
    assert_eq!(report.violations[1].affected_items, vec![9]);
    // 100 - 10 - 10 - 25 (nine active items also exceed the seven-slot ceiling)
    assert_eq!(report.compliance_score, 55);

    // The planning state scores bucket overflow alone.
    let chaos = chaos::calculate(&items, &clock);
    let state = WorldState::from(&items, USER, &chaos, &report, &clock).recalculate_compliance();
    assert!(!state.is_compliant);
    assert_eq!(state.compliance_score, 80);
}

#[test]
fn nothing_assigned_is_compliant_and_stress_is_chaos_only() {
    let clock = clock();
    let items = vec![
        WorkItem::new(1, "theirs").with_body("x").with_assignee("bob"),
        WorkItem::new(2, "nobody's"),
    ];
    let report = compliance::analyze(&items, USER, &clock);
    assert!(report.is_compliant);
    assert!(report.violations.is_empty());
    assert_eq!(report.compliance_score, 100);

    let chaos = chaos::calculate(&items, &clock);
    let state = WorldState::from(&items, USER, &chaos, &report, &clock);
    assert_eq!(state.total_assigned, 0);
    assert_eq!(state.stress_score(), state.chaos_bucket.ordinal() * 10);
}

// ─────────────────────────────────────────────────────────────────────────────
// Chaos
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_chaos_signal_fires() {
    let clock = clock();
    let mut items = Vec::new();

    // three with no body
    items.extend((1..=3).map(|n| WorkItem::new(n, "??").with_assignee(USER).with_labels([format!("area-{n}")])));
    // three urgent, two days old
    items.extend((4..=6).map(|n| {
        mine(n, &["urgent"], "prod is down")
            .with_created_at(now() - Duration::days(2))
            .with_labels([format!("area-{n}")])
    }));
    // seven updated in the last half hour
    items.extend((7..=13).map(|n| {
        mine(n, &[], "busy")
            .with_updated_at(now() - Duration::minutes(30))
            .with_labels([format!("area-{n}")])
    }));
    // one late-night update, Tuesday 22:00
    items.push(
        mine(14, &["night"], "late")
            .with_updated_at(Utc.with_ymd_and_hms(2026, 1, 27, 22, 0, 0).unwrap()),
    );

    let metrics = chaos::calculate(&items, &clock);
    assert_eq!(metrics.mystery_meat_count, 3);
    assert_eq!(metrics.unresolved_urgent, 3);
    assert_eq!(metrics.items_touched_recently, 7);
    assert!(metrics.after_hours_signal);
    // area-1..area-13, urgent, night
    assert_eq!(metrics.distinct_label_count, 15);
    assert_eq!(metrics.score, 10.0);
    assert_eq!(ChaosBucket::from_score(metrics.score), ChaosBucket::Critical);
}

#[test]
fn empty_repository_scores_zero_not_sentinel() {
    let metrics = chaos::calculate(&[], &clock());
    assert_eq!(metrics.score, 0.0);
    assert!(!metrics.is_not_synced());
}

// ─────────────────────────────────────────────────────────────────────────────
// Planner
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn burnout_comes_first_and_cheapest_relief_wins() {
    let clock = clock();
    let items = vec![mine(1, &["architecture"], "split the monolith")];
    let initial = WorldState {
        deep_work_count: 2,
        total_assigned: 10,
        chaos_bucket: ChaosBucket::Critical,
        issues_updated_after_hours: 2,
        mystery_meat_count: 5,
        unclear_quick_wins: 3,
        ..WorldState::default()
    }
    .recalculate_compliance();
    // 12 + 10 + 30 + 10 + 10 + 3
    assert_eq!(initial.stress_score(), 75);

    let plan = Planner::default().plan(&initial, &items, USER, &clock);
    let first = &plan.steps[0];
    assert_eq!(first.goal, "PreventBurnout");
    assert_eq!(first.action_id, "DelegateIssue#1");
    assert_eq!(first.cost, 3);
    assert!(first.stress_after < 75);
}

#[test]
fn plans_are_bounded_and_unique() {
    let clock = clock();
    let items: Vec<WorkItem> = (1..=12)
        .map(|n| match n % 3 {
            0 => mine(n, &["architecture"], "big"),
            1 => mine(n, &["quick-win"], "small"),
            _ => WorkItem::new(n, "vague").with_labels(["cleanup"]).with_assignee(USER),
        })
        .collect();
    let engine = ReshapeEngine::with_config(EngineConfig::default()).unwrap();
    let state = engine
        .world_state(Some(&ItemSnapshot::new(REPO, items.clone())), USER, &clock, 2)
        .unwrap();

    let plan = engine.planner().plan(&state, &items, USER, &clock);
    assert!(plan.len() <= 5);
    let mut ids: Vec<String> = plan.actions.iter().map(ActionPolicy::id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), plan.len());
    if plan.len() == 5 {
        assert_ne!(plan.outcome, PlanOutcome::NoProgress);
    }
}

/// Apply label mutations the way an executor would. Deferred and delegated
/// items leave the user's plate for today.
fn execute(items: &[WorkItem], plan: &MutationPlan) -> Vec<WorkItem> {
    let mut items = items.to_vec();
    for mutation in &plan.actions {
        let Some(item) = items.iter_mut().find(|i| i.number == mutation.item_number()) else {
            continue;
        };
        let mut names: Vec<String> = item.label_names().map(str::to_string).collect();
        match mutation {
            Mutation::AddLabels { labels, .. } => names.extend(labels.iter().cloned()),
            Mutation::RemoveLabels { labels, .. } => names.retain(|n| !labels.contains(n)),
            Mutation::Comment { .. } => {}
        }
        item.labels = names.into_iter().map(|name| Label { name }).collect();
    }
    items
        .into_iter()
        .filter(|i| !i.has_any_label(&[labels::DEFERRED, labels::DELEGATED]))
        .collect()
}

fn state_of(engine: &ReshapeEngine, items: &[WorkItem], clock: &Clock) -> WorldState {
    engine
        .world_state(Some(&ItemSnapshot::new(REPO, items.to_vec())), USER, clock, 0)
        .unwrap()
}

#[test]
fn executed_mutations_reach_the_predicted_stress() {
    let clock = clock();
    let engine = ReshapeEngine::with_config(EngineConfig::default()).unwrap();

    // two deep-work items: defer one; four: nothing brings it down to one in a step
    for (deep, deep_after) in [(2, 1), (4, 4)] {
        let items: Vec<WorkItem> = (1..=deep)
            .map(|n| mine(n, &["architecture"], "details"))
            .collect();
        let before = state_of(&engine, &items, &clock);
        assert_eq!(before.deep_work_count, deep as u32);

        let plan = engine.planner().plan(&before, &items, USER, &clock);
        assert!(
            plan.actions
                .iter()
                .all(|a| !a.id().starts_with("MarkDeepWorkFocus")),
            "{deep} deep-work items"
        );

        let after = state_of(&engine, &execute(&items, &plan.to_mutation_plan(REPO)), &clock);
        assert_eq!(after.stress_score(), plan.final_stress, "{deep} deep-work items");
        assert_eq!(after.deep_work_count, deep_after);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Full pipeline
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn reshape_is_deterministic() {
    let clock = clock();
    let engine = ReshapeEngine::with_config(EngineConfig::default()).unwrap();
    let snapshot = ItemSnapshot::new(REPO, one_four_four());
    let request = ReshapeRequest::new(USER);

    let first = engine.reshape(REPO, Some(&snapshot), &request, &clock);
    let second = engine.reshape(REPO, Some(&snapshot), &request, &clock);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn reshape_report_shape() {
    let clock = clock();
    let engine = ReshapeEngine::with_config(EngineConfig::default()).unwrap();
    let snapshot = ItemSnapshot::new(REPO, one_four_four());
    let report = engine.reshape(REPO, Some(&snapshot), &ReshapeRequest::new(USER), &clock);

    let day_plan = report.day_plan.as_ref().unwrap();
    assert_eq!(day_plan.deep_work.as_ref().map(|i| i.number), Some(1));
    assert_eq!(day_plan.quick_wins.len(), 3);
    assert_eq!(day_plan.maintenance.len(), 3);
    assert_eq!(day_plan.deferred.len(), 2);

    let mutated: Vec<u64> = report
        .mutation_plan
        .actions
        .iter()
        .map(|m| m.item_number())
        .collect();
    assert!(mutated.iter().all(|n| (1..=9).contains(n)));
    assert_eq!(report.actions.len(), report.steps.len());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["mutationPlan"]["repo"], REPO);
    assert_eq!(json["schemaVersion"], 1);
}

#[test]
fn friday_readiness_from_snapshot() {
    let clock = clock();
    let engine = ReshapeEngine::with_config(EngineConfig::default()).unwrap();
    let urgent = mine(1, &["urgent"], "fire").with_created_at(now() - Duration::days(3));
    let snapshot = ItemSnapshot::new(REPO, vec![urgent]);

    let anonymous = engine.friday(Some(&snapshot), None, &clock);
    assert_eq!(anonymous.score, 85);
    assert_eq!(anonymous.status, FridayStatus::Ready);

    // one item with no deep work: INFO violation makes alice non-compliant
    let personal = engine.friday(Some(&snapshot), Some(USER), &clock);
    assert_eq!(personal.score, 70);
    assert_eq!(personal.status, FridayStatus::Caution);

    assert_eq!(engine.friday(None, Some(USER), &clock).status, FridayStatus::NotSynced);
}
