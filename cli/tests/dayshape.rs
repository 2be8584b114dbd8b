//! CLI integration tests.
//!
//! Exit codes:
//! - 0: success (including never-synced repositories)
//! - 1: usage or I/O failure
//! - 2: invalid engine settings
//! - 3: item snapshot could not be decoded

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::{Value as JsonValue, json};
use tempfile::TempDir;

const NOW: &str = "2026-01-28T14:00:00Z";

/// `dayshape` with a config path that does not exist, so no user config leaks in.
fn dayshape(home: &Path) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("dayshape")?;
    cmd.env("DAYSHAPE_CONFIG", home.join("missing.toml"));
    cmd.env_remove("RUST_LOG");
    Ok(cmd)
}

fn item(number: u64, labels: &[&str], body: &str, assignee: &str) -> JsonValue {
    json!({
        "number": number,
        "title": format!("item {number}"),
        "body": body,
        "labels": labels.iter().map(|l| json!({"name": l})).collect::<Vec<_>>(),
        "assignees": [{"login": assignee}],
        "state": "OPEN",
    })
}

/// One deep-work item, four quick wins, four maintenance tasks.
fn write_overloaded(dir: &Path) -> Result<PathBuf> {
    let mut items = vec![item(1, &["priority:critical", "architecture"], "auth rewrite", "alice")];
    items.extend((2..=5).map(|n| item(n, &["quick-win"], "fix typo", "alice")));
    items.extend((6..=9).map(|n| item(n, &["maintenance"], "bump deps", "alice")));
    let snapshot = json!({"repo": "acme/widgets", "items": items});

    let path = dir.join("items.json");
    fs::write(&path, serde_json::to_string_pretty(&snapshot)?)?;
    Ok(path)
}

fn stdout_json(output: &std::process::Output) -> Result<JsonValue> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn reshape_json_report() -> Result<()> {
    let home = TempDir::new()?;
    let items = write_overloaded(home.path())?;

    let output = dayshape(home.path())?
        .args(["reshape", "--user", "alice", "--now", NOW, "--json", "--items"])
        .arg(&items)
        .output()?;
    assert!(output.status.success());

    let report = stdout_json(&output)?;
    assert_eq!(report["status"], "ok");
    assert_eq!(report["repo"], "acme/widgets");
    assert_eq!(report["compliance"]["complianceScore"], 55);
    assert_eq!(report["dayPlan"]["quickWins"].as_array().map(Vec::len), Some(3));
    assert!(report["mutationPlan"]["actions"].as_array().is_some_and(|a| !a.is_empty()));
    assert!(report["actions"].as_array().is_some_and(|a| a.len() <= 5));
    Ok(())
}

#[test]
fn reshape_dry_run_emits_no_mutations() -> Result<()> {
    let home = TempDir::new()?;
    let items = write_overloaded(home.path())?;

    let output = dayshape(home.path())?
        .args(["reshape", "--user", "alice", "--now", NOW, "--json", "--dry-run", "--items"])
        .arg(&items)
        .output()?;
    assert!(output.status.success());

    let report = stdout_json(&output)?;
    assert_eq!(report["dryRun"], true);
    assert_eq!(report["mutationPlan"]["actions"], json!([]));
    Ok(())
}

#[test]
fn reshape_text_output() -> Result<()> {
    let home = TempDir::new()?;
    let items = write_overloaded(home.path())?;

    dayshape(home.path())?
        .args(["reshape", "--user", "alice", "--now", NOW, "--items"])
        .arg(&items)
        .assert()
        .success()
        .stdout(predicate::str::contains("Reshape for alice @ acme/widgets"))
        .stdout(predicate::str::contains("Day plan"))
        .stdout(predicate::str::contains("Mutations"));
    Ok(())
}

#[test]
fn missing_items_reports_not_synced() -> Result<()> {
    let home = TempDir::new()?;

    let output = dayshape(home.path())?
        .args(["reshape", "--user", "alice", "--repo", "acme/widgets", "--json"])
        .output()?;
    assert!(output.status.success());
    let report = stdout_json(&output)?;
    assert_eq!(report["status"], "not_synced");
    assert_eq!(report["stressScore"], -1);

    dayshape(home.path())?
        .args(["chaos", "--repo", "acme/widgets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not synced"));
    Ok(())
}

#[test]
fn compliance_lists_violations() -> Result<()> {
    let home = TempDir::new()?;
    let items = write_overloaded(home.path())?;

    dayshape(home.path())?
        .args(["compliance", "--user", "alice", "--now", NOW, "--items"])
        .arg(&items)
        .assert()
        .success()
        .stdout(predicate::str::contains("not compliant (score 55)"))
        .stdout(predicate::str::contains("You have 4 quick wins"));
    Ok(())
}

#[test]
fn chaos_and_friday_json() -> Result<()> {
    let home = TempDir::new()?;
    let items = write_overloaded(home.path())?;

    let chaos = dayshape(home.path())?
        .args(["chaos", "--now", NOW, "--json", "--items"])
        .arg(&items)
        .output()?;
    assert!(chaos.status.success());
    assert_eq!(stdout_json(&chaos)?["score"], 0.0);

    let friday = dayshape(home.path())?
        .args(["friday", "--now", NOW, "--json", "--items"])
        .arg(&items)
        .output()?;
    assert!(friday.status.success());
    let readiness = stdout_json(&friday)?;
    assert_eq!(readiness["score"], 100);
    assert_eq!(readiness["status"], "READY");
    Ok(())
}

#[test]
fn stress_with_high_chaos_days() -> Result<()> {
    let home = TempDir::new()?;
    let items = write_overloaded(home.path())?;

    let output = dayshape(home.path())?
        .args(["stress", "--user", "alice", "--now", NOW, "--json", "--high-chaos-days", "3", "--items"])
        .arg(&items)
        .output()?;
    assert!(output.status.success());
    let view = stdout_json(&output)?;
    // workload 8 + sustained 15
    assert_eq!(view["stressScore"], 23);
    assert_eq!(view["breakdown"]["sustained"], 15);
    Ok(())
}

#[test]
fn config_file_supplies_defaults() -> Result<()> {
    let home = TempDir::new()?;
    let items = write_overloaded(home.path())?;
    let config = home.path().join("engine.toml");
    fs::write(
        &config,
        format!("[clock]\nfixed = \"{NOW}\"\n\n[defaults]\nuser_id = \"alice\"\n"),
    )?;

    let output = dayshape(home.path())?
        .arg("--config")
        .arg(&config)
        .args(["compliance", "--json", "--items"])
        .arg(&items)
        .output()?;
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)?["userId"], "alice");
    Ok(())
}

#[test]
fn missing_user_fails() -> Result<()> {
    let home = TempDir::new()?;
    let items = write_overloaded(home.path())?;

    dayshape(home.path())?
        .args(["compliance", "--items"])
        .arg(&items)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no user given"));
    Ok(())
}

#[test]
fn invalid_settings_exit_two() -> Result<()> {
    let home = TempDir::new()?;

    dayshape(home.path())?
        .args(["chaos", "--utc-offset", "5000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("utc_offset_minutes"));

    dayshape(home.path())?
        .args(["chaos", "--utc-offset", &i32::MIN.to_string()])
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn malformed_snapshot_exits_three() -> Result<()> {
    let home = TempDir::new()?;
    let bad = home.path().join("bad.json");
    fs::write(&bad, "{\"items\": 42}")?;

    dayshape(home.path())?
        .args(["chaos", "--items"])
        .arg(&bad)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("failed to decode item snapshot"));
    Ok(())
}
