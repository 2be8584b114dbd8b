//! `dayshape` command-line driver.
//!
//! Loads a JSON item snapshot, runs one stage of the engine (or the whole
//! reshape pipeline) and prints the result as text or JSON. All terminal output
//! lives in this crate; the engine only logs.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use dayshape_engine::{EngineConfig, ItemSnapshot, ReshapeEngine};
use std::path::{Path, PathBuf};

pub mod render;
pub mod reshape_cmd;
pub mod score_cmd;

/// Repository name used when neither the flag, the snapshot nor the config names one.
pub const FALLBACK_REPO: &str = "local";

/// Reshape an overloaded day into a 1-3-3 plan
#[derive(Debug, Parser)]
#[command(name = "dayshape", version, about)]
pub struct Cli {
    /// Log more (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Engine config file (default: $DAYSHAPE_CONFIG or ~/.config/dayshape/engine.toml)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full pipeline: day plan, action plan, mutations, scores
    Reshape(ReshapeArgs),
    /// Repository chaos score (0-10)
    Chaos(CommonArgs),
    /// 1-3-3 violations for one user
    Compliance(CommonArgs),
    /// Stress score, level and breakdown for one user
    Stress(StressArgs),
    /// Friday deploy readiness
    Friday(CommonArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// JSON file holding an array of items or a snapshot object; omit for a
    /// never-synced repository
    #[arg(long, value_name = "FILE")]
    pub items: Option<PathBuf>,

    /// User whose items are analysed (default: config defaults.user_id)
    #[arg(long)]
    pub user: Option<String>,

    /// Repository name for reports and mutation plans
    #[arg(long)]
    pub repo: Option<String>,

    /// Pin "now" (RFC 3339)
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<String>,

    /// Local timezone offset in minutes east of UTC
    #[arg(long, value_name = "MINUTES", allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,

    /// Force the Friday scenario
    #[arg(long)]
    pub friday: bool,

    /// Print the serialised report instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct StressArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Consecutive high-chaos days tracked by the caller
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub high_chaos_days: u32,
}

#[derive(Debug, Clone, Args)]
pub struct ReshapeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Plan without emitting mutations
    #[arg(long)]
    pub dry_run: bool,

    /// Consecutive high-chaos days tracked by the caller
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub high_chaos_days: u32,
}

impl Cli {
    /// Default log filter directive for the verbosity flag.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }

    pub fn run(self) -> Result<()> {
        let config = self.config.as_deref();
        match self.command {
            Command::Reshape(args) => reshape_cmd::run(config, &args),
            Command::Chaos(args) => score_cmd::run_chaos(config, &args),
            Command::Compliance(args) => score_cmd::run_compliance(config, &args),
            Command::Stress(args) => score_cmd::run_stress(config, &args),
            Command::Friday(args) => score_cmd::run_friday(config, &args),
        }
    }
}

/// Everything a command needs: a configured engine plus the loaded snapshot.
#[derive(Debug)]
pub struct Session {
    pub engine: ReshapeEngine,
    pub snapshot: Option<ItemSnapshot>,
    pub repo: String,
    pub user: Option<String>,
}

impl Session {
    pub fn open(config: Option<&Path>, args: &CommonArgs) -> Result<Self> {
        let mut cfg = match config {
            Some(path) => EngineConfig::load_from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::load().context("loading engine config")?,
        };
        apply_overrides(&mut cfg, args)?;

        let user = args.user.clone().or_else(|| cfg.defaults.user_id.clone());
        let snapshot = args.items.as_deref().map(load_snapshot).transpose()?;
        let repo = args
            .repo
            .clone()
            .or_else(|| {
                snapshot
                    .as_ref()
                    .map(|s| s.repo.clone())
                    .filter(|r| !r.is_empty())
            })
            .or_else(|| cfg.defaults.repo.clone())
            .unwrap_or_else(|| FALLBACK_REPO.to_string());

        let engine = ReshapeEngine::with_config(cfg).context("invalid engine settings")?;
        Ok(Self {
            engine,
            snapshot,
            repo,
            user,
        })
    }

    pub fn require_user(&self) -> Result<&str> {
        self.user
            .as_deref()
            .context("no user given: pass --user or set defaults.user_id in the config")
    }
}

fn apply_overrides(cfg: &mut EngineConfig, args: &CommonArgs) -> Result<()> {
    if let Some(raw) = &args.now {
        let now = DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("--now is not RFC 3339: {raw}"))?;
        cfg.clock.fixed = Some(
            now.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }
    if let Some(minutes) = args.utc_offset {
        cfg.clock.utc_offset_minutes = minutes;
    }
    if args.friday {
        cfg.friday.forced = true;
    }
    Ok(())
}

fn load_snapshot(path: &Path) -> Result<ItemSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading items from {}", path.display()))?;
    let snapshot = ItemSnapshot::from_json(&raw)
        .with_context(|| format!("decoding items from {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        items = snapshot.items.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Print `value` as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialising report")?;
    println!("{json}");
    Ok(())
}
