//! Engine configuration loading
//!
//! Loads configuration from `~/.config/dayshape/engine.toml` (or `DAYSHAPE_CONFIG` env).
//! Every field has a default, so a missing file is not an error.

use crate::errors::{EngineError, Result};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Plans longer than this are allowed but rarely useful to a human reader.
pub const RECOMMENDED_MAX_ACTION_BUDGET: usize = 5;

const MAX_UTC_OFFSET_MINUTES: u32 = 18 * 60;

/// Root configuration for the reshape engine
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    /// Friday scenario settings
    #[serde(default)]
    pub friday: FridayConfig,

    /// Clock settings (timezone, pinned "now")
    #[serde(default)]
    pub clock: ClockConfig,

    /// Planner settings
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Defaults for CLI arguments
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Friday scenario configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FridayConfig {
    /// Treat every day as Friday-ish for the deploy goal
    #[serde(default)]
    pub forced: bool,
}

/// Clock configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClockConfig {
    /// Local timezone offset used for hour/weekday checks
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Pinned "now" (RFC 3339), for reproducible runs
    #[serde(default)]
    pub fixed: Option<String>,
}

impl ClockConfig {
    /// Parsed local offset
    pub fn offset(&self) -> Result<FixedOffset> {
        let seconds = self.utc_offset_minutes.checked_mul(60);
        seconds.and_then(FixedOffset::east_opt).ok_or_else(|| {
            EngineError::config(format!(
                "clock.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }

    /// Parsed pinned instant, if any
    pub fn fixed_now(&self) -> Result<Option<DateTime<Utc>>> {
        self.fixed
            .as_deref()
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| {
                        EngineError::config_with_source(
                            format!("clock.fixed is not RFC 3339: {raw}"),
                            e,
                        )
                    })
            })
            .transpose()
    }
}

/// Planner configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PlannerConfig {
    /// Hard cap on the number of actions in one plan
    #[serde(default = "default_action_budget")]
    pub action_budget: usize,
}

fn default_action_budget() -> usize {
    RECOMMENDED_MAX_ACTION_BUDGET
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            action_budget: default_action_budget(),
        }
    }
}

/// Defaults applied when the CLI omits an argument
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub repo: Option<String>,
}

impl EngineConfig {
    /// Environment variable for config path override
    pub const ENV_CONFIG_PATH: &'static str = "DAYSHAPE_CONFIG";

    /// Default config filename
    pub const DEFAULT_CONFIG_FILENAME: &'static str = "engine.toml";

    /// Load configuration from file
    ///
    /// Resolution order:
    /// 1. `DAYSHAPE_CONFIG` environment variable
    /// 2. `~/.config/dayshape/engine.toml`
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::resolve_config_path();

        if !path.exists() {
            tracing::debug!(
                path = %path.display(),
                "engine config not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            EngineError::config_with_source(
                format!("failed to read config at {}", path.display()),
                e,
            )
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: EngineConfig = toml::from_str(contents)
            .map_err(|e| EngineError::config_with_source("failed to parse config", e))?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn resolve_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::ENV_CONFIG_PATH) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .map(|h| {
                h.join(".config")
                    .join("dayshape")
                    .join(Self::DEFAULT_CONFIG_FILENAME)
            })
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.planner.action_budget == 0 {
            return Err(EngineError::config("planner.action_budget must be >= 1"));
        }

        if self.planner.action_budget > RECOMMENDED_MAX_ACTION_BUDGET {
            tracing::warn!(
                action_budget = self.planner.action_budget,
                recommended = RECOMMENDED_MAX_ACTION_BUDGET,
                "action budget above recommended ceiling, plans may get long"
            );
        }

        if self.clock.utc_offset_minutes.unsigned_abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(EngineError::config(format!(
                "clock.utc_offset_minutes must be within +/-{MAX_UTC_OFFSET_MINUTES}, got {}",
                self.clock.utc_offset_minutes
            )));
        }

        self.clock.fixed_now()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert!(!cfg.friday.forced);
        assert_eq!(cfg.planner.action_budget, 5);
        assert_eq!(cfg.clock.utc_offset_minutes, 0);
        assert!(cfg.clock.fixed.is_none());
        assert!(cfg.defaults.user_id.is_none());
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let cfg = EngineConfig::parse("").expect("should parse");
        assert_eq!(cfg.planner.action_budget, 5);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [friday]
            forced = true

            [clock]
            utc_offset_minutes = -300
            fixed = "2026-01-30T19:00:00Z"

            [planner]
            action_budget = 3

            [defaults]
            user_id = "octocat"
            repo = "acme/widgets"
        "#;

        let cfg = EngineConfig::parse(toml).expect("should parse");
        assert!(cfg.friday.forced);
        assert_eq!(cfg.planner.action_budget, 3);
        assert_eq!(cfg.defaults.user_id.as_deref(), Some("octocat"));
        assert_eq!(cfg.defaults.repo.as_deref(), Some("acme/widgets"));
        assert_eq!(cfg.clock.offset().expect("offset").local_minus_utc(), -300 * 60);
        let fixed = cfg.clock.fixed_now().expect("fixed").expect("present");
        assert_eq!(fixed.to_rfc3339(), "2026-01-30T19:00:00+00:00");
    }

    #[test]
    fn test_zero_budget_rejected() {
        let err = EngineConfig::parse("[planner]\naction_budget = 0\n").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ConfigError);
    }

    #[test]
    fn test_offset_out_of_range_rejected() {
        let err = EngineConfig::parse("[clock]\nutc_offset_minutes = 1200\n").unwrap_err();
        assert!(err.to_string().contains("utc_offset_minutes"));
    }

    #[test]
    fn test_extreme_offsets_rejected() {
        for minutes in [i32::MIN, i32::MAX, -1081] {
            let mut cfg = EngineConfig::default();
            cfg.clock.utc_offset_minutes = minutes;
            let err = cfg.validate().unwrap_err();
            assert_eq!(err.category(), ErrorCategory::ConfigError);
        }

        let mut cfg = EngineConfig::default();
        cfg.clock.utc_offset_minutes = i32::MIN;
        assert!(cfg.clock.offset().is_err());
    }

    #[test]
    fn test_bad_fixed_clock_rejected() {
        let err = EngineConfig::parse("[clock]\nfixed = \"yesterday\"\n").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ConfigError);
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("engine.toml");
        std::fs::write(&path, "[friday]\nforced = true\n").expect("write");

        let cfg = EngineConfig::load_from_path(&path).expect("load");
        assert!(cfg.friday.forced);
    }

    #[test]
    fn test_load_from_missing_path_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = EngineConfig::load_from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ConfigError);
    }
}
