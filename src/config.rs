// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::calendar::{DEFAULT_SEMESTER_WEEKS, Semester};
use crate::context::AppContext;
use crate::model::GroupRange;
use crate::schedule::{BreakComparison, BreakPolicy};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_manifest() -> PathBuf {
    PathBuf::from("rozvrhy/zoznam.json")
}

fn default_break_threshold() -> u32 {
    30
}

fn default_semester_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 22).unwrap_or_default()
}

fn default_semester_weeks() -> u32 {
    DEFAULT_SEMESTER_WEEKS
}

fn default_max_group() -> u8 {
    10
}

fn default_max_concurrent_loads() -> usize {
    4
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    #[serde(default)]
    pub default_group: Option<u8>,

    #[serde(default = "default_break_threshold")]
    pub break_threshold_mins: u32,
    #[serde(default)]
    pub break_comparison: BreakComparison,

    #[serde(default = "default_semester_start")]
    pub semester_start: NaiveDate,
    #[serde(default = "default_semester_weeks")]
    pub semester_weeks: u32,

    // Upper bound for group numbers read from notes.
    #[serde(default = "default_max_group")]
    pub max_group: u8,

    #[serde(default = "default_max_concurrent_loads")]
    pub max_concurrent_loads: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            default_group: None,
            break_threshold_mins: default_break_threshold(),
            break_comparison: BreakComparison::default(),
            semester_start: default_semester_start(),
            semester_weeks: default_semester_weeks(),
            max_group: default_max_group(),
            max_concurrent_loads: default_max_concurrent_loads(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load the configuration from disk using an explicit context.
    /// A missing file yields the defaults; a broken one is an error.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str)
            .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
        Ok(())
    }

    pub fn break_policy(&self) -> BreakPolicy {
        BreakPolicy {
            min_minutes: self.break_threshold_mins,
            comparison: self.break_comparison,
        }
    }

    pub fn semester(&self) -> Semester {
        Semester::new(self.semester_start, self.semester_weeks)
    }

    pub fn group_range(&self) -> GroupRange {
        GroupRange::new(self.max_group)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.break_policy(), BreakPolicy::default());
    }

    #[test]
    fn test_partial_file() {
        let cfg = Config::parse(
            r#"
            default_group = 3
            break_comparison = "exclusive"
            semester_start = "2026-02-16"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.default_group, Some(3));
        assert_eq!(cfg.break_comparison, BreakComparison::Exclusive);
        assert_eq!(cfg.semester().start, NaiveDate::from_ymd_opt(2026, 2, 16).unwrap());
        assert_eq!(cfg.semester_weeks, 13);
        assert_eq!(cfg.break_threshold_mins, 30);
    }

    #[test]
    fn test_bad_value_is_error() {
        assert!(Config::parse(r#"break_comparison = "sometimes""#).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults_and_roundtrips() {
        let ctx = TestContext::new();
        assert_eq!(Config::load(&ctx).unwrap(), Config::default());

        let cfg = Config {
            default_group: Some(2),
            max_group: 8,
            ..Config::default()
        };
        cfg.save(&ctx).unwrap();
        assert_eq!(Config::load(&ctx).unwrap(), cfg);
    }

    #[test]
    fn test_log_level() {
        let cfg = Config {
            log_level: "debug".to_string(),
            ..Config::default()
        };
        assert_eq!(cfg.log_level(), log::LevelFilter::Debug);
        let bad = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(bad.log_level(), log::LevelFilter::Warn);
    }
}
