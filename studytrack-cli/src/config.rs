use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use studytrack_core::{ReminderPolicy, Settings};

use crate::state::{ensure_studytrack_home, studytrack_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub prioritization: PrioritizationSection,
    #[serde(default)]
    pub profile: ProfileSection,
    #[serde(default)]
    pub grades: GradesSection,
    #[serde(default)]
    pub reminders: RemindersSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizationSection {
    /// Sort assignment lists by priority score; off keeps store order.
    pub smart: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSection {
    /// IANA timezone due dates are written in.
    pub timezone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradesSection {
    /// Default target for `predict`.
    pub target: f64,
    pub decimals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemindersSection {
    pub lead_hours: i64,
    pub max_per_assignment: usize,
}

impl Default for PrioritizationSection {
    fn default() -> Self {
        Self { smart: true }
    }
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            timezone: studytrack_core::settings::DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl Default for GradesSection {
    fn default() -> Self {
        Self {
            target: 90.0,
            decimals: 1,
        }
    }
}

impl Default for RemindersSection {
    fn default() -> Self {
        let policy = ReminderPolicy::default();
        Self {
            lead_hours: policy.lead_hours,
            max_per_assignment: policy.max_per_assignment,
        }
    }
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings::default()
            .with_smart_prioritization(self.prioritization.smart)
            .with_timezone(self.profile.timezone.clone())
    }

    pub fn reminder_policy(&self) -> ReminderPolicy {
        ReminderPolicy {
            lead_hours: self.reminders.lead_hours,
            max_per_assignment: self.reminders.max_per_assignment,
            ..ReminderPolicy::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(studytrack_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    if cfg.profile.timezone.parse::<chrono_tz::Tz>().is_err() {
        tracing::warn!(
            timezone = %cfg.profile.timezone,
            "unknown timezone in config; due dates will not parse"
        );
    }
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_studytrack_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[prioritization]\nsmart = false\n").unwrap();
        assert!(!cfg.prioritization.smart);
        assert_eq!(cfg.profile.timezone, "America/Chicago");
        assert_eq!(cfg.grades.target, 90.0);
        assert!(!cfg.settings().smart_prioritization);
    }

    #[test]
    fn test_roundtrip_default() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, Config::default());
        assert_eq!(back.reminder_policy(), ReminderPolicy::default());
    }
}
