//! Configuration file support for Lift.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/lift/config.toml`.

use crate::catalog::WEIGHT_INCREMENT;
use crate::plates::{BAR_WEIGHT, STANDARD_PLATES};
use crate::schedule::DEFAULT_PROGRAM_DAYS;
use crate::timer::{DEFAULT_REST_SECONDS, MAX_REST_SECONDS, MIN_REST_SECONDS};
use crate::{Error, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub rest_timer: RestTimerConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub plates: PlatesConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Training days of the week
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_program_days")]
    pub days: Vec<Weekday>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            days: default_program_days(),
        }
    }
}

/// Rest timer between sets
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestTimerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_rest_seconds")]
    pub duration_seconds: u32,
}

impl Default for RestTimerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_seconds: default_rest_seconds(),
        }
    }
}

/// Progression parameters configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Added after a fully successful session (kg)
    #[serde(default = "default_weight_increment")]
    pub weight_increment: f64,

    /// Manual adjustment step used by the CLI (kg)
    #[serde(default = "default_weight_step")]
    pub weight_step: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            weight_increment: default_weight_increment(),
            weight_step: default_weight_step(),
        }
    }
}

/// Bar and plates on hand
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlatesConfig {
    #[serde(default = "default_bar_weight")]
    pub bar_weight: f64,

    /// Plate denominations, any order
    #[serde(default = "default_plates")]
    pub available: Vec<f64>,
}

impl Default for PlatesConfig {
    fn default() -> Self {
        Self {
            bar_weight: default_bar_weight(),
            available: default_plates(),
        }
    }
}

impl PlatesConfig {
    /// Available plates, heaviest first
    pub fn sorted_plates(&self) -> Vec<f64> {
        let mut plates = self.available.clone();
        plates.sort_by(|a, b| b.total_cmp(a));
        plates
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("lift")
}

fn default_program_days() -> Vec<Weekday> {
    DEFAULT_PROGRAM_DAYS.to_vec()
}

fn default_true() -> bool {
    true
}

fn default_rest_seconds() -> u32 {
    DEFAULT_REST_SECONDS
}

fn default_weight_increment() -> f64 {
    WEIGHT_INCREMENT
}

fn default_weight_step() -> f64 {
    5.0
}

fn default_bar_weight() -> f64 {
    BAR_WEIGHT
}

fn default_plates() -> Vec<f64> {
    STANDARD_PLATES.to_vec()
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("lift").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check values the rest of the system relies on; returns all problems
    pub fn validate(&self) -> Vec<ConfigProblem> {
        let mut problems = Vec::new();

        if self.schedule.days.is_empty() {
            problems.push(ConfigProblem::error(
                "schedule.days must list at least one weekday",
            ));
        }

        let rest = self.rest_timer.duration_seconds;
        if !(MIN_REST_SECONDS..=MAX_REST_SECONDS).contains(&rest) {
            problems.push(ConfigProblem::warning(format!(
                "rest_timer.duration_seconds {} outside {}-{} (will be clamped)",
                rest, MIN_REST_SECONDS, MAX_REST_SECONDS
            )));
        }

        if !is_positive(self.progression.weight_increment) {
            problems.push(ConfigProblem::error(format!(
                "progression.weight_increment must be positive, got {}",
                self.progression.weight_increment
            )));
        }
        if !is_positive(self.progression.weight_step) {
            problems.push(ConfigProblem::error(format!(
                "progression.weight_step must be positive, got {}",
                self.progression.weight_step
            )));
        }

        if !self.plates.bar_weight.is_finite() || self.plates.bar_weight < 0.0 {
            problems.push(ConfigProblem::error(format!(
                "plates.bar_weight must not be negative, got {}",
                self.plates.bar_weight
            )));
        }
        if self.plates.available.iter().any(|p| !is_positive(*p)) {
            problems.push(ConfigProblem::error(
                "plates.available must only contain positive weights",
            ));
        }

        problems
    }

    /// Like `validate`, but fails on any error-severity problem
    pub fn ensure_valid(&self) -> Result<()> {
        let fatal: Vec<String> = self
            .validate()
            .into_iter()
            .filter(|p| p.severity == Severity::Error)
            .map(|p| p.message)
            .collect();

        if fatal.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(fatal.join("; ")))
        }
    }
}

/// How serious a configuration problem is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// The value is clamped or ignored at use
    Warning,
    /// The value cannot be used
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigProblem {
    pub severity: Severity,
    pub message: String,
}

impl ConfigProblem {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.schedule.days,
            vec![Weekday::Mon, Weekday::Wed, Weekday::Fri]
        );
        assert!(config.rest_timer.enabled);
        assert_eq!(config.rest_timer.duration_seconds, 180);
        assert_eq!(config.progression.weight_increment, 2.5);
        assert_eq!(config.plates.bar_weight, 20.0);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.schedule.days, parsed.schedule.days);
        assert_eq!(config.plates.available, parsed.plates.available);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[schedule]
days = ["tue", "Thursday", "Sat"]

[rest_timer]
duration_seconds = 90
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.schedule.days,
            vec![Weekday::Tue, Weekday::Thu, Weekday::Sat]
        );
        assert_eq!(config.rest_timer.duration_seconds, 90);
        assert!(config.rest_timer.enabled); // default
        assert_eq!(config.progression.weight_increment, 2.5); // default
    }

    #[test]
    fn test_validation_reports_problems() {
        let mut config = Config::default();
        config.schedule.days.clear();
        config.rest_timer.duration_seconds = 5;
        config.progression.weight_increment = 0.0;

        let problems = config.validate();
        assert_eq!(problems.len(), 3, "{:?}", problems);
        let warnings: Vec<_> = problems
            .iter()
            .filter(|p| p.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.starts_with("rest_timer"));

        // Rest duration is clamped at use, so it alone is not fatal
        let err = config.ensure_valid().unwrap_err();
        assert!(err.to_string().contains("schedule.days"));
        assert!(!err.to_string().contains("rest_timer"));
    }

    #[test]
    fn test_sorted_plates() {
        let plates = PlatesConfig {
            bar_weight: 15.0,
            available: vec![5.0, 20.0, 1.25, 10.0],
        };
        assert_eq!(plates.sorted_plates(), vec![20.0, 10.0, 5.0, 1.25]);
    }

    #[test]
    fn test_rest_duration_alone_is_only_a_warning() {
        let mut config = Config::default();
        config.rest_timer.duration_seconds = 10_000;

        let problems = config.validate();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].severity, Severity::Warning);
        assert!(config.ensure_valid().is_ok());
    }

    #[test]
    fn test_bad_plate_set_is_fatal() {
        let mut config = Config::default();
        config.plates.available.push(f64::NAN);

        let problems = config.validate();
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].severity, Severity::Error);
        assert!(config.ensure_valid().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.progression.weight_step = 2.5;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.progression.weight_step, 2.5);
    }
}
