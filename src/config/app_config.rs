//! Application configuration loaded from TOML.
//!
//! Every struct implements `Default` with the values the form has always
//! used, so the service runs with no config file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;
use crate::encoder::UserSelection;
use crate::regional::{default_state_salaries, StateSalary};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `AppConfig::load()` which searches:
/// 1. `$SALARY_CONFIG` env var
/// 2. `./salary_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model artifact locations
    #[serde(default)]
    pub model: ModelConfig,

    /// Accepted ranges for form inputs
    #[serde(default)]
    pub inputs: InputLimits,

    /// Growth projection page bounds and defaults
    #[serde(default)]
    pub growth: GrowthConfig,

    /// State salary sample for the map page
    #[serde(default)]
    pub regional: RegionalConfig,
}

impl AppConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SALARY_CONFIG` environment variable
    /// 2. `./salary_config.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// A missing file falls through to the next step. A file that exists but
    /// fails to parse or validate is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let env_path = std::env::var(defaults::CONFIG_PATH_ENV).ok().map(PathBuf::from);
        Self::load_from_search(env_path.as_deref(), Path::new(defaults::CONFIG_FILE_NAME))
    }

    /// Search `env_path`, then `local`, then fall back to defaults.
    pub fn load_from_search(env_path: Option<&Path>, local: &Path) -> Result<Self, ConfigError> {
        // 1. Check env var
        if let Some(p) = env_path {
            if p.exists() {
                let config = Self::load_from_file(p)?;
                info!(path = %p.display(), "Loaded config from SALARY_CONFIG");
                return Ok(config);
            }
            warn!(path = %p.display(), "SALARY_CONFIG points to non-existent file, falling back");
        }

        // 2. Check ./salary_config.toml
        if local.exists() {
            let config = Self::load_from_file(local)?;
            info!(path = %local.display(), "Loaded local config");
            return Ok(config);
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", defaults::CONFIG_FILE_NAME);
        Ok(Self::default())
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings; they never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Bind address, honouring `$SALARY_SERVER_ADDR`.
    pub fn server_addr(&self) -> String {
        std::env::var(defaults::SERVER_ADDR_ENV).unwrap_or_else(|_| self.server.addr.clone())
    }

    /// Validate ranges and orderings.
    ///
    /// Impossible values are errors; suspicious ones are logged as warnings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (errors, warnings) = super::validation::validate_ranges(self);
        for w in &warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({path}): {1}", path = .0.display())]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({path}): {1}", path = .0.display())]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Server
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `SALARY_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Serialized regressor (JSON)
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// Ordered feature-name list the regressor was trained on (JSON array)
    #[serde(default = "default_features_path")]
    pub features_path: PathBuf,
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from(defaults::MODEL_ARTIFACT_PATH)
}
fn default_features_path() -> PathBuf {
    PathBuf::from(defaults::MODEL_FEATURES_PATH)
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
            features_path: default_features_path(),
        }
    }
}

// ============================================================================
// Input Limits
// ============================================================================

/// Ranges the form widgets allow. Requests outside them are rejected by the
/// API before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputLimits {
    #[serde(default = "default_rating_min")]
    pub rating_min: f64,
    #[serde(default = "default_rating_max")]
    pub rating_max: f64,
    #[serde(default = "default_age_min")]
    pub company_age_min: u32,
    #[serde(default = "default_age_max")]
    pub company_age_max: u32,
}

fn default_rating_min() -> f64 { defaults::RATING_MIN }
fn default_rating_max() -> f64 { defaults::RATING_MAX }
fn default_age_min() -> u32 { defaults::COMPANY_AGE_MIN }
fn default_age_max() -> u32 { defaults::COMPANY_AGE_MAX }

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            rating_min: default_rating_min(),
            rating_max: default_rating_max(),
            company_age_min: default_age_min(),
            company_age_max: default_age_max(),
        }
    }
}

impl InputLimits {
    /// Check the scalar fields of a selection. Categories are the encoder's job.
    pub fn check(&self, selection: &UserSelection) -> Result<(), String> {
        let rating = selection.rating;
        if !rating.is_finite() || rating < self.rating_min || rating > self.rating_max {
            return Err(format!(
                "rating {rating} is outside {:.1}-{:.1}",
                self.rating_min, self.rating_max
            ));
        }
        let age = selection.company_age;
        if age < self.company_age_min || age > self.company_age_max {
            return Err(format!(
                "company_age {age} is outside {}-{}",
                self.company_age_min, self.company_age_max
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Growth
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthConfig {
    #[serde(default = "default_min_years")]
    pub min_years: u32,
    #[serde(default = "default_max_years")]
    pub max_years: u32,
    #[serde(default = "default_years")]
    pub default_years: u32,
    #[serde(default = "default_min_rate")]
    pub min_rate_percent: f64,
    #[serde(default = "default_max_rate")]
    pub max_rate_percent: f64,
    #[serde(default = "default_rate")]
    pub default_rate_percent: f64,
    /// Salary pre-filled on the growth page
    #[serde(default = "default_base")]
    pub default_base: f64,
}

fn default_min_years() -> u32 { defaults::GROWTH_MIN_YEARS }
fn default_max_years() -> u32 { defaults::GROWTH_MAX_YEARS }
fn default_years() -> u32 { defaults::GROWTH_DEFAULT_YEARS }
fn default_min_rate() -> f64 { defaults::GROWTH_MIN_RATE_PERCENT }
fn default_max_rate() -> f64 { defaults::GROWTH_MAX_RATE_PERCENT }
fn default_rate() -> f64 { defaults::GROWTH_DEFAULT_RATE_PERCENT }
fn default_base() -> f64 { defaults::GROWTH_DEFAULT_BASE }

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            min_years: default_min_years(),
            max_years: default_max_years(),
            default_years: default_years(),
            min_rate_percent: default_min_rate(),
            max_rate_percent: default_max_rate(),
            default_rate_percent: default_rate(),
            default_base: default_base(),
        }
    }
}

impl GrowthConfig {
    /// Check a projection request against the page bounds.
    pub fn check(&self, base: f64, rate_percent: f64, years: u32) -> Result<(), String> {
        if !base.is_finite() || base < 0.0 {
            return Err(format!("base salary {base} must be a non-negative number"));
        }
        if base > defaults::GROWTH_MAX_BASE {
            return Err(format!(
                "base salary {base} exceeds the {} limit",
                defaults::GROWTH_MAX_BASE
            ));
        }
        if !rate_percent.is_finite()
            || rate_percent < self.min_rate_percent
            || rate_percent > self.max_rate_percent
        {
            return Err(format!(
                "growth rate {rate_percent}% is outside {}-{}%",
                self.min_rate_percent, self.max_rate_percent
            ));
        }
        if years < self.min_years || years > self.max_years {
            return Err(format!(
                "years {years} is outside {}-{}",
                self.min_years, self.max_years
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Regional
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalConfig {
    #[serde(default = "default_state_salaries")]
    pub states: Vec<StateSalary>,
}

impl Default for RegionalConfig {
    fn default() -> Self {
        Self {
            states: default_state_salaries(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::ToolFlags;

    fn selection(rating: f64, age: u32) -> UserSelection {
        UserSelection {
            job_title: "Data Scientist".to_string(),
            job_state: "CA".to_string(),
            rating,
            company_age: age,
            tools: ToolFlags::default(),
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
[growth]
max_years = 30
"#,
        )
        .unwrap();
        assert_eq!(config.growth.max_years, 30);
        assert_eq!(config.growth.default_years, defaults::GROWTH_DEFAULT_YEARS);
        assert_eq!(config.server.addr, defaults::SERVER_ADDR);
    }

    #[test]
    fn test_regional_states_override() {
        let config = AppConfig::from_toml_str(
            r#"
[[regional.states]]
state = "WA"
average_salary = 140000.0
"#,
        )
        .unwrap();
        assert_eq!(config.regional.states, vec![StateSalary::new("WA", 140_000.0)]);
    }

    #[test]
    fn test_validation_error_is_reported() {
        let err = AppConfig::from_toml_str(
            r#"
[inputs]
rating_min = 4.0
rating_max = 1.0
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("rating_min"));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\naddr = 1").unwrap();
        let err = AppConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_input_limits() {
        let limits = InputLimits::default();
        assert!(limits.check(&selection(3.5, 10)).is_ok());
        assert!(limits.check(&selection(0.0, 0)).is_ok());
        assert!(limits.check(&selection(5.0, 150)).is_ok());
        assert!(limits.check(&selection(5.1, 10)).is_err());
        assert!(limits.check(&selection(-0.1, 10)).is_err());
        assert!(limits.check(&selection(f64::NAN, 10)).is_err());
        assert!(limits.check(&selection(3.0, 151)).unwrap_err().contains("company_age"));
    }

    #[test]
    fn test_growth_limits() {
        let growth = GrowthConfig::default();
        assert!(growth.check(100.0, 5.0, 5).is_ok());
        assert!(growth.check(0.0, 1.0, 1).is_ok());
        assert!(growth.check(-1.0, 5.0, 5).is_err());
        assert!(growth.check(100.0, 0.5, 5).is_err());
        assert!(growth.check(100.0, 5.0, 0).is_err());
        assert!(growth.check(100.0, 5.0, 11).unwrap_err().contains("years"));
        assert!(growth.check(1e300, 5.0, 5).unwrap_err().contains("limit"));
    }

    #[test]
    fn test_search_missing_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_search(
            Some(&dir.path().join("absent.toml")),
            &dir.path().join("salary_config.toml"),
        )
        .unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_search_invalid_env_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
[model]
artifact_path = "/custom/model.json"

[inputs]
rating_min = 4.0
rating_max = 1.0
"#,
        )
        .unwrap();

        let err = AppConfig::load_from_search(Some(&path), &dir.path().join("salary_config.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_search_unparseable_local_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let local = dir.path().join("salary_config.toml");
        std::fs::write(&local, "[model\nartifact_path = ").unwrap();

        let err = AppConfig::load_from_search(None, &local).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(..)));
    }

    #[test]
    fn test_search_env_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let env_file = dir.path().join("env.toml");
        let local = dir.path().join("salary_config.toml");
        std::fs::write(&env_file, "[model]\nartifact_path = \"/custom/model.json\"\n").unwrap();
        std::fs::write(&local, "[server]\naddr = \"127.0.0.1:1\"\n").unwrap();

        let config = AppConfig::load_from_search(Some(&env_file), &local).unwrap();
        assert_eq!(config.model.artifact_path, PathBuf::from("/custom/model.json"));
        assert_eq!(config.server.addr, defaults::SERVER_ADDR);
    }
}
