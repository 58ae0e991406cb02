//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8080";

/// Environment variable overriding the bind address.
pub const SERVER_ADDR_ENV: &str = "SALARY_SERVER_ADDR";

/// Environment variable holding a comma-separated CORS origin allow-list.
pub const CORS_ORIGINS_ENV: &str = "SALARY_CORS_ORIGINS";

/// Maximum accepted request body (bytes). A prediction request is tiny.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024;

// ============================================================================
// Config File
// ============================================================================

/// Environment variable pointing at the config file.
pub const CONFIG_PATH_ENV: &str = "SALARY_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "salary_config.toml";

// ============================================================================
// Model Artifacts
// ============================================================================

pub const MODEL_ARTIFACT_PATH: &str = "models/salary_model.json";

pub const MODEL_FEATURES_PATH: &str = "models/model_features.json";

// ============================================================================
// Form Inputs
// ============================================================================

/// Company rating slider range (Glassdoor stars).
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 5.0;

/// Company age slider range (years).
pub const COMPANY_AGE_MIN: u32 = 0;
pub const COMPANY_AGE_MAX: u32 = 150;

// ============================================================================
// Growth Projection
// ============================================================================

pub const GROWTH_MIN_YEARS: u32 = 1;
pub const GROWTH_MAX_YEARS: u32 = 10;
pub const GROWTH_DEFAULT_YEARS: u32 = 5;

pub const GROWTH_MIN_RATE_PERCENT: f64 = 1.0;
pub const GROWTH_MAX_RATE_PERCENT: f64 = 20.0;
pub const GROWTH_DEFAULT_RATE_PERCENT: f64 = 5.0;

/// Starting salary shown on the growth page before the user enters one.
pub const GROWTH_DEFAULT_BASE: f64 = 100.0;

/// Largest starting salary a projection accepts.
pub const GROWTH_MAX_BASE: f64 = 1.0e12;

/// Hard ceiling on any configured projection horizon (years).
pub const GROWTH_HORIZON_LIMIT: u32 = 100;
