//! Application Configuration Module
//!
//! Server address, model artifact paths, form input limits, growth page
//! bounds and the regional salary sample, loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `SALARY_CONFIG` environment variable (path to TOML file)
//! 2. `salary_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Load once at startup and hand the result to the server state:
//!
//! ```ignore
//! let config = Arc::new(AppConfig::load());
//! let app = api::create_app(model, config);
//! ```

mod app_config;
pub mod defaults;
pub mod validation;

pub use app_config::*;
