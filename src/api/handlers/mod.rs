//! API route handlers
//!
//! Request handling logic for all API endpoints including:
//! - Service health and model metadata
//! - Salary estimation from form selections
//! - Growth projections and the regional salary sample

mod growth;
mod predict;
mod regional;
mod schema;
mod status;

pub use growth::*;
pub use predict::*;
pub use regional::*;
pub use schema::*;
pub use status::*;

use std::sync::Arc;
use std::time::Instant;

use crate::config::AppConfig;
use crate::model::ModelBundle;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers. Everything in it is read-only after startup.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Loaded model and its feature schema
    pub model: Arc<ModelBundle>,
    /// Validated application config
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl DashboardState {
    pub fn new(model: Arc<ModelBundle>, config: Arc<AppConfig>) -> Self {
        Self {
            model,
            config,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
