//! salary-predictor: Data science salary estimation
//!
//! Turns a job-seeker's form selections into the feature row a trained
//! regressor expects, and serves the estimate through a small dashboard.
//!
//! ## Architecture
//!
//! - **Encoder**: Typed feature schema and one-hot encoding of selections
//! - **Model**: Artifact loading and the `predict(row)` seam
//! - **Growth / Regional**: Compounding projections and the state salary sample
//! - **API**: Axum JSON API plus the embedded dashboard

pub mod api;
pub mod config;
pub mod encoder;
pub mod format;
pub mod growth;
pub mod model;
pub mod regional;

// Re-export configuration
pub use config::AppConfig;

// Re-export commonly used types
pub use encoder::{encode, CategorySets, EncodeError, FeatureRow, FeatureSchema, ToolFlags, UserSelection};
pub use model::{ModelBundle, ModelError, Prediction, Regressor};
pub use growth::{project, GrowthProjection};
