//! Predictive model: artifact loading and the opaque `predict(row)` seam.
//!
//! The model and its feature list are two separate artifacts produced by the
//! training pipeline. [`ModelBundle::load`] reads both, checks they agree, and
//! keeps them together as one immutable value shared by every request.

pub mod artifact;

pub use artifact::{
    Aggregation, Estimator, LinearModel, ModelArtifact, RegressionTree, TreeEnsemble, TreeNode,
};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::encoder::{
    encode, CategorySets, EncodeError, FeatureRow, FeatureSchema, SchemaError, UserSelection,
};

/// A fitted regressor: one numeric row in, one estimate out.
///
/// `row` is in the column order of the schema the model was trained on.
pub trait Regressor: Send + Sync {
    fn predict(&self, row: &[f64]) -> f64;
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ModelError {
    /// An artifact could not be read, parsed, or is internally inconsistent.
    #[error("Model unavailable ({}): {reason}", .path.display())]
    Unavailable { path: PathBuf, reason: String },

    /// Model and feature list disagree on the columns.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Invalid feature schema: {0}")]
    InvalidSchema(#[from] SchemaError),
}

// ============================================================================
// Prediction
// ============================================================================

/// Result of one encode-then-predict call.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub estimate: f64,
    pub row: FeatureRow,
}

// ============================================================================
// Model Bundle
// ============================================================================

/// Feature schema plus the regressor trained on it. Immutable after load.
pub struct ModelBundle {
    schema: FeatureSchema,
    model: Box<dyn Regressor>,
    version: String,
    target: Option<String>,
}

impl std::fmt::Debug for ModelBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelBundle")
            .field("version", &self.version)
            .field("target", &self.target)
            .field("features", &self.schema.len())
            .finish_non_exhaustive()
    }
}

impl ModelBundle {
    /// Wrap an arbitrary regressor. The caller guarantees it was fitted on `schema`.
    pub fn new(schema: FeatureSchema, model: impl Regressor + 'static, version: impl Into<String>) -> Self {
        Self {
            schema,
            model: Box::new(model),
            version: version.into(),
            target: None,
        }
    }

    /// Load the regressor and feature list artifacts from disk.
    pub fn load(artifact_path: &Path, features_path: &Path) -> Result<Self, ModelError> {
        let features: Vec<String> = read_json(features_path)?;
        let artifact: ModelArtifact = read_json(artifact_path)?;

        artifact
            .estimator
            .validate(artifact.feature_names.len())
            .map_err(|reason| ModelError::Unavailable {
                path: artifact_path.to_path_buf(),
                reason,
            })?;

        let bundle = Self::from_artifact(features, artifact)?;
        info!(
            path = %artifact_path.display(),
            version = %bundle.version,
            features = bundle.schema.len(),
            job_titles = bundle.categories().job_titles.len(),
            job_states = bundle.categories().job_states.len(),
            "Loaded model artifact"
        );
        Ok(bundle)
    }

    /// Pair a parsed artifact with its feature list, rejecting any disagreement.
    pub fn from_artifact(features: Vec<String>, artifact: ModelArtifact) -> Result<Self, ModelError> {
        check_feature_names(&artifact.feature_names, &features)?;
        let schema = FeatureSchema::new(features)?;

        for name in schema.unassigned() {
            debug!(feature = name, "Feature has no input and will always be 0");
        }

        Ok(Self {
            schema,
            model: Box::new(artifact.estimator),
            version: artifact.version,
            target: artifact.target,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn categories(&self) -> &CategorySets {
        self.schema.categories()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    /// Run the model on an encoded row.
    pub fn predict(&self, row: &FeatureRow) -> f64 {
        self.model.predict(&row.aligned_to(&self.schema))
    }

    /// Encode `selection` and run the model on the result.
    pub fn estimate(&self, selection: &UserSelection) -> Result<Prediction, EncodeError> {
        let row = encode(&self.schema, selection)?;
        let estimate = self.predict(&row);
        Ok(Prediction { estimate, row })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let unavailable = |reason: String| ModelError::Unavailable {
        path: path.to_path_buf(),
        reason,
    };
    let contents = std::fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| unavailable(e.to_string()))
}

fn check_feature_names(model: &[String], features: &[String]) -> Result<(), ModelError> {
    if model.len() != features.len() {
        return Err(ModelError::SchemaMismatch(format!(
            "model expects {} features, feature list has {}",
            model.len(),
            features.len()
        )));
    }
    if let Some((i, (m, f))) = model
        .iter()
        .zip(features)
        .enumerate()
        .find(|(_, (m, f))| m != f)
    {
        return Err(ModelError::SchemaMismatch(format!(
            "column {i}: model expects '{m}', feature list has '{f}'"
        )));
    }
    Ok(())
}
