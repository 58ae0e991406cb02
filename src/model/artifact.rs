//! Serialized regressor artifacts.
//!
//! Two estimator families are supported: a linear model and an ensemble of
//! regression trees (random forest or gradient boosting). Both evaluate a row
//! given in the artifact's `feature_names` order.

use serde::{Deserialize, Serialize};

use super::Regressor;

/// Top-level model artifact as written by the training pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact version tag (e.g. "v2")
    pub version: String,
    /// Name of the predicted quantity
    #[serde(default)]
    pub target: Option<String>,
    /// Columns the estimator was fitted on, in order
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl Estimator {
    /// Check internal consistency against the number of input columns.
    pub fn validate(&self, feature_count: usize) -> Result<(), String> {
        match self {
            Self::Linear(m) => m.validate(feature_count),
            Self::TreeEnsemble(e) => e.validate(feature_count),
        }
    }
}

impl Regressor for Estimator {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Self::Linear(m) => m.predict(row),
            Self::TreeEnsemble(e) => e.predict(row),
        }
    }
}

// ============================================================================
// Linear
// ============================================================================

/// `intercept + Σ coefficients[i] * row[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.coefficients.len() != feature_count {
            return Err(format!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                feature_count
            ));
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn predict(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

// ============================================================================
// Tree Ensemble
// ============================================================================

/// How individual tree outputs are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Random forest: average of tree outputs
    #[default]
    Mean,
    /// Gradient boosting: base score plus sum of tree outputs
    Sum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(feature_count)
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.evaluate(row)).sum();
        match self.aggregation {
            #[allow(clippy::cast_precision_loss)]
            Aggregation::Mean => self.base_score + total / self.trees.len() as f64,
            Aggregation::Sum => self.base_score + total,
        }
    }
}

/// A single tree node. Splits send `row[feature] <= threshold` left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flat node array; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Children must point forward in the node array, which rules out cycles.
    fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, left, right, .. } = *node {
                if feature >= feature_count {
                    return Err(format!(
                        "node {idx} splits on feature {feature}, only {feature_count} features"
                    ));
                }
                for child in [left, right] {
                    if child <= idx || child >= self.nodes.len() {
                        return Err(format!("node {idx} has invalid child index {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn evaluate(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return *value,
                Some(TreeNode::Split { feature, threshold, left, right }) => {
                    let x = row.get(*feature).copied().unwrap_or(0.0);
                    idx = if x <= *threshold { *left } else { *right };
                }
                None => return f64::NAN,
            }
        }
    }
}
