//! Turns a [`UserSelection`] into the exact numeric row a model expects.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use super::schema::{FeatureKind, FeatureSchema, ScalarFeature};

// ============================================================================
// Input
// ============================================================================

/// Tool-usage checkboxes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFlags {
    #[serde(default)]
    pub python: bool,
    #[serde(default)]
    pub r: bool,
    #[serde(default)]
    pub spark: bool,
    #[serde(default)]
    pub aws: bool,
    #[serde(default)]
    pub excel: bool,
}

/// One prediction request as collected from the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSelection {
    #[serde(alias = "jobTitle")]
    pub job_title: String,
    #[serde(alias = "jobState")]
    pub job_state: String,
    /// Company rating
    pub rating: f64,
    /// Company age in years
    #[serde(alias = "age")]
    pub company_age: u32,
    #[serde(default)]
    pub tools: ToolFlags,
}

impl UserSelection {
    /// Numeric value for a scalar column; flags become 0.0 / 1.0.
    pub fn scalar_value(&self, feature: ScalarFeature) -> f64 {
        let flag = |b: bool| f64::from(u8::from(b));
        match feature {
            ScalarFeature::Rating => self.rating,
            ScalarFeature::CompanyAge => f64::from(self.company_age),
            ScalarFeature::Python => flag(self.tools.python),
            ScalarFeature::R => flag(self.tools.r),
            ScalarFeature::Spark => flag(self.tools.spark),
            ScalarFeature::Aws => flag(self.tools.aws),
            ScalarFeature::Excel => flag(self.tools.excel),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Encoded row: one value per schema column, in schema order.
///
/// Serializes as a JSON object whose keys keep the column order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureRow {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.names.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Values arranged in `schema` column order.
    ///
    /// Columns the row lacks are filled with 0.
    pub fn aligned_to(&self, schema: &FeatureSchema) -> Vec<f64> {
        if self.names().eq(schema.names()) {
            return self.values.clone();
        }
        schema
            .names()
            .map(|name| self.get(name).unwrap_or(0.0))
            .collect()
    }
}

impl Serialize for FeatureRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    JobTitle,
    JobState,
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JobTitle => write!(f, "job title"),
            Self::JobState => write!(f, "job state"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Unknown {field} '{value}': not a category the model was trained on")]
    UnknownCategory { field: CategoryField, value: String },
}

// ============================================================================
// Encoding
// ============================================================================

/// Encode `selection` against `schema`.
///
/// Unknown job titles or states are rejected before anything is built, so a
/// returned row always has exactly one 1 in each non-empty one-hot block.
pub fn encode(schema: &FeatureSchema, selection: &UserSelection) -> Result<FeatureRow, EncodeError> {
    let categories = schema.categories();
    if !categories.job_titles.contains(&selection.job_title) {
        return Err(EncodeError::UnknownCategory {
            field: CategoryField::JobTitle,
            value: selection.job_title.clone(),
        });
    }
    if !categories.job_states.contains(&selection.job_state) {
        return Err(EncodeError::UnknownCategory {
            field: CategoryField::JobState,
            value: selection.job_state.clone(),
        });
    }

    let one_hot = |hit: bool| if hit { 1.0 } else { 0.0 };
    let mut names = Vec::with_capacity(schema.len());
    let mut values = Vec::with_capacity(schema.len());
    for column in schema.columns() {
        let value = match &column.kind {
            FeatureKind::Scalar(feature) => selection.scalar_value(*feature),
            FeatureKind::JobTitle(title) => one_hot(*title == selection.job_title),
            FeatureKind::JobState(state) => one_hot(*state == selection.job_state),
            FeatureKind::Unassigned => 0.0,
        };
        names.push(column.name.clone());
        values.push(value);
    }

    Ok(FeatureRow { names, values })
}
