//! Typed feature schema: the ordered column list a trained model expects,
//! partitioned once at load time into scalar and one-hot groups.

use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Column prefix for the one-hot job-title block.
pub const JOB_TITLE_PREFIX: &str = "Job Title_";

/// Column prefix for the one-hot job-location block.
pub const JOB_STATE_PREFIX: &str = "job_state_";

// ============================================================================
// Scalar Features
// ============================================================================

/// Scalar inputs the encoder knows how to fill from a [`super::UserSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarFeature {
    /// Company rating (0-5 stars)
    Rating,
    /// Company age in years
    CompanyAge,
    Python,
    R,
    Spark,
    Aws,
    Excel,
}

impl ScalarFeature {
    pub const ALL: [Self; 7] = [
        Self::Rating,
        Self::CompanyAge,
        Self::Python,
        Self::R,
        Self::Spark,
        Self::Aws,
        Self::Excel,
    ];

    /// Column name used by the training pipeline.
    pub const fn column(self) -> &'static str {
        match self {
            Self::Rating => "Rating",
            Self::CompanyAge => "age",
            Self::Python => "python_yn",
            Self::R => "R_yn",
            Self::Spark => "spark",
            Self::Aws => "aws",
            Self::Excel => "excel",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }

    /// Binary tool-usage flags are encoded as 0/1.
    pub const fn is_flag(self) -> bool {
        !matches!(self, Self::Rating | Self::CompanyAge)
    }
}

// ============================================================================
// Columns
// ============================================================================

/// Which group a schema column belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureKind {
    /// A known scalar input
    Scalar(ScalarFeature),
    /// One member of the job-title one-hot block (holds the category label)
    JobTitle(String),
    /// One member of the job-state one-hot block (holds the category label)
    JobState(String),
    /// No recognised prefix and not a known scalar; always encoded as 0
    Unassigned,
}

impl FeatureKind {
    fn classify(name: &str) -> Self {
        if let Some(title) = name.strip_prefix(JOB_TITLE_PREFIX) {
            Self::JobTitle(title.to_string())
        } else if let Some(state) = name.strip_prefix(JOB_STATE_PREFIX) {
            Self::JobState(state.to_string())
        } else {
            ScalarFeature::from_column(name).map_or(Self::Unassigned, Self::Scalar)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureColumn {
    pub name: String,
    pub kind: FeatureKind,
}

// ============================================================================
// Category Sets
// ============================================================================

/// Selectable category labels, sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySets {
    pub job_titles: BTreeSet<String>,
    pub job_states: BTreeSet<String>,
}

/// Collect the job-title and job-state labels from a list of feature names.
///
/// The result does not depend on the order of `names`.
pub fn derive_category_sets<I, S>(names: I) -> CategorySets
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sets = CategorySets::default();
    for name in names {
        let name = name.as_ref();
        if let Some(title) = name.strip_prefix(JOB_TITLE_PREFIX) {
            sets.job_titles.insert(title.to_string());
        } else if let Some(state) = name.strip_prefix(JOB_STATE_PREFIX) {
            sets.job_states.insert(state.to_string());
        }
    }
    sets
}

// ============================================================================
// Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Feature list is empty")]
    Empty,

    #[error("Duplicate feature name: {0}")]
    DuplicateFeature(String),
}

/// Ordered, immutable feature schema with each column tagged by group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
    categories: CategorySets,
}

impl FeatureSchema {
    /// Build a schema from the model's ordered feature names.
    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        for name in names {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(SchemaError::DuplicateFeature(name));
            }
            let kind = FeatureKind::classify(&name);
            columns.push(FeatureColumn { name, kind });
        }
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        let categories = derive_category_sets(columns.iter().map(|c| c.name.as_str()));
        Ok(Self { columns, categories })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn categories(&self) -> &CategorySets {
        &self.categories
    }

    /// Known scalar inputs present in this schema, in column order.
    pub fn scalar_features(&self) -> Vec<ScalarFeature> {
        self.columns
            .iter()
            .filter_map(|c| match c.kind {
                FeatureKind::Scalar(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    /// Columns that no input can populate.
    pub fn unassigned(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.kind == FeatureKind::Unassigned)
            .map(|c| c.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    const NAMES: [&str; 9] = [
        "Rating",
        "age",
        "python_yn",
        "Job Title_Engineer",
        "Job Title_Analyst",
        "job_state_NY",
        "job_state_CA",
        "hourly",
        "Job Title_Director",
    ];

    #[test]
    fn test_classify_groups() {
        let schema = FeatureSchema::new(NAMES).unwrap();
        let kinds: Vec<_> = schema.columns().iter().map(|c| c.kind.clone()).collect();
        assert_eq!(kinds[0], FeatureKind::Scalar(ScalarFeature::Rating));
        assert_eq!(kinds[1], FeatureKind::Scalar(ScalarFeature::CompanyAge));
        assert_eq!(kinds[2], FeatureKind::Scalar(ScalarFeature::Python));
        assert_eq!(kinds[3], FeatureKind::JobTitle("Engineer".to_string()));
        assert_eq!(kinds[6], FeatureKind::JobState("CA".to_string()));
        assert_eq!(kinds[7], FeatureKind::Unassigned);
        assert_eq!(schema.unassigned().collect::<Vec<_>>(), vec!["hourly"]);
    }

    #[test]
    fn test_category_sets_sorted() {
        let sets = derive_category_sets(NAMES);
        let titles: Vec<_> = sets.job_titles.iter().map(String::as_str).collect();
        let states: Vec<_> = sets.job_states.iter().map(String::as_str).collect();
        assert_eq!(titles, vec!["Analyst", "Director", "Engineer"]);
        assert_eq!(states, vec!["CA", "NY"]);
    }

    #[test]
    fn test_category_sets_order_independent() {
        let expected = derive_category_sets(NAMES);
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let mut shuffled = NAMES.to_vec();
            shuffled.shuffle(&mut rng);
            assert_eq!(derive_category_sets(&shuffled), expected);
        }
    }

    #[test]
    fn test_category_sets_no_duplicates() {
        let sets = derive_category_sets(["Job Title_A", "Job Title_A", "job_state_X"]);
        assert_eq!(sets.job_titles.len(), 1);
        assert_eq!(sets.job_states.len(), 1);
    }

    #[test]
    fn test_sort_is_bytewise() {
        let sets = derive_category_sets(["Job Title_data analyst", "Job Title_Director"]);
        let titles: Vec<_> = sets.job_titles.iter().map(String::as_str).collect();
        assert_eq!(titles, vec!["Director", "data analyst"]);
    }

    #[test]
    fn test_duplicate_feature_rejected() {
        let err = FeatureSchema::new(["Rating", "age", "Rating"]).unwrap_err();
        assert_eq!(err, SchemaError::DuplicateFeature("Rating".to_string()));
    }

    #[test]
    fn test_empty_schema_rejected() {
        let err = FeatureSchema::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, SchemaError::Empty);
    }

    #[test]
    fn test_scalar_features_in_column_order() {
        let schema = FeatureSchema::new(["excel", "Job Title_A", "Rating"]).unwrap();
        assert_eq!(
            schema.scalar_features(),
            vec![ScalarFeature::Excel, ScalarFeature::Rating]
        );
    }

    #[test]
    fn test_scalar_column_round_trip() {
        for f in ScalarFeature::ALL {
            assert_eq!(ScalarFeature::from_column(f.column()), Some(f));
        }
        assert!(!ScalarFeature::Rating.is_flag());
        assert!(ScalarFeature::Spark.is_flag());
    }
}
