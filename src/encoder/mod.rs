//! Feature Encoder
//!
//! Maps a form submission onto the model's one-hot feature vector.
//!
//! ## Column groups
//!
//! - **Scalars**: `Rating`, `age` and the binary tool flags (`python_yn`,
//!   `R_yn`, `spark`, `aws`, `excel`)
//! - **Job title**: columns prefixed `Job Title_`, one per category
//! - **Job state**: columns prefixed `job_state_`, one per category
//!
//! Anything else in the schema is carried through as 0.

mod encode;
mod schema;

pub use encode::{encode, CategoryField, EncodeError, FeatureRow, ToolFlags, UserSelection};
pub use schema::{
    derive_category_sets, CategorySets, FeatureColumn, FeatureKind, FeatureSchema,
    ScalarFeature, SchemaError, JOB_STATE_PREFIX, JOB_TITLE_PREFIX,
};
