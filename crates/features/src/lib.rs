//! Request validation and feature encoding for the credit-risk model.
//!
//! A JSON body becomes a [`LoanApplication`], which the [`FeatureEncoder`]
//! turns into a [`FeatureRow`] in the exact column order the model expects.

pub mod application;
pub mod encoder;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_utils;

pub use application::{FieldError, FieldErrorKind, LoanApplication, Number, ValidationError};
pub use encoder::{DroppedCategory, Encoding, FeatureEncoder, FeatureRow};
pub use schema::{
    CategoricalField, ColumnKind, FeatureSchema, NumericField, SchemaError, FEATURE_COLUMNS,
    FEATURE_COUNT,
};
