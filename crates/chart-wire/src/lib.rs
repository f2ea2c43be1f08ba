//! Odontogram wire/boundary support.
//!
//! This crate provides **wire models** and **format/translation helpers** for:
//! - the version-controlled chart file (`odontogram.yaml`) kept by the chart store
//!
//! Clinical meaning (condition catalog, tooth numbering rules, upsert semantics) lives in
//! `odonto-core`. This crate handles file formats only.

pub mod odontogram;

pub use odontogram::{ChartFile, ChartFileData, ToothRecordData};

/// Errors returned by the `chart-wire` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;
