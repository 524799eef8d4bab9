//! # Error Types
//!
//! Structured error types for barn_core. Almost nothing in the engine is
//! fatal: mapping gaps, pricing gaps, and packing edge cases degrade to
//! annotated results (see [`crate::diagnostics`]). The variants here cover
//! the cases that genuinely cannot proceed: malformed or empty catalogs
//! and invalid caller input.
//!
//! ## Example
//!
//! ```rust
//! use barn_core::errors::{EstimateError, EstimateResult};
//!
//! fn validate_span(length_ft: f64) -> EstimateResult<()> {
//!     if length_ft <= 0.0 {
//!         return Err(EstimateError::invalid_input(
//!             "length_ft",
//!             length_ft.to_string(),
//!             "Building length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for barn_core operations
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Structured error type for estimating operations.
///
/// Each variant carries enough context to understand and fix the issue
/// programmatically.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EstimateError {
    /// An input value is invalid (out of range, wrong sign, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required catalog table is missing or empty
    #[error("Missing catalog table: {table}")]
    MissingCatalog { table: String },

    /// A catalog table is structurally malformed
    #[error("Catalog error in '{table}': {reason}")]
    CatalogError { table: String, reason: String },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EstimateError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EstimateError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingCatalog error
    pub fn missing_catalog(table: impl Into<String>) -> Self {
        EstimateError::MissingCatalog {
            table: table.into(),
        }
    }

    /// Create a CatalogError
    pub fn catalog_error(table: impl Into<String>, reason: impl Into<String>) -> Self {
        EstimateError::CatalogError {
            table: table.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EstimateError::InvalidInput { .. } => "INVALID_INPUT",
            EstimateError::MissingCatalog { .. } => "MISSING_CATALOG",
            EstimateError::CatalogError { .. } => "CATALOG_ERROR",
            EstimateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EstimateError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EstimateError::invalid_input("length_ft", "-5.0", "must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: EstimateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            EstimateError::missing_catalog("parts").error_code(),
            "MISSING_CATALOG"
        );
        assert_eq!(
            EstimateError::catalog_error("assemblies", "bad row").error_code(),
            "CATALOG_ERROR"
        );
    }
}
