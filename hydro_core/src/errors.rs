//! # Error Types
//!
//! Structured error types for hydro_core. Errors carry enough context
//! (field, value, reason) that a caller can report the problem to the
//! user or fix it programmatically.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::errors::{HydroError, HydroResult};
//!
//! fn validate_width(width_m: f64) -> HydroResult<()> {
//!     if width_m <= 0.0 {
//!         return Err(HydroError::InvalidMeasurement {
//!             field: "river_width_m".to_string(),
//!             value: width_m.to_string(),
//!             reason: "River width must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for hydro_core operations
pub type HydroResult<T> = Result<T, HydroError>;

/// Structured error type for measurement and report operations.
///
/// Each variant provides specific context about what went wrong.
/// Invalid field data is rejected at the data-entry boundary; once a
/// study validates, every downstream computation is total.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum HydroError {
    /// A measurement value is invalid (out of range, non-monotonic, etc.)
    #[error("Invalid measurement for '{field}': {value} - {reason}")]
    InvalidMeasurement {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Referenced site does not exist in the study
    #[error("Site not found: site {site_number}")]
    SiteNotFound { site_number: u32 },

    /// Report composition or rendering failed
    #[error("Report failed during {stage}: {reason}")]
    ReportFailed { stage: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl HydroError {
    /// Create an InvalidMeasurement error
    pub fn invalid_measurement(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HydroError::InvalidMeasurement {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        HydroError::MissingField {
            field: field.into(),
        }
    }

    /// Create a ReportFailed error
    pub fn report_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        HydroError::ReportFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        HydroError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        HydroError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HydroError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            HydroError::InvalidMeasurement { .. } => "INVALID_MEASUREMENT",
            HydroError::MissingField { .. } => "MISSING_FIELD",
            HydroError::SiteNotFound { .. } => "SITE_NOT_FOUND",
            HydroError::ReportFailed { .. } => "REPORT_FAILED",
            HydroError::FileError { .. } => "FILE_ERROR",
            HydroError::FileLocked { .. } => "FILE_LOCKED",
            HydroError::SerializationError { .. } => "SERIALIZATION_ERROR",
            HydroError::VersionMismatch { .. } => "VERSION_MISMATCH",
            HydroError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
