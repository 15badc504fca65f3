//! Error types for KINEMA

use thiserror::Error;

/// Core KINEMA errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KinemaError {
    // Reconciliation errors
    #[error("Reconciliation started without a saved snapshot")]
    SnapshotMissing,

    #[error("Invalid bending strength: {0} (expected a finite value in (0, 1])")]
    InvalidStrength(f32),

    // Schema errors
    #[error("Schema field already declared by parent: {0}")]
    SchemaFieldOverwrite(String),

    #[error("Unknown schema field: {0}")]
    UnknownField(String),

    #[error("Type mismatch on field {field}: expected {expected}")]
    FieldTypeMismatch { field: String, expected: &'static str },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for KINEMA operations
pub type KinemaResult<T> = Result<T, KinemaError>;
