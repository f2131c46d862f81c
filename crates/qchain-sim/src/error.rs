//! Error types for simulation operations

use thiserror::Error;

/// Errors that can occur during state-vector and density-matrix operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid qubit index
    #[error("invalid qubit index {index} for {num_qubits}-qubit system")]
    InvalidQubitIndex { index: usize, num_qubits: usize },

    /// Invalid state dimension
    #[error("invalid dimension {dimension}, expected a power of two")]
    InvalidDimension { dimension: usize },

    /// State not normalized
    #[error("state vector not normalized, norm = {norm}")]
    NotNormalized { norm: f64 },

    /// Dimension mismatch between two operands
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Unparseable observable label
    #[error("invalid observable label '{label}'")]
    InvalidObservable { label: String },
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimError>;
