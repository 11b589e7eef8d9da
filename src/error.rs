//! Error types for scaling and persistence operations.

use std::fmt;

/// Error type for scaling and persistence operations.
#[derive(Debug)]
pub enum ScaleError {
    /// I/O error while opening, reading or writing a scaler file.
    Io(String),
    /// A persistence record that cannot be interpreted at all
    /// (missing fields, unreadable line, no usable scaler records).
    MalformedRecord(String),
    /// A persistence record names a scaler type this crate does not know.
    UnknownScalerType(String),
    /// No persistence record carries the requested identifier.
    ScalerNotFound(String),
    /// A persistence record carries the wrong number of parameter fields
    /// for its declared scaler type.
    FieldCountMismatch {
        scaler_type: String,
        expected: usize,
        got: usize,
    },
    /// A parameter list of the wrong length was handed to a scaler.
    ParameterCountMismatch { expected: usize, got: usize },
    /// Empty data provided where at least one value was required.
    EmptyBatch(String),
    /// A batch's dimensionality does not match the scaler count it is
    /// applied to.
    DimensionMismatch { expected: usize, got: usize },
    /// A record identifier contains the separator or a line break.
    InvalidIdentifier(String),
    /// Binary snapshot serialization or deserialization error.
    Serialization(String),
}

impl fmt::Display for ScaleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScaleError::Io(msg) => {
                write!(f, "I/O error: {}", msg)
            }
            ScaleError::MalformedRecord(msg) => {
                write!(f, "Malformed record: {}", msg)
            }
            ScaleError::UnknownScalerType(name) => {
                write!(f, "Unknown scaler type: {}", name)
            }
            ScaleError::ScalerNotFound(id) => {
                write!(f, "Scaler not found: {}", id)
            }
            ScaleError::FieldCountMismatch {
                scaler_type,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Field count mismatch: {} expects {} parameters, got {}",
                    scaler_type, expected, got
                )
            }
            ScaleError::ParameterCountMismatch { expected, got } => {
                write!(
                    f,
                    "Parameter count mismatch: expected {} values, got {}",
                    expected, got
                )
            }
            ScaleError::EmptyBatch(msg) => {
                write!(f, "Empty batch: {}", msg)
            }
            ScaleError::DimensionMismatch { expected, got } => {
                write!(
                    f,
                    "Dimension mismatch: expected {} dimensions, got {}",
                    expected, got
                )
            }
            ScaleError::InvalidIdentifier(id) => {
                write!(
                    f,
                    "Invalid identifier: {:?} contains the separator or a line break",
                    id
                )
            }
            ScaleError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ScaleError {}

impl From<std::io::Error> for ScaleError {
    fn from(err: std::io::Error) -> Self {
        ScaleError::Io(err.to_string())
    }
}

impl From<csv::Error> for ScaleError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            ScaleError::Io(err.to_string())
        } else {
            ScaleError::MalformedRecord(err.to_string())
        }
    }
}

impl From<bincode::Error> for ScaleError {
    fn from(err: bincode::Error) -> Self {
        ScaleError::Serialization(err.to_string())
    }
}
