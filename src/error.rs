//! Error types for the spectral analysis core

use std::fmt;

/// Errors that can occur during spectral analysis and classification
#[derive(Debug, Clone)]
pub enum AnalysisError {
    /// Invalid input parameters (empty waveform, zero sample rate, bad configuration)
    InvalidInput(String),

    /// Buffer length does not match what the operation requires
    /// (non-power-of-two transform input, frame/spectrum size mismatch)
    InvalidInputLength(String),

    /// A Gaussian class model has a zero or negative variance
    DegenerateVariance(String),

    /// Malformed parameter dump
    ModelFormat(String),

    /// I/O failure while reading or writing model parameters
    Io(String),

    /// Numerical error (non-finite intermediate values)
    NumericalError(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AnalysisError::InvalidInputLength(msg) => write!(f, "Invalid input length: {}", msg),
            AnalysisError::DegenerateVariance(msg) => write!(f, "Degenerate variance: {}", msg),
            AnalysisError::ModelFormat(msg) => write!(f, "Model format error: {}", msg),
            AnalysisError::Io(msg) => write!(f, "I/O error: {}", msg),
            AnalysisError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        AnalysisError::Io(err.to_string())
    }
}
