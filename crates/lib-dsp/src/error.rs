//! Error types for DSP operations.

use lib_types::SequenceError;
use thiserror::Error;

/// Errors that can occur during DSP operations.
#[derive(Debug, Error)]
pub enum DspError {
    /// An input sequence is unusable (e.g. empty).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// FFT size is not a power of 2 or too small for the kernel.
    #[error("FFT size must be power of 2, got {0}")]
    InvalidFftSize(usize),
}

impl From<SequenceError> for DspError {
    fn from(err: SequenceError) -> Self {
        DspError::InvalidArgument(err.to_string())
    }
}

/// Result type for DSP operations.
pub type DspResult<T> = Result<T, DspError>;
