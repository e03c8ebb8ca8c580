//! Error types shared by the averaging routines

use thiserror::Error;

/// Errors raised by the weighted averaging operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AverageError {
    /// The weight sequence does not pair 1:1 with the sample sequence
    #[error("length mismatch: {samples} samples but {weights} weights")]
    LengthMismatch { samples: usize, weights: usize },
}
