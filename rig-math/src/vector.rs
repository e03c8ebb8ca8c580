//! Linear averaging of 3D vectors
//!
//! Translation and scale channels are averaged linearly alongside the
//! rotation average when whole transforms are blended.

use nalgebra::Vector3;

use crate::error::AverageError;

/// Arithmetic mean of a set of vectors, or the zero vector when empty
pub fn average_vector(vectors: &[Vector3<f64>]) -> Vector3<f64> {
    if vectors.is_empty() {
        return Vector3::zeros();
    }

    let sum: Vector3<f64> = vectors.iter().sum();
    sum / vectors.len() as f64
}

/// Weighted mean of a set of vectors
///
/// A weight sum of exactly zero returns the unnormalized weighted sum.
///
/// # Errors
/// * `AverageError::LengthMismatch` - If the sequences differ in length
pub fn average_weighted_vector(
    vectors: &[Vector3<f64>],
    weights: &[f64],
) -> Result<Vector3<f64>, AverageError> {
    if vectors.len() != weights.len() {
        return Err(AverageError::LengthMismatch {
            samples: vectors.len(),
            weights: weights.len(),
        });
    }

    let mut sum = Vector3::zeros();
    let mut weight_sum = 0.0;
    for (vector, weight) in vectors.iter().zip(weights) {
        sum += vector * *weight;
        weight_sum += weight;
    }

    Ok(if weight_sum == 0.0 { sum } else { sum / weight_sum })
}
