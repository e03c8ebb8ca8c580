//! Rotation averaging by eigen-decomposition
//!
//! The average of a set of unit quaternions is taken as the dominant
//! eigenvector of the 4x4 accumulation matrix
//!
//! ```text
//! A = Σ wᵢ · qᵢᵀqᵢ / Σ wᵢ        (qᵢ as the row vector [w, x, y, z])
//! ```
//!
//! which maximizes Σ wᵢ (q·qᵢ)² over unit q. Because each sample enters as an
//! outer product, q and -q contribute identically, so the result does not
//! depend on the hemisphere the inputs were expressed in. Two equally
//! weighted rotations average to the same rotation as a slerp at t = 0.5.
//!
//! The returned quaternion's sign is whatever the eigensolver produces and
//! is not canonicalized.

use log::{debug, trace, warn};
use nalgebra::{Matrix4, RowVector4, SymmetricEigen};

use crate::error::AverageError;
use crate::quaternion::Quaternion;

/// Default weight for samples without an explicit weight
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Convergence tolerance handed to the symmetric eigensolver
const EIGEN_EPSILON: f64 = f64::EPSILON;

/// Iteration cap for the eigensolver; a 4x4 matrix converges in a handful
const EIGEN_MAX_ITERATIONS: usize = 1000;

/// Running sum of weighted quaternion outer products
///
/// Lives for a single averaging call. Samples are taken as given; no
/// normalization is applied, so non-unit inputs act as plain 4D directions
/// scaled by their squared length.
#[derive(Debug, Clone)]
pub struct RotationAccumulator {
    sum: Matrix4<f64>,
    weight_sum: f64,
    count: usize,
}

impl Default for RotationAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            sum: Matrix4::zeros(),
            weight_sum: 0.0,
            count: 0,
        }
    }

    /// Add a sample with the default weight
    pub fn add(&mut self, rotation: &Quaternion) {
        self.add_weighted(rotation, DEFAULT_WEIGHT);
    }

    /// Add a sample scaled by `weight`
    pub fn add_weighted(&mut self, rotation: &Quaternion, weight: f64) {
        let [w, x, y, z] = rotation.to_wxyz();
        let q = RowVector4::new(w, x, y, z);
        self.sum += (q.transpose() * q) * weight;
        self.weight_sum += weight;
        self.count += 1;
    }

    /// Number of samples added
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when no samples have been added
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Sum of the weights of all samples added
    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    /// The accumulation matrix, normalized by the weight sum
    ///
    /// A weight sum of exactly zero skips the division and returns the raw sum.
    pub fn matrix(&self) -> Matrix4<f64> {
        if self.weight_sum != 0.0 {
            self.sum / self.weight_sum
        } else {
            self.sum
        }
    }

    /// The rotation best representing every sample added so far
    ///
    /// Empty accumulators and all-zero accumulation matrices (every weight
    /// zero) yield the identity rotation.
    pub fn dominant_rotation(&self) -> Quaternion {
        if self.is_empty() {
            return Quaternion::identity();
        }

        let matrix = self.matrix();
        if matrix.iter().all(|v| *v == 0.0) {
            debug!(
                "accumulation matrix of {} samples is zero, using identity",
                self.count
            );
            return Quaternion::identity();
        }

        dominant_eigenvector(matrix).unwrap_or_else(|| {
            warn!(
                "eigen-decomposition of {} samples did not converge, using identity",
                self.count
            );
            Quaternion::identity()
        })
    }
}

/// Eigenvector of the algebraically largest eigenvalue, read as [w, x, y, z]
///
/// Ties keep the first index in solver order.
fn dominant_eigenvector(matrix: Matrix4<f64>) -> Option<Quaternion> {
    let eigen = SymmetricEigen::try_new(matrix, EIGEN_EPSILON, EIGEN_MAX_ITERATIONS)?;
    trace!("accumulation eigenvalues: {:?}", eigen.eigenvalues.as_slice());

    let mut best = 0;
    for (i, value) in eigen.eigenvalues.iter().enumerate().skip(1) {
        if *value > eigen.eigenvalues[best] {
            best = i;
        }
    }

    let v = eigen.eigenvectors.column(best);
    Some(Quaternion::from_wxyz([v[0], v[1], v[2], v[3]]))
}

/// Average a set of rotations
///
/// Returns the identity rotation for an empty set.
///
/// # Example
///
/// ```
/// use rig_math::{average, Quaternion};
///
/// let q = Quaternion::new(0.0, 0.0, 0.0, 1.0);
/// let avg = average(&[q, q]);
/// assert!((avg.dot(&q).abs() - 1.0).abs() < 1e-12);
/// ```
pub fn average(rotations: &[Quaternion]) -> Quaternion {
    let mut accumulator = RotationAccumulator::new();
    for rotation in rotations {
        accumulator.add(rotation);
    }
    accumulator.dominant_rotation()
}

/// Average a set of rotations with one weight per rotation
///
/// The weights must pair 1:1 with the rotations; use
/// [`average_weighted_padded`] to fill missing weights with 1.0 instead.
/// An empty rotation set returns the identity rotation.
///
/// # Errors
/// * `AverageError::LengthMismatch` - If the sequences differ in length
pub fn average_weighted(
    rotations: &[Quaternion],
    weights: &[f64],
) -> Result<Quaternion, AverageError> {
    if rotations.is_empty() {
        return Ok(Quaternion::identity());
    }

    if rotations.len() != weights.len() {
        return Err(AverageError::LengthMismatch {
            samples: rotations.len(),
            weights: weights.len(),
        });
    }

    let mut accumulator = RotationAccumulator::new();
    for (rotation, weight) in rotations.iter().zip(weights) {
        accumulator.add_weighted(rotation, *weight);
    }
    Ok(accumulator.dominant_rotation())
}

/// Reconcile a weight sequence with `count` samples
///
/// Missing weights are filled with [`DEFAULT_WEIGHT`]; surplus weights are
/// dropped.
pub fn pad_weights(weights: &[f64], count: usize) -> Vec<f64> {
    let mut padded = weights.to_vec();
    padded.resize(count, DEFAULT_WEIGHT);
    padded
}

/// Weighted average that pads (or truncates) the weights to match the
/// rotations before averaging, so it cannot fail
pub fn average_weighted_padded(rotations: &[Quaternion], weights: &[f64]) -> Quaternion {
    if weights.len() != rotations.len() {
        debug!(
            "reconciling {} weights with {} rotations",
            weights.len(),
            rotations.len()
        );
    }

    let mut accumulator = RotationAccumulator::new();
    for (rotation, weight) in rotations.iter().zip(pad_weights(weights, rotations.len())) {
        accumulator.add_weighted(rotation, weight);
    }
    accumulator.dominant_rotation()
}
