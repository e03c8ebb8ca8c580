//! Euler rotations with explicit rotation order
//!
//! Angles are stored in radians. The rotation order names the axes in the
//! order they are applied, so `Xyz` rotates about X first, then Y, then Z
//! (R = Rz · Ry · Rx for column vectors).
//!
//! The averaging helpers at the bottom of this module are the glue between
//! Euler-valued inputs and the quaternion averager: each sample is converted
//! with its own rotation order, weights are padded to the sample count, and
//! the average is re-expressed in the requested output order.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::average::{average, average_weighted_padded};
use crate::quaternion::Quaternion;

/// Below this cosine of the middle angle the decomposition is treated as
/// gimbal locked
const GIMBAL_EPSILON: f64 = 1e-9;

/// Error when parsing a rotation order from text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown rotation order '{0}', expected one of xyz, yzx, zxy, xzy, yxz, zyx")]
pub struct ParseRotationOrderError(pub String);

/// Order in which the three axis rotations are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationOrder {
    #[default]
    Xyz,
    Yzx,
    Zxy,
    Xzy,
    Yxz,
    Zyx,
}

impl RotationOrder {
    /// All orders in index order
    pub const ALL: [RotationOrder; 6] = [
        RotationOrder::Xyz,
        RotationOrder::Yzx,
        RotationOrder::Zxy,
        RotationOrder::Xzy,
        RotationOrder::Yxz,
        RotationOrder::Zyx,
    ];

    /// Order from its integer index, clamping out-of-range values into 0..=5
    pub fn from_index(index: i32) -> Self {
        Self::ALL[index.clamp(0, 5) as usize]
    }

    /// Integer index of this order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Axis indices (0 = X, 1 = Y, 2 = Z) in application order
    pub fn axes(self) -> [usize; 3] {
        match self {
            RotationOrder::Xyz => [0, 1, 2],
            RotationOrder::Yzx => [1, 2, 0],
            RotationOrder::Zxy => [2, 0, 1],
            RotationOrder::Xzy => [0, 2, 1],
            RotationOrder::Yxz => [1, 0, 2],
            RotationOrder::Zyx => [2, 1, 0],
        }
    }

    /// True for the cyclic orders (xyz, yzx, zxy)
    fn is_even(self) -> bool {
        matches!(
            self,
            RotationOrder::Xyz | RotationOrder::Yzx | RotationOrder::Zxy
        )
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RotationOrder::Xyz => "xyz",
            RotationOrder::Yzx => "yzx",
            RotationOrder::Zxy => "zxy",
            RotationOrder::Xzy => "xzy",
            RotationOrder::Yxz => "yxz",
            RotationOrder::Zyx => "zyx",
        };
        write!(f, "{name}")
    }
}

impl FromStr for RotationOrder {
    type Err = ParseRotationOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseRotationOrderError(s.to_string()))
    }
}

/// Euler rotation in radians about X, Y and Z
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerRotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub order: RotationOrder,
}

impl EulerRotation {
    pub fn new(x: f64, y: f64, z: f64, order: RotationOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Zero rotation in the given order
    pub fn identity(order: RotationOrder) -> Self {
        Self::new(0.0, 0.0, 0.0, order)
    }

    /// Build from angles in degrees
    pub fn from_degrees(x: f64, y: f64, z: f64, order: RotationOrder) -> Self {
        Self::new(x.to_radians(), y.to_radians(), z.to_radians(), order)
    }

    /// Angles in degrees as [x, y, z]
    pub fn to_degrees(&self) -> [f64; 3] {
        [self.x.to_degrees(), self.y.to_degrees(), self.z.to_degrees()]
    }

    fn angles(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Equivalent unit quaternion
    pub fn to_quaternion(&self) -> Quaternion {
        let angles = self.angles();
        let [first, second, third] = self.order.axes();

        // Applied right to left: first axis, then second, then third
        axis_quaternion(third, angles[third])
            * axis_quaternion(second, angles[second])
            * axis_quaternion(first, angles[first])
    }

    /// Equivalent 3x3 rotation matrix
    pub fn to_rotation_matrix(&self) -> Matrix3<f64> {
        self.to_quaternion().to_rotation_matrix()
    }

    /// Decompose a quaternion into angles for the given order
    pub fn from_quaternion(q: &Quaternion, order: RotationOrder) -> Self {
        Self::from_rotation_matrix(&q.to_rotation_matrix(), order)
    }

    /// Decompose an orthonormal rotation matrix into angles for the given order
    ///
    /// The middle angle lies in [-π/2, π/2]. At gimbal lock the last axis
    /// angle is set to zero and the first axis absorbs the remaining rotation.
    pub fn from_rotation_matrix(m: &Matrix3<f64>, order: RotationOrder) -> Self {
        let [i, j, k] = order.axes();
        let s = if order.is_even() { 1.0 } else { -1.0 };

        let sin_middle = (-s * m[(k, i)]).clamp(-1.0, 1.0);
        let middle = sin_middle.asin();

        let (first, last) = if middle.cos() > GIMBAL_EPSILON {
            (
                (s * m[(k, j)]).atan2(m[(k, k)]),
                (s * m[(j, i)]).atan2(m[(i, i)]),
            )
        } else {
            ((-s * m[(j, k)]).atan2(m[(j, j)]), 0.0)
        };

        let mut angles = [0.0; 3];
        angles[i] = first;
        angles[j] = middle;
        angles[k] = last;

        Self::new(angles[0], angles[1], angles[2], order)
    }

    /// Same rotation expressed in another order
    pub fn reorder(&self, order: RotationOrder) -> Self {
        if order == self.order {
            return *self;
        }
        Self::from_quaternion(&self.to_quaternion(), order)
    }
}

fn axis_quaternion(axis: usize, angle: f64) -> Quaternion {
    let mut unit = Vector3::zeros();
    unit[axis] = 1.0;
    Quaternion::from_axis_angle(&unit, angle)
}

/// Average Euler rotations, each interpreted in its own rotation order
///
/// Returns the identity in `output_order` when `rotations` is empty.
pub fn average_euler(rotations: &[EulerRotation], output_order: RotationOrder) -> EulerRotation {
    if rotations.is_empty() {
        return EulerRotation::identity(output_order);
    }

    let quaternions: Vec<Quaternion> = rotations.iter().map(|r| r.to_quaternion()).collect();
    EulerRotation::from_quaternion(&average(&quaternions), output_order)
}

/// Weighted Euler average; missing weights count as 1.0 and surplus
/// weights are ignored
pub fn average_weighted_euler(
    rotations: &[EulerRotation],
    weights: &[f64],
    output_order: RotationOrder,
) -> EulerRotation {
    if rotations.is_empty() {
        return EulerRotation::identity(output_order);
    }

    let quaternions: Vec<Quaternion> = rotations.iter().map(|r| r.to_quaternion()).collect();
    EulerRotation::from_quaternion(
        &average_weighted_padded(&quaternions, weights),
        output_order,
    )
}
