//! Quaternion implementation for 3D rotations
//!
//! Unit quaternions are the rotation representation every averaging and
//! interpolation routine in this crate works in. Components are stored as
//! (x, y, z, w) with `w` the scalar part.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::{Mul, Neg};

/// Norm below which a quaternion is treated as degenerate
const NORM_EPSILON: f64 = 1e-10;

/// A quaternion representing a rotation in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    /// First imaginary component (i)
    pub x: f64,
    /// Second imaginary component (j)
    pub y: f64,
    /// Third imaginary component (k)
    pub z: f64,
    /// Real/scalar component
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    /// Create a new quaternion from (x, y, z, w)
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Create an identity quaternion (no rotation)
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }

    /// Build from a scalar-first `[w, x, y, z]` array
    pub fn from_wxyz(q: [f64; 4]) -> Self {
        Self::new(q[1], q[2], q[3], q[0])
    }

    /// Scalar-first `[w, x, y, z]` array, the layout used by the
    /// accumulation matrix
    pub fn to_wxyz(&self) -> [f64; 4] {
        [self.w, self.x, self.y, self.z]
    }

    /// Create a quaternion from axis-angle representation
    ///
    /// The axis is expected to be unit length.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Self {
        let half_angle = angle / 2.0;
        let sin_half_angle = half_angle.sin();

        Self {
            x: axis[0] * sin_half_angle,
            y: axis[1] * sin_half_angle,
            z: axis[2] * sin_half_angle,
            w: half_angle.cos(),
        }
    }

    /// Convert to a unit axis and an angle in [0, 2π]
    ///
    /// The identity rotation reports the X axis with a zero angle.
    pub fn to_axis_angle(&self) -> (Vector3<f64>, f64) {
        let q = self.normalize();
        let sin_half = (q.x * q.x + q.y * q.y + q.z * q.z).sqrt();

        if sin_half < NORM_EPSILON {
            return (Vector3::x(), 0.0);
        }

        let angle = 2.0 * sin_half.atan2(q.w);
        let axis = Vector3::new(q.x / sin_half, q.y / sin_half, q.z / sin_half);
        (axis, angle)
    }

    /// Calculate the norm (magnitude) of the quaternion
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Four-dimensional dot product
    pub fn dot(&self, other: &Self) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Scale to unit length; near-zero quaternions become the identity
    pub fn normalize(&self) -> Self {
        let norm = self.norm();
        if norm < NORM_EPSILON {
            return Self::identity();
        }
        let inv = norm.recip();
        Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv)
    }

    /// Negated vector part; the inverse rotation for unit quaternions
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Product of two pure quaternions (w ignored on both sides)
    ///
    /// [0, a] * [0, b] = [-a·b, a×b], roughly half the work of a full product.
    pub fn pure_multiply(&self, rhs: &Self) -> Self {
        let a = self.vector();
        let b = rhs.vector();
        let cross = a.cross(&b);
        Self::new(cross.x, cross.y, cross.z, -a.dot(&b))
    }

    /// Geodesic angle in radians between the rotations `self` and `other`
    ///
    /// Insensitive to the sign of either quaternion.
    pub fn angle_to(&self, other: &Self) -> f64 {
        let cos_half = self.normalize().dot(&other.normalize()).abs().min(1.0);
        2.0 * cos_half.acos()
    }

    fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Rotate a 3D vector by this rotation (q · v · q*)
    pub fn rotate_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let rotated = *self * Quaternion::new(v.x, v.y, v.z, 0.0) * self.conjugate();
        rotated.vector()
    }

    /// Rotation matrix acting on column vectors; the input is normalized first
    pub fn to_rotation_matrix(&self) -> Matrix3<f64> {
        let Self { x, y, z, w } = self.normalize();
        let (x2, y2, z2) = (x + x, y + y, z + z);

        Matrix3::new(
            1.0 - y * y2 - z * z2,
            x * y2 - w * z2,
            x * z2 + w * y2,
            x * y2 + w * z2,
            1.0 - x * x2 - z * z2,
            y * z2 - w * x2,
            x * z2 - w * y2,
            y * z2 + w * x2,
            1.0 - x * x2 - y * y2,
        )
    }

    /// Convert an orthonormal 3x3 rotation matrix to a quaternion
    ///
    /// Pivots on the largest of the trace and the diagonal terms, so half
    /// turns keep the relative signs of their axis components. The overall
    /// sign of the result is not fixed.
    pub fn from_rotation_matrix(m: &Matrix3<f64>) -> Self {
        let rotation = Rotation3::from_matrix_unchecked(*m);
        let coords = UnitQuaternion::from_rotation_matrix(&rotation)
            .into_inner()
            .coords;
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }
}

// Hamilton product: (a * b) applies b first, then a
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let (a, b) = (self.vector(), rhs.vector());
        let v = b * self.w + a * rhs.w + a.cross(&b);
        Self::new(v.x, v.y, v.z, self.w * rhs.w - a.dot(&b))
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
