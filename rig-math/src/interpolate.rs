//! Linear and spherical interpolation

use nalgebra::{Matrix4, Vector3};

use crate::quaternion::Quaternion;
use crate::transform::{compose_matrix, decompose_matrix};

/// Above this cosine the arc is short enough that slerp degrades to a
/// normalized lerp
const SLERP_LINEAR_THRESHOLD: f64 = 1.0 - 1e-9;

/// Linear interpolation between two scalars
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Linear interpolation between two vectors
pub fn lerp_vector(a: &Vector3<f64>, b: &Vector3<f64>, t: f64) -> Vector3<f64> {
    a + (b - a) * t
}

/// Spherical linear interpolation along the shorter arc
///
/// `t = 0` returns `a`, `t = 1` returns `b` (or `-b` when that is the
/// shorter way round). Inputs are expected to be unit quaternions.
pub fn slerp(a: &Quaternion, b: &Quaternion, t: f64) -> Quaternion {
    let mut cos_theta = a.dot(b);
    let mut end = *b;

    if cos_theta < 0.0 {
        end = -end;
        cos_theta = -cos_theta;
    }

    let (scale_a, scale_b) = if cos_theta > SLERP_LINEAR_THRESHOLD {
        (1.0 - t, t)
    } else {
        let theta = cos_theta.min(1.0).acos();
        let sin_theta = theta.sin();
        (
            ((1.0 - t) * theta).sin() / sin_theta,
            (t * theta).sin() / sin_theta,
        )
    };

    let blended = Quaternion::new(
        a.x * scale_a + end.x * scale_b,
        a.y * scale_a + end.y * scale_b,
        a.z * scale_a + end.z * scale_b,
        a.w * scale_a + end.w * scale_b,
    );

    if cos_theta > SLERP_LINEAR_THRESHOLD {
        blended.normalize()
    } else {
        blended
    }
}

/// Interpolate two transforms component-wise
///
/// Translation and scale are lerped, rotation is slerped.
pub fn lerp_matrix(a: &Matrix4<f64>, b: &Matrix4<f64>, t: f64) -> Matrix4<f64> {
    let from = decompose_matrix(a);
    let to = decompose_matrix(b);

    compose_matrix(
        &lerp_vector(&from.translation, &to.translation, t),
        &slerp(&from.rotation, &to.rotation, t),
        &lerp_vector(&from.scale, &to.scale, t),
    )
}
