//! 4x4 transform composition and decomposition
//!
//! Matrices use the column-vector convention: basis vectors are the first
//! three columns, translation is the fourth column and a transform composes
//! as M = T · R · S. Shear is not supported; inputs are assumed to describe
//! an orthogonal basis with per-axis scale.

use nalgebra::{Matrix3, Matrix4, Vector3};

use crate::average::{average, average_weighted};
use crate::error::AverageError;
use crate::euler::{EulerRotation, RotationOrder};
use crate::quaternion::Quaternion;
use crate::vector::{average_vector, average_weighted_vector};

/// Scale magnitudes below this are treated as a collapsed axis
const SCALE_EPSILON: f64 = 1e-10;

/// Translation, rotation and scale extracted from a transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decomposition {
    pub translation: Vector3<f64>,
    pub rotation: Quaternion,
    pub scale: Vector3<f64>,
}

impl Decomposition {
    /// Recompose into a 4x4 transform
    pub fn to_matrix(&self) -> Matrix4<f64> {
        compose_matrix(&self.translation, &self.rotation, &self.scale)
    }
}

/// Build T · R · S from its parts
pub fn compose_matrix(
    translation: &Vector3<f64>,
    rotation: &Quaternion,
    scale: &Vector3<f64>,
) -> Matrix4<f64> {
    compose_from_rotation_matrix(translation, &rotation.to_rotation_matrix(), scale)
}

/// Build T · R · S with the rotation given as Euler angles
pub fn compose_matrix_euler(
    translation: &Vector3<f64>,
    rotation: &EulerRotation,
    scale: &Vector3<f64>,
) -> Matrix4<f64> {
    compose_from_rotation_matrix(translation, &rotation.to_rotation_matrix(), scale)
}

fn compose_from_rotation_matrix(
    translation: &Vector3<f64>,
    rotation: &Matrix3<f64>,
    scale: &Vector3<f64>,
) -> Matrix4<f64> {
    let basis = rotation * Matrix3::from_diagonal(scale);

    let mut matrix = basis.to_homogeneous();
    matrix.fixed_view_mut::<3, 1>(0, 3).copy_from(translation);
    matrix
}

/// Translation component (fourth column)
pub fn extract_translation(matrix: &Matrix4<f64>) -> Vector3<f64> {
    matrix.fixed_view::<3, 1>(0, 3).into_owned()
}

/// Per-axis scale: the length of each basis column
///
/// A negative determinant means an odd number of reflections. Two
/// reflections are indistinguishable from a half turn, so only the single
/// reflection case is represented, by negating the z scale.
pub fn extract_scale(matrix: &Matrix4<f64>) -> Vector3<f64> {
    let basis = matrix.fixed_view::<3, 3>(0, 0);

    let mut scale = Vector3::new(
        basis.column(0).norm(),
        basis.column(1).norm(),
        basis.column(2).norm(),
    );

    if basis.determinant() < 0.0 {
        scale.z = -scale.z;
    }

    scale
}

/// Rotation part with the scale divided out of each basis column
///
/// A collapsed axis (zero scale) leaves a zero column.
pub fn extract_rotation_matrix(matrix: &Matrix4<f64>) -> Matrix3<f64> {
    rotation_with_scale(matrix, &extract_scale(matrix))
}

fn rotation_with_scale(matrix: &Matrix4<f64>, scale: &Vector3<f64>) -> Matrix3<f64> {
    let basis = matrix.fixed_view::<3, 3>(0, 0);
    let mut rotation = Matrix3::zeros();

    for axis in 0..3 {
        if scale[axis].abs() > SCALE_EPSILON {
            rotation.set_column(axis, &(basis.column(axis) / scale[axis]));
        }
    }

    rotation
}

/// Rotation part as a quaternion
pub fn extract_quaternion(matrix: &Matrix4<f64>) -> Quaternion {
    Quaternion::from_rotation_matrix(&extract_rotation_matrix(matrix))
}

/// Rotation part as Euler angles in the given order
pub fn extract_euler(matrix: &Matrix4<f64>, order: RotationOrder) -> EulerRotation {
    EulerRotation::from_rotation_matrix(&extract_rotation_matrix(matrix), order)
}

/// Split a transform into translation, rotation and scale in one pass
pub fn decompose_matrix(matrix: &Matrix4<f64>) -> Decomposition {
    let scale = extract_scale(matrix);
    let rotation = rotation_with_scale(matrix, &scale);

    Decomposition {
        translation: extract_translation(matrix),
        rotation: Quaternion::from_rotation_matrix(&rotation),
        scale,
    }
}

fn decompose_all(matrices: &[Matrix4<f64>]) -> (Vec<Vector3<f64>>, Vec<Quaternion>, Vec<Vector3<f64>>) {
    let mut translations = Vec::with_capacity(matrices.len());
    let mut rotations = Vec::with_capacity(matrices.len());
    let mut scales = Vec::with_capacity(matrices.len());

    for matrix in matrices {
        let parts = decompose_matrix(matrix);
        translations.push(parts.translation);
        rotations.push(parts.rotation);
        scales.push(parts.scale);
    }

    (translations, rotations, scales)
}

/// Average transforms component-wise
///
/// Translation and scale are averaged linearly and rotation through the
/// quaternion averager. Returns the identity for an empty set.
pub fn average_matrix(matrices: &[Matrix4<f64>]) -> Matrix4<f64> {
    if matrices.is_empty() {
        return Matrix4::identity();
    }

    let (translations, rotations, scales) = decompose_all(matrices);

    compose_matrix(
        &average_vector(&translations),
        &average(&rotations),
        &average_vector(&scales),
    )
}

/// Weighted component-wise transform average
///
/// # Errors
/// * `AverageError::LengthMismatch` - If the sequences differ in length
pub fn average_weighted_matrix(
    matrices: &[Matrix4<f64>],
    weights: &[f64],
) -> Result<Matrix4<f64>, AverageError> {
    if matrices.is_empty() {
        return Ok(Matrix4::identity());
    }

    let (translations, rotations, scales) = decompose_all(matrices);

    Ok(compose_matrix(
        &average_weighted_vector(&translations, weights)?,
        &average_weighted(&rotations, weights)?,
        &average_weighted_vector(&scales, weights)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};
    use test_helpers::assert_wxyz_eq_up_to_sign;

    fn sample_transform() -> (Vector3<f64>, Quaternion, Vector3<f64>) {
        (
            Vector3::new(1.0, -2.0, 3.5),
            Quaternion::from_axis_angle(&Vector3::new(1.0, 2.0, -0.5).normalize(), 1.3),
            Vector3::new(2.0, 0.5, 1.5),
        )
    }

    #[test]
    fn test_compose_layout() {
        let translation = Vector3::new(4.0, 5.0, 6.0);
        let rotation = Quaternion::from_axis_angle(&Vector3::z(), FRAC_PI_2);
        let scale = Vector3::new(2.0, 2.0, 2.0);

        let m = compose_matrix(&translation, &rotation, &scale);

        // x basis rotates onto y and is scaled by 2
        assert_relative_eq!(m[(1, 0)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(m[(0, 0)], 0.0, epsilon = 1e-12);
        assert_eq!(m[(0, 3)], 4.0);
        assert_eq!(m[(1, 3)], 5.0);
        assert_eq!(m[(2, 3)], 6.0);
        assert_eq!(m[(3, 3)], 1.0);
        assert_eq!(m[(3, 0)], 0.0);
    }

    #[test]
    fn test_decompose_recovers_parts() {
        let (translation, rotation, scale) = sample_transform();
        let m = compose_matrix(&translation, &rotation, &scale);

        let parts = decompose_matrix(&m);
        assert_relative_eq!(parts.translation, translation, epsilon = 1e-12);
        assert_relative_eq!(parts.scale, scale, epsilon = 1e-12);
        assert_wxyz_eq_up_to_sign(parts.rotation.to_wxyz(), rotation.to_wxyz(), 1e-10);

        assert_relative_eq!(parts.to_matrix(), m, epsilon = 1e-10);
    }

    #[test]
    fn test_negative_determinant_negates_z_scale() {
        let (translation, rotation, _) = sample_transform();
        let scale = Vector3::new(1.0, 1.0, -3.0);
        let m = compose_matrix(&translation, &rotation, &scale);

        assert_relative_eq!(extract_scale(&m), scale, epsilon = 1e-12);

        let parts = decompose_matrix(&m);
        assert_relative_eq!(parts.to_matrix(), m, epsilon = 1e-10);
    }

    #[test]
    fn test_collapsed_axis_leaves_zero_column() {
        let m = compose_matrix(
            &Vector3::zeros(),
            &Quaternion::identity(),
            &Vector3::new(1.0, 0.0, 1.0),
        );

        let rotation = extract_rotation_matrix(&m);
        assert_eq!(rotation.column(1).norm(), 0.0);
        assert_relative_eq!(rotation[(0, 0)], 1.0);
        assert_relative_eq!(rotation[(2, 2)], 1.0);
    }

    #[test]
    fn test_euler_compose_and_extract() {
        let euler = EulerRotation::from_degrees(20.0, -35.0, 50.0, RotationOrder::Yxz);
        let m = compose_matrix_euler(&Vector3::zeros(), &euler, &Vector3::new(3.0, 3.0, 3.0));

        let back = extract_euler(&m, RotationOrder::Yxz);
        assert_relative_eq!(back.x, euler.x, epsilon = 1e-10);
        assert_relative_eq!(back.y, euler.y, epsilon = 1e-10);
        assert_relative_eq!(back.z, euler.z, epsilon = 1e-10);

        assert_wxyz_eq_up_to_sign(
            extract_quaternion(&m).to_wxyz(),
            euler.to_quaternion().to_wxyz(),
            1e-10,
        );
    }

    #[test]
    fn test_exact_half_turn_round_trips() {
        // Half turn about (1, -1, 0) / sqrt(2), translated
        let m = Matrix4::new(
            0.0, -1.0, 0.0, 3.0, //
            -1.0, 0.0, 0.0, -1.0, //
            0.0, 0.0, -1.0, 2.0, //
            0.0, 0.0, 0.0, 1.0,
        );

        let parts = decompose_matrix(&m);
        let expected = Quaternion::from_axis_angle(&Vector3::new(1.0, -1.0, 0.0).normalize(), PI);
        assert_wxyz_eq_up_to_sign(parts.rotation.to_wxyz(), expected.to_wxyz(), 1e-12);
        assert_wxyz_eq_up_to_sign(extract_quaternion(&m).to_wxyz(), expected.to_wxyz(), 1e-12);
        assert_relative_eq!(parts.scale, Vector3::new(1.0, 1.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(parts.to_matrix(), m, epsilon = 1e-12);

        assert_relative_eq!(average_matrix(&[m]), m, epsilon = 1e-9);
        assert_relative_eq!(average_matrix(&[m, m, m]), m, epsilon = 1e-9);
    }

    #[test]
    fn test_average_matrix() {
        let a = compose_matrix(
            &Vector3::new(0.0, 0.0, 0.0),
            &Quaternion::identity(),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let b = compose_matrix(
            &Vector3::new(2.0, 4.0, -2.0),
            &Quaternion::from_axis_angle(&Vector3::x(), FRAC_PI_2),
            &Vector3::new(3.0, 1.0, 1.0),
        );

        let avg = decompose_matrix(&average_matrix(&[a, b]));
        assert_relative_eq!(avg.translation, Vector3::new(1.0, 2.0, -1.0), epsilon = 1e-10);
        assert_relative_eq!(avg.scale, Vector3::new(2.0, 1.0, 1.0), epsilon = 1e-10);

        let expected = Quaternion::from_axis_angle(&Vector3::x(), FRAC_PI_2 / 2.0);
        assert_wxyz_eq_up_to_sign(avg.rotation.to_wxyz(), expected.to_wxyz(), 1e-9);

        assert_eq!(average_matrix(&[]), Matrix4::identity());
    }

    #[test]
    fn test_average_weighted_matrix() {
        let a = compose_matrix(
            &Vector3::new(0.0, 0.0, 0.0),
            &Quaternion::identity(),
            &Vector3::new(1.0, 1.0, 1.0),
        );
        let b = compose_matrix(
            &Vector3::new(4.0, 0.0, 0.0),
            &Quaternion::identity(),
            &Vector3::new(1.0, 1.0, 1.0),
        );

        let avg = average_weighted_matrix(&[a, b], &[3.0, 1.0]).unwrap();
        assert_relative_eq!(extract_translation(&avg), Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-10);

        assert_eq!(
            average_weighted_matrix(&[a, b], &[1.0]),
            Err(AverageError::LengthMismatch {
                samples: 2,
                weights: 1
            })
        );
        assert_eq!(average_weighted_matrix(&[], &[]), Ok(Matrix4::identity()));
    }
}
