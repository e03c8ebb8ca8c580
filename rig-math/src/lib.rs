//! rig-math - Rotation averaging and transform math for rigging computations
//!
//! This crate provides the numeric routines behind rotation blending:
//!
//! - **Quaternion** - unit quaternion rotations and conversions
//! - **Average** - least-squares rotation averaging by eigen-decomposition
//! - **Euler** - rotation orders and Euler conversions, Euler-valued averaging
//! - **Transform** - 4x4 compose/decompose and transform averaging
//! - **Interpolate** - lerp and shortest-arc slerp
//! - **Vector** - linear vector averaging
//!
//! Every operation is a pure function of its inputs and safe to call from
//! any number of threads.
//!
//! # Example
//!
//! ```
//! use rig_math::{average_weighted, slerp, Quaternion};
//! use nalgebra::Vector3;
//!
//! let a = Quaternion::from_axis_angle(&Vector3::x(), 0.5);
//! let b = Quaternion::from_axis_angle(&Vector3::y(), 1.0);
//!
//! let avg = average_weighted(&[a, b], &[1.0, 1.0]).unwrap();
//! let mid = slerp(&a, &b, 0.5);
//! assert!((avg.dot(&mid).abs() - 1.0).abs() < 1e-12);
//! ```

pub mod average;
pub mod error;
pub mod euler;
pub mod interpolate;
pub mod quaternion;
pub mod samples;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use average::{
    average, average_weighted, average_weighted_padded, pad_weights, RotationAccumulator,
    DEFAULT_WEIGHT,
};
pub use error::AverageError;
pub use euler::{
    average_euler, average_weighted_euler, EulerRotation, ParseRotationOrderError, RotationOrder,
};
pub use interpolate::{lerp, lerp_matrix, lerp_vector, slerp};
pub use quaternion::Quaternion;
pub use samples::RotationSetFile;
pub use transform::{
    average_matrix, average_weighted_matrix, compose_matrix, compose_matrix_euler,
    decompose_matrix, extract_euler, extract_quaternion, extract_rotation_matrix, extract_scale,
    extract_translation, Decomposition,
};
pub use vector::{average_vector, average_weighted_vector};
