//! Test helpers for rig-math
//!
//! Common utilities shared by the rig-math unit and integration tests:
//! workspace discovery, an output directory for test artifacts, seeded
//! rotation samples and sign-insensitive quaternion comparisons.
//!
//! Quaternions are passed around here as plain `[w, x, y, z]` arrays so the
//! helpers can be used from inside `rig-math`'s own unit tests without a
//! circular type dependency.

use once_cell::sync::Lazy;
use rand::Rng;
use std::env;
use std::path::{Path, PathBuf};

/// Error type for test helper operations
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

/// Returns the path to the project root directory.
///
/// Walks up from the current directory until a Cargo.toml containing a
/// `[workspace]` table is found.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// Returns the directory where tests may write artifacts such as sample
/// files, creating it if needed.
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Returns a path within the output directory.
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}

/// Draw a uniformly distributed unit quaternion as `[w, x, y, z]`.
///
/// Uses Shoemake's subgroup algorithm so samples cover SO(3) evenly.
pub fn random_unit_wxyz<R: Rng>(rng: &mut R) -> [f64; 4] {
    let u1: f64 = rng.random();
    let u2: f64 = rng.random_range(0.0..std::f64::consts::TAU);
    let u3: f64 = rng.random_range(0.0..std::f64::consts::TAU);

    let a = (1.0 - u1).sqrt();
    let b = u1.sqrt();

    [b * u3.cos(), a * u2.sin(), a * u2.cos(), b * u3.sin()]
}

/// True when `a` and `b` agree component-wise within `epsilon`, allowing a
/// global sign flip (q and -q are the same rotation).
pub fn wxyz_eq_up_to_sign(a: [f64; 4], b: [f64; 4], epsilon: f64) -> bool {
    let same = a.iter().zip(b.iter()).all(|(l, r)| (l - r).abs() <= epsilon);
    let flipped = a.iter().zip(b.iter()).all(|(l, r)| (l + r).abs() <= epsilon);
    same || flipped
}

/// Assert two `[w, x, y, z]` quaternions match up to sign.
#[track_caller]
pub fn assert_wxyz_eq_up_to_sign(actual: [f64; 4], expected: [f64; 4], epsilon: f64) {
    assert!(
        wxyz_eq_up_to_sign(actual, expected, epsilon),
        "quaternions differ beyond sign: actual={actual:?} expected={expected:?} epsilon={epsilon:e}"
    );
}

/// Assert a `[w, x, y, z]` quaternion has unit length.
#[track_caller]
pub fn assert_unit_wxyz(q: [f64; 4], epsilon: f64) {
    let norm = q.iter().map(|c| c * c).sum::<f64>().sqrt();
    approx::assert_abs_diff_eq!(norm, 1.0, epsilon = epsilon);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_project_root_exists() {
        let root = find_project_root().expect("Failed to find project root");
        assert!(root.exists());
        assert!(root.join("Cargo.toml").exists());
    }

    #[test]
    fn test_output_dir_created() {
        let output = get_output_dir();
        assert!(output.exists());
        assert!(output.is_dir());
    }

    #[test]
    fn test_output_path() {
        let path = output_path("samples.json");
        assert_eq!(path, get_output_dir().join("samples.json"));
    }

    #[test]
    fn test_random_quaternions_are_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_unit_wxyz(random_unit_wxyz(&mut rng), 1e-12);
        }
    }

    #[test]
    fn test_sign_insensitive_compare() {
        let q = [0.5, -0.5, 0.5, 0.5];
        let neg = [-0.5, 0.5, -0.5, -0.5];
        assert!(wxyz_eq_up_to_sign(q, neg, 1e-12));
        assert!(!wxyz_eq_up_to_sign(q, [0.5, 0.5, 0.5, 0.5], 1e-12));
    }
}
