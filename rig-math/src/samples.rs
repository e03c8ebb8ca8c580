//! JSON storage for rotation sample sets
//!
//! A sample file holds a list of quaternions and an optional list of
//! weights:
//!
//! ```text
//! {
//!   "rotations": [ { "x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0 }, ... ],
//!   "weights": [ 1.0, 0.5 ]
//! }
//! ```
//!
//! Weight lists may be shorter or longer than the rotation list; they are
//! reconciled when averaging, missing entries counting as 1.0.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::average::{average, average_weighted_padded};
use crate::quaternion::Quaternion;

/// A set of rotation samples with optional per-sample weights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationSetFile {
    pub rotations: Vec<Quaternion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weights: Vec<f64>,
}

impl RotationSetFile {
    pub fn new(rotations: Vec<Quaternion>, weights: Vec<f64>) -> Self {
        Self { rotations, weights }
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }

    /// Load from JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Average the samples, honoring the stored weights when `weighted` is set
    pub fn average(&self, weighted: bool) -> Quaternion {
        if weighted {
            average_weighted_padded(&self.rotations, &self.weights)
        } else {
            average(&self.rotations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_helpers::{assert_wxyz_eq_up_to_sign, output_path};

    #[test]
    fn test_parse_without_weights() {
        let json = r#"{ "rotations": [ { "x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0 } ] }"#;
        let set: RotationSetFile = serde_json::from_str(json).unwrap();

        assert_eq!(set.rotations, vec![Quaternion::identity()]);
        assert!(set.weights.is_empty());
    }

    #[test]
    fn test_missing_rotations_is_an_error() {
        let result: Result<RotationSetFile, _> = serde_json::from_str(r#"{ "weights": [1.0] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let set = RotationSetFile::new(
            vec![Quaternion::identity(), Quaternion::new(0.0, 1.0, 0.0, 0.0)],
            vec![0.25],
        );

        let path = output_path("rotation_set_round_trip.json");
        set.save_to_file(&path).unwrap();
        let loaded = RotationSetFile::load_from_file(&path).unwrap();
        assert_eq!(loaded, set);
    }

    #[test]
    fn test_invalid_json_maps_to_invalid_data() {
        let path = output_path("rotation_set_invalid.json");
        std::fs::write(&path, "not json").unwrap();

        let err = RotationSetFile::load_from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_weighted_average_uses_padding() {
        let set = RotationSetFile::new(
            vec![Quaternion::identity(), Quaternion::new(0.0, 1.0, 0.0, 0.0)],
            vec![0.0],
        );

        // The first sample has zero weight; the second falls back to 1.0
        let avg = set.average(true);
        assert_wxyz_eq_up_to_sign(avg.to_wxyz(), [0.0, 0.0, 1.0, 0.0], 1e-12);
    }
}
