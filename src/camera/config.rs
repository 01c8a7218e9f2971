//! Camera configuration files.
//!
//! A configuration describes one camera under the `cam0` key:
//!
//! ```yaml
//! cam0:
//!   camera_model: PINHOLE_CAMERA_BROWN
//!   camera_id: 0
//!   intrinsics: [461.629, 460.152, 362.680, 246.049]
//!   distortion: [-0.28340811, 0.07395907, 0.0, 0.00019359, 1.76187114e-05]
//!   resolution: [752, 480]
//! ```
//!
//! `camera_id` and `distortion` are optional, as is
//! `max_undistort_iterations`, the iteration bound of distortion-aware
//! back-projection. The model tag is given by its name, see
//! [`CameraModelType`].

use crate::camera::{CameraModelError, CameraModelType, PinholeParams, Resolution};
use crate::types::{CameraId, INVALID_CAMERA_ID};
use crate::util::NamedEnum;
use log::debug;
use std::fs;
use yaml_rust::{Yaml, YamlLoader};

/// Everything needed to build a camera model.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub camera_id: CameraId,
    pub resolution: Resolution,
    pub params: PinholeParams,
    /// Overrides the default undistortion iteration bound when present.
    pub max_undistort_iterations: Option<usize>,
}

impl CameraConfig {
    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// * [`CameraModelError::IOError`]: the file cannot be read.
    /// * [`CameraModelError::YamlError`]: the content is not valid YAML.
    /// * [`CameraModelError::Enum`]: `camera_model` is not a known model name.
    /// * [`CameraModelError::InvalidParams`]: a field is missing or has the wrong type.
    pub fn load_from_yaml(path: &str) -> Result<Self, CameraModelError> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&contents)?;
        debug!("Loaded camera configuration from {}: {:?}", path, config);
        Ok(config)
    }

    /// Parses a configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, CameraModelError> {
        let docs = YamlLoader::load_from_str(contents)?;

        if docs.is_empty() {
            return Err(CameraModelError::InvalidParams(
                "Empty YAML document".to_string(),
            ));
        }

        let cam = &docs[0]["cam0"];
        if cam.is_badvalue() {
            return Err(CameraModelError::InvalidParams(
                "Missing cam0 section".to_string(),
            ));
        }

        let model_name = cam["camera_model"]
            .as_str()
            .ok_or_else(|| CameraModelError::InvalidParams("Invalid camera_model".to_string()))?;
        let model_type = CameraModelType::from_name(model_name)?;

        let camera_id = match &cam["camera_id"] {
            Yaml::BadValue => INVALID_CAMERA_ID,
            node => node
                .as_i64()
                .and_then(|id| CameraId::try_from(id).ok())
                .ok_or_else(|| CameraModelError::InvalidParams("Invalid camera_id".to_string()))?,
        };

        let max_undistort_iterations = match &cam["max_undistort_iterations"] {
            Yaml::BadValue => None,
            node => Some(
                node.as_i64()
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| {
                        CameraModelError::InvalidParams(
                            "Invalid max_undistort_iterations".to_string(),
                        )
                    })?,
            ),
        };

        let intrinsics = float_list(&cam["intrinsics"], "intrinsics")?;
        if intrinsics.len() != 4 {
            return Err(CameraModelError::InvalidParams(format!(
                "Expected 4 intrinsics in YAML, found {}",
                intrinsics.len()
            )));
        }

        let distortion = match &cam["distortion"] {
            Yaml::BadValue => Vec::new(),
            node => float_list(node, "distortion")?,
        };

        let resolution_yaml = cam["resolution"]
            .as_vec()
            .ok_or_else(|| CameraModelError::InvalidParams("Invalid resolution".to_string()))?;
        if resolution_yaml.len() != 2 {
            return Err(CameraModelError::InvalidParams(
                "Resolution must be [width, height]".to_string(),
            ));
        }
        let resolution = Resolution {
            width: dimension(&resolution_yaml[0], "width")?,
            height: dimension(&resolution_yaml[1], "height")?,
        };

        let params = PinholeParams::new(
            model_type,
            intrinsics[0],
            intrinsics[1],
            intrinsics[2],
            intrinsics[3],
        )
        .with_distortion(distortion);

        Ok(CameraConfig {
            camera_id,
            resolution,
            params,
            max_undistort_iterations,
        })
    }
}

// Integers are accepted where floats are expected
fn float_list(node: &Yaml, field: &str) -> Result<Vec<f64>, CameraModelError> {
    let values = node
        .as_vec()
        .ok_or_else(|| CameraModelError::InvalidParams(format!("Invalid {}", field)))?;

    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            value
                .as_f64()
                .or_else(|| value.as_i64().map(|v| v as f64))
                .ok_or_else(|| {
                    CameraModelError::InvalidParams(format!("Invalid {} value at index {}", field, i))
                })
        })
        .collect()
}

fn dimension(node: &Yaml, field: &str) -> Result<u32, CameraModelError> {
    node.as_i64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| CameraModelError::InvalidParams(format!("Invalid {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraModel, CameraModelEnum};

    #[test]
    fn test_load_pinhole_config() {
        let config = CameraConfig::load_from_yaml("samples/pinhole.yaml").unwrap();
        assert_eq!(config.camera_id, 1);
        assert_eq!(
            config.resolution,
            Resolution {
                width: 752,
                height: 480
            }
        );
        assert_eq!(config.params.model_type, CameraModelType::PinholeCamera);
        assert_eq!(config.params.fx, 461.629);
        assert_eq!(config.params.cy, 246.049);
        assert!(config.params.distortion.is_empty());
    }

    #[test]
    fn test_load_brown_model() {
        let model = CameraModelEnum::load_from_yaml("samples/brown.yaml").unwrap();
        assert!(matches!(model, CameraModelEnum::Brown(_)));
        assert_eq!(model.camera_id(), 0);
        assert_eq!(model.width(), 752);
        assert_eq!(
            model.get_distortion(),
            vec![-0.28340811, 0.07395907, 0.0, 0.00019359, 1.76187114e-05]
        );
    }

    #[test]
    fn test_optional_fields() {
        let config = CameraConfig::from_yaml_str(
            "cam0:\n  camera_model: PINHOLE_CAMERA\n  intrinsics: [500, 500, 320, 240]\n  resolution: [640, 480]\n",
        )
        .unwrap();
        assert_eq!(config.camera_id, INVALID_CAMERA_ID);
        assert_eq!(config.max_undistort_iterations, None);
        assert_eq!(config.params.fx, 500.0);
        assert!(config.params.distortion.is_empty());
    }

    #[test]
    fn test_max_undistort_iterations() {
        let config = CameraConfig::from_yaml_str(
            "cam0:\n  camera_model: PINHOLE_CAMERA_BROWN\n  max_undistort_iterations: 7\n  intrinsics: [500, 500, 320, 240]\n  distortion: [-0.1, 0, 0, 0, 0]\n  resolution: [640, 480]\n",
        )
        .unwrap();
        assert_eq!(config.max_undistort_iterations, Some(7));

        let model = CameraModelEnum::from_config(config).unwrap();
        match model {
            CameraModelEnum::Brown(brown) => assert_eq!(brown.max_undistort_iterations(), 7),
            other => panic!("expected a Brown model, got {:?}", other),
        }

        assert!(matches!(
            CameraConfig::from_yaml_str(
                "cam0:\n  camera_model: PINHOLE_CAMERA\n  max_undistort_iterations: -1\n  intrinsics: [500, 500, 320, 240]\n  resolution: [640, 480]\n",
            ),
            Err(CameraModelError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_unknown_model_name() {
        let err = CameraConfig::from_yaml_str(
            "cam0:\n  camera_model: FISHEYE\n  intrinsics: [500, 500, 320, 240]\n  resolution: [640, 480]\n",
        )
        .unwrap_err();
        assert!(matches!(err, CameraModelError::Enum(_)));
        assert_eq!(err.to_string(), "Invalid enum name: FISHEYE");
    }

    #[test]
    fn test_invalid_fields() {
        for contents in [
            "",
            "cam1:\n  camera_model: PINHOLE_CAMERA\n",
            "cam0:\n  intrinsics: [500, 500, 320, 240]\n  resolution: [640, 480]\n",
            "cam0:\n  camera_model: PINHOLE_CAMERA\n  intrinsics: [500, 500, 320]\n  resolution: [640, 480]\n",
            "cam0:\n  camera_model: PINHOLE_CAMERA\n  intrinsics: [500, a, 320, 240]\n  resolution: [640, 480]\n",
            "cam0:\n  camera_model: PINHOLE_CAMERA\n  intrinsics: [500, 500, 320, 240]\n  resolution: [-640, 480]\n",
            "cam0:\n  camera_model: PINHOLE_CAMERA\n  camera_id: -3\n  intrinsics: [500, 500, 320, 240]\n  resolution: [640, 480]\n",
        ] {
            assert!(
                matches!(
                    CameraConfig::from_yaml_str(contents),
                    Err(CameraModelError::InvalidParams(_))
                ),
                "accepted {:?}",
                contents
            );
        }
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CameraConfig::load_from_yaml("samples/does_not_exist.yaml"),
            Err(CameraModelError::IOError(_))
        ));
    }
}
