//! Implements the Pinhole camera model.
//!
//! This module provides the [`PinholeModel`] struct, the simplest variant of
//! the [`CameraModel`] contract defined in the parent `camera` module
//! ([`crate::camera`]). It assumes an ideal lens: distortion and undistortion
//! are the identity and the parameter vector is `[fx, fy, cx, cy]`.

use crate::camera::{
    CameraModel, CameraModelError, CameraModelType, Intrinsics, PinholeParams, Resolution,
};
use crate::types::{CameraId, INVALID_CAMERA_ID};
use log::info;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a Pinhole camera model.
///
/// This struct holds the camera identifier, the image resolution and the
/// intrinsic parameters (focal length, principal point) of a camera without
/// lens distortion.
///
/// # Examples
///
/// ```rust
/// use camera_geometry::camera::{CameraModel, CameraModelType, PinholeModel, PinholeParams, Resolution};
///
/// let params = PinholeParams::new(CameraModelType::PinholeCamera, 500.0, 500.0, 320.0, 240.0);
/// let resolution = Resolution { width: 640, height: 480 };
/// let model = PinholeModel::new(0, resolution, params).unwrap();
///
/// assert_eq!(model.intrinsics().fx, 500.0);
/// assert_eq!(model.width(), 640);
/// assert!(!model.have_distortion());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinholeModel {
    /// Identifier of the physical camera, [`INVALID_CAMERA_ID`] until assigned.
    pub camera_id: CameraId,
    /// The resolution of the camera image, [`Resolution`] (width, height).
    pub resolution: Resolution,
    intrinsics: Intrinsics,
}

impl Default for PinholeModel {
    fn default() -> Self {
        PinholeModel {
            camera_id: INVALID_CAMERA_ID,
            resolution: Resolution::default(),
            intrinsics: Intrinsics::default(),
        }
    }
}

impl PinholeModel {
    /// Creates a new [`PinholeModel`] from a parameter bundle.
    ///
    /// # Errors
    ///
    /// * [`CameraModelError::TypeMismatch`]: the bundle is not of the pinhole family.
    /// * [`CameraModelError::ArityMismatch`]: the bundle carries distortion coefficients.
    /// * [`CameraModelError::FocalLengthMustBePositive`] /
    ///   [`CameraModelError::PrincipalPointMustBeFinite`]: invalid intrinsics.
    pub fn new(
        camera_id: CameraId,
        resolution: Resolution,
        params: PinholeParams,
    ) -> Result<Self, CameraModelError> {
        let mut model = PinholeModel {
            camera_id,
            resolution,
            ..Default::default()
        };
        model.init_camera(params)?;
        model.validate_params()?;

        info!("new Pinhole model is: {:?}", model);
        Ok(model)
    }
}

impl CameraModel for PinholeModel {
    fn model_type(&self) -> CameraModelType {
        CameraModelType::PinholeCamera
    }

    fn camera_id(&self) -> CameraId {
        self.camera_id
    }

    fn set_camera_id(&mut self, camera_id: CameraId) {
        self.camera_id = camera_id;
    }

    fn get_resolution(&self) -> Resolution {
        self.resolution.clone()
    }

    fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    fn intrinsics_mut(&mut self) -> &mut Intrinsics {
        &mut self.intrinsics
    }

    fn have_distortion(&self) -> bool {
        false
    }

    fn distortion_count(&self) -> usize {
        0
    }

    /// Identity: an ideal lens does not distort.
    fn distort(&self, point: &Vector2<f64>) -> Vector2<f64> {
        *point
    }

    /// Identity. Never fails for this model.
    fn undistort(&self, point: &Vector2<f64>) -> Result<Vector2<f64>, CameraModelError> {
        Ok(*point)
    }

    /// Focal length and principal point report, see [`Intrinsics::params_info`].
    fn params_info(&self) -> String {
        self.intrinsics.params_info()
    }
}

impl fmt::Display for PinholeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.params_info())
    }
}
