//! Parameter bundles handed to camera models at initialization, and the flags
//! selecting which parameters an optimizer may refine.

use crate::camera::CameraModelType;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Tagged parameter bundle for the pinhole family.
///
/// Passed by value to [`crate::camera::CameraModel::init_camera`], which
/// consumes it whether initialization succeeds or not.
///
/// # Examples
///
/// ```rust
/// use camera_geometry::camera::{CameraModelType, PinholeParams};
///
/// let params = PinholeParams::new(CameraModelType::PinholeCameraBrown, 1000.0, 1000.0, 320.0, 240.0)
///     .with_distortion(vec![-0.1, 0.0, 0.0, 0.0, 0.0]);
/// assert_eq!(params.distortion.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinholeParams {
    pub model_type: CameraModelType,
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    pub distortion: Vec<f64>,
}

impl PinholeParams {
    pub fn new(model_type: CameraModelType, fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        PinholeParams {
            model_type,
            fx,
            fy,
            cx,
            cy,
            distortion: Vec::new(),
        }
    }

    pub fn with_distortion(mut self, distortion: Vec<f64>) -> Self {
        self.distortion = distortion;
        self
    }
}

bitflags! {
    /// Selects which parameter groups are variable during nonlinear refinement.
    ///
    /// `NONE` holds every parameter constant. Flags combine with `|`.
    #[derive(Serialize, Deserialize)]
    pub struct IntrinsicParameterType: u8 {
        const NONE                   = 0b0000_0001;
        const ADJUST_FOCAL_LENGTH    = 0b0000_0010;
        const ADJUST_PRINCIPAL_POINT = 0b0000_0100;
        const ADJUST_DISTORTION      = 0b0000_1000;
        const ADJUST_ALL = Self::ADJUST_FOCAL_LENGTH.bits
            | Self::ADJUST_PRINCIPAL_POINT.bits
            | Self::ADJUST_DISTORTION.bits;
    }
}
