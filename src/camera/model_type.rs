//! Camera model tags.
//!
//! [`CameraModelType`] tags the mathematical family of a camera model and is
//! what a parameter bundle carries. [`CameraKind`] is the coarser, user-facing
//! catalogue of camera kinds, looked up by name from configuration.

use crate::util::{NamedEnum, UtilError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mathematical family of a camera model.
///
/// `PinholeCameraStart` and `PinholeCameraEnd` are reserved markers bounding
/// the pinhole family; they never tag a real model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CameraModelType {
    None = 0,
    PinholeCameraStart = 1,
    /// No distortion.
    PinholeCamera = 2,
    /// Radial distortion k1.
    PinholeCameraRadial1 = 3,
    /// Radial distortion k1, k2, k3.
    PinholeCameraRadial3 = 4,
    /// Radial distortion k1, k2, k3 and tangential distortion t1, t2.
    PinholeCameraBrown = 5,
    PinholeCameraEnd = 6,
}

impl CameraModelType {
    /// True for every tag strictly between the two pinhole markers.
    pub fn is_pinhole(self) -> bool {
        self > CameraModelType::PinholeCameraStart && self < CameraModelType::PinholeCameraEnd
    }
}

/// Free-function form of [`CameraModelType::is_pinhole`].
pub fn is_pinhole(model_type: CameraModelType) -> bool {
    model_type.is_pinhole()
}

impl NamedEnum for CameraModelType {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("NONE", CameraModelType::None),
        ("PINHOLE_CAMERA_START", CameraModelType::PinholeCameraStart),
        ("PINHOLE_CAMERA", CameraModelType::PinholeCamera),
        ("PINHOLE_CAMERA_RADIAL1", CameraModelType::PinholeCameraRadial1),
        ("PINHOLE_CAMERA_RADIAL3", CameraModelType::PinholeCameraRadial3),
        ("PINHOLE_CAMERA_BROWN", CameraModelType::PinholeCameraBrown),
        ("PINHOLE_CAMERA_END", CameraModelType::PinholeCameraEnd),
    ];

    fn to_index(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for CameraModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CameraModelType {
    type Err = UtilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TryFrom<u8> for CameraModelType {
    type Error = UtilError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as i64)
    }
}

/// Catalogue of supported camera kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CameraKind {
    CameraSimplePinholeModel = 0,
    CameraSimpleRadialDistortionPinholeModel = 1,
    CameraRadialDistortionPinholeModel = 2,
    CameraRadialTangentialDistortionPinholeModel = 3,
    CameraBrownConradyDistortionPinholeModel = 4,
    CameraFisheyeModel = 5,
}

impl NamedEnum for CameraKind {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("CameraSimplePinholeModel", CameraKind::CameraSimplePinholeModel),
        (
            "CameraSimpleRadialDistortionPinholeModel",
            CameraKind::CameraSimpleRadialDistortionPinholeModel,
        ),
        (
            "CameraRadialDistortionPinholeModel",
            CameraKind::CameraRadialDistortionPinholeModel,
        ),
        (
            "CameraRadialTangentialDistortionPinholeModel",
            CameraKind::CameraRadialTangentialDistortionPinholeModel,
        ),
        (
            "CameraBrownConradyDistortionPinholeModel",
            CameraKind::CameraBrownConradyDistortionPinholeModel,
        ),
        ("CameraFisheyeModel", CameraKind::CameraFisheyeModel),
    ];

    fn to_index(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for CameraKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `index` is the integer value of a [`CameraKind`].
pub fn is_camera_type_valid(index: i64) -> bool {
    CameraKind::from_index(index).is_ok()
}

/// Programmatic name of a camera kind.
pub fn camera_type_name(kind: CameraKind) -> &'static str {
    kind.name()
}

/// Whether `name` names a camera kind.
pub fn is_camera_model_name_valid(name: &str) -> bool {
    CameraKind::contains_name(name)
}

/// Looks up a camera kind by name.
pub fn camera_type_from_name(name: &str) -> Result<CameraKind, UtilError> {
    CameraKind::from_name(name)
}
