//! Camera Geometry Library
//!
//! Camera models for photogrammetry and structure-from-motion pipelines.
//! This library provides:
//! - The [`CameraModel`] contract: projection, pixel <-> normalized plane maps,
//!   distortion and parameter-vector marshaling for an external optimizer
//! - Pinhole camera model without distortion
//! - Brown-Conrady camera model (three radial, two tangential coefficients)
//! - Camera intrinsics and extrinsics (rotation plus camera center)
//! - Identifier types and the order-insensitive [`types::Pair`] key
//! - Name <-> value tables for the enumerations, see [`util::NamedEnum`]
//!
//! Models can be built from a parameter bundle or loaded from a YAML
//! configuration file.

pub mod camera;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use camera::{
    BrownModel, CameraConfig, CameraModel, CameraModelEnum, CameraModelError, CameraModelType,
    Extrinsics, IntrinsicParameterType, Intrinsics, PinholeModel, PinholeParams, Resolution,
};

pub use types::{CameraId, ImageId, ImagePairId, Pair, Point2DId, Point3DId};
pub use util::{NamedEnum, UtilError};
