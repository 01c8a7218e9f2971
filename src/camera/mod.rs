//! Camera models for the pinhole family.
//!
//! The [`CameraModel`] trait is the contract every camera variant implements:
//! projection of camera-frame points to pixels, the affine pixel <-> normalized
//! plane maps, distortion and its inverse, and marshaling of the refinable
//! parameters into the flat vector an external optimizer works on.
//!
//! Two variants are implemented:
//! - [`PinholeModel`]: ideal pinhole, no distortion.
//! - [`BrownModel`]: pinhole with Brown-Conrady radial and tangential distortion.
//!
//! [`CameraModelEnum`] selects between them at runtime from a parameter
//! bundle's [`CameraModelType`] tag.
//!
//! A model owns its intrinsics. Extrinsics are passed per call, so one model
//! can serve every image taken with the same camera. Mutating methods take
//! `&mut self`; sharing a model between an optimizer thread and readers needs
//! external synchronization such as an `RwLock`.

use crate::types::CameraId;
use crate::util::UtilError;
use log::warn;
use nalgebra::{Matrix2xX, Matrix3, Matrix3x4, Matrix3xX, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod brown;
pub mod config;
pub mod distortion;
pub mod extrinsics;
pub mod intrinsics;
pub mod model_type;
pub mod params;
pub mod pinhole;

pub use brown::BrownModel;
pub use config::CameraConfig;
pub use extrinsics::Extrinsics;
pub use intrinsics::Intrinsics;
pub use model_type::{is_pinhole, CameraKind, CameraModelType};
pub use params::{IntrinsicParameterType, PinholeParams};
pub use pinhole::PinholeModel;

/// Number of entries shared by every pinhole-family parameter vector:
/// `fx, fy, cx, cy`.
pub const PINHOLE_PARAM_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[derive(thiserror::Error, Debug)]
pub enum CameraModelError {
    #[error("Camera type {0} does not belong to the pinhole family")]
    TypeMismatch(CameraModelType),
    #[error("Expected {expected} parameters, got {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("Camera model {0} is not implemented")]
    UnsupportedModel(CameraModelType),
    #[error("Distortion inverse did not converge within {iterations} iterations")]
    DistortionNotConverged { iterations: usize },
    #[error("z is close to zero, point is at camera center")]
    PointAtCameraCenter,
    #[error("Focal length must be positive")]
    FocalLengthMustBePositive,
    #[error("Principal point must be finite")]
    PrincipalPointMustBeFinite,
    #[error("Invalid camera parameters: {0}")]
    InvalidParams(String),
    #[error(transparent)]
    Enum(#[from] UtilError),
    #[error("Failed to load YAML: {0}")]
    YamlError(String),
    #[error("IO Error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for CameraModelError {
    fn from(err: std::io::Error) -> Self {
        CameraModelError::IOError(err.to_string())
    }
}

impl From<yaml_rust::ScanError> for CameraModelError {
    fn from(err: yaml_rust::ScanError) -> Self {
        CameraModelError::YamlError(err.to_string())
    }
}

/// Contract shared by all camera variants.
///
/// Implementors provide storage access and the variant-specific pieces
/// (tag, distortion, report). Projection, the pixel <-> normalized plane
/// maps, parameter-vector marshaling and back-projection are provided on top
/// of them.
pub trait CameraModel {
    /// Tag of this variant. Never one of the range markers.
    fn model_type(&self) -> CameraModelType;

    /// Identifier of the physical camera.
    ///
    /// [`crate::types::INVALID_CAMERA_ID`] until one is assigned.
    fn camera_id(&self) -> CameraId;
    fn set_camera_id(&mut self, camera_id: CameraId);

    /// Returns the image resolution (width, height) in pixels.
    fn get_resolution(&self) -> Resolution;
    fn set_resolution(&mut self, resolution: Resolution);

    /// Read access to the focal length, principal point and distortion list.
    fn intrinsics(&self) -> &Intrinsics;

    /// Mutable access to the intrinsics.
    ///
    /// Focal length and principal point may be changed freely. The distortion
    /// list can only be replaced through [`CameraModel::init_camera`] or
    /// [`CameraModel::update_from_variable_params`], which check its length.
    fn intrinsics_mut(&mut self) -> &mut Intrinsics;

    /// Whether this variant models lens distortion.
    fn have_distortion(&self) -> bool;

    /// Length of the distortion coefficient list this variant expects.
    fn distortion_count(&self) -> usize;

    /// Applies lens distortion to a point on the normalized camera plane.
    fn distort(&self, point: &Vector2<f64>) -> Vector2<f64>;

    /// Removes lens distortion from a point on the normalized camera plane.
    fn undistort(&self, point: &Vector2<f64>) -> Result<Vector2<f64>, CameraModelError>;

    /// Human-readable report of the current parameter values.
    fn params_info(&self) -> String;

    fn width(&self) -> u32 {
        self.get_resolution().width
    }

    fn height(&self) -> u32 {
        self.get_resolution().height
    }

    fn set_width(&mut self, width: u32) {
        let height = self.height();
        self.set_resolution(Resolution { width, height });
    }

    fn set_height(&mut self, height: u32) {
        let width = self.width();
        self.set_resolution(Resolution { width, height });
    }

    /// Returns a copy of the distortion coefficients.
    ///
    /// Empty for [`PinholeModel`]; `[k1, k2, k3, t1, t2]` for [`BrownModel`].
    fn get_distortion(&self) -> Vec<f64> {
        self.intrinsics().distortion().to_vec()
    }

    /// Number of entries in the parameter vector.
    fn param_count(&self) -> usize {
        PINHOLE_PARAM_COUNT + self.distortion_count()
    }

    /// Populates the intrinsics from a parameter bundle.
    ///
    /// The bundle is consumed whether or not initialization succeeds. On
    /// failure the current intrinsics are left untouched.
    ///
    /// # Errors
    ///
    /// * [`CameraModelError::TypeMismatch`]: the bundle's tag is not a pinhole type.
    /// * [`CameraModelError::ArityMismatch`]: the bundle carries a distortion list
    ///   of the wrong length for this variant.
    fn init_camera(&mut self, params: PinholeParams) -> Result<(), CameraModelError> {
        if !params.model_type.is_pinhole() {
            warn!(
                "{} camera {} rejected {} parameters",
                self.model_type(),
                self.camera_id(),
                params.model_type
            );
            return Err(CameraModelError::TypeMismatch(params.model_type));
        }
        if params.distortion.len() != self.distortion_count() {
            warn!(
                "{} camera {} expects {} distortion coefficients, got {}",
                self.model_type(),
                self.camera_id(),
                self.distortion_count(),
                params.distortion.len()
            );
            return Err(CameraModelError::ArityMismatch {
                expected: self.distortion_count(),
                found: params.distortion.len(),
            });
        }
        self.intrinsics_mut().init_camera(params);
        Ok(())
    }

    /// Maps a point on the normalized camera plane to pixel coordinates:
    /// `(fx·x + cx, fy·y + cy)`.
    fn cam2ima(&self, point: &Vector2<f64>) -> Vector2<f64> {
        let intrinsics = self.intrinsics();
        Vector2::new(
            intrinsics.fx * point.x + intrinsics.cx,
            intrinsics.fy * point.y + intrinsics.cy,
        )
    }

    /// Maps pixel coordinates to the normalized camera plane. Exact inverse of
    /// [`CameraModel::cam2ima`].
    fn ima2cam(&self, point: &Vector2<f64>) -> Vector2<f64> {
        let intrinsics = self.intrinsics();
        Vector2::new(
            (point.x - intrinsics.cx) / intrinsics.fx,
            (point.y - intrinsics.cy) / intrinsics.fy,
        )
    }

    /// Projects a camera-frame point to pixel coordinates.
    ///
    /// The point is divided by its depth, distorted unless the variant has no
    /// distortion or `ignore_distortion` is set, and mapped through the
    /// intrinsics. Points behind the camera are projected as well; only a
    /// depth too close to zero is rejected.
    ///
    /// # Arguments
    ///
    /// * `point_3d` - A `&Vector3<f64>` in the camera frame. World points go
    ///   through [`Extrinsics::world_to_camera`] first.
    /// * `ignore_distortion` - Skips [`CameraModel::distort`] when `true`.
    ///
    /// # Return Value
    ///
    /// The pixel coordinates `(u, v)`. The pixel is not required to lie inside
    /// the image, see [`CameraModel::is_inside_image`].
    ///
    /// # Errors
    ///
    /// * [`CameraModelError::PointAtCameraCenter`]: `|z|` is below `sqrt(f64::EPSILON)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use camera_geometry::camera::{CameraModel, CameraModelType, PinholeModel, PinholeParams, Resolution};
    /// use nalgebra::{Vector2, Vector3};
    ///
    /// let params = PinholeParams::new(CameraModelType::PinholeCamera, 1000.0, 1000.0, 320.0, 240.0);
    /// let model = PinholeModel::new(0, Resolution { width: 640, height: 480 }, params).unwrap();
    ///
    /// let pixel = model.project(&Vector3::new(0.0, 0.0, 5.0), false).unwrap();
    /// assert_eq!(pixel, Vector2::new(320.0, 240.0));
    /// assert!(model.project(&Vector3::new(1.0, 1.0, 0.0), false).is_err());
    /// ```
    fn project(
        &self,
        point_3d: &Vector3<f64>,
        ignore_distortion: bool,
    ) -> Result<Vector2<f64>, CameraModelError> {
        if point_3d.z.abs() < f64::EPSILON.sqrt() {
            return Err(CameraModelError::PointAtCameraCenter);
        }
        let normalized = Vector2::new(point_3d.x / point_3d.z, point_3d.y / point_3d.z);

        if self.have_distortion() && !ignore_distortion {
            Ok(self.cam2ima(&self.distort(&normalized)))
        } else {
            Ok(self.cam2ima(&normalized))
        }
    }

    /// Observed pixel minus projected pixel.
    fn residual(
        &self,
        point_3d: &Vector3<f64>,
        observed: &Vector2<f64>,
        ignore_distortion: bool,
    ) -> Result<Vector2<f64>, CameraModelError> {
        let projected = self.project(point_3d, ignore_distortion)?;
        Ok(observed - projected)
    }

    /// Back-projects a pixel to a unit bearing vector, removing distortion.
    ///
    /// # Arguments
    ///
    /// * `point_2d` - Pixel coordinates `(u, v)`.
    ///
    /// # Return Value
    ///
    /// The unit ray `normalize((undistort(ima2cam(p)), 1))` in the camera frame.
    ///
    /// # Errors
    ///
    /// * [`CameraModelError::DistortionNotConverged`]: the distortion inverse
    ///   did not converge for this pixel.
    fn unproject(&self, point_2d: &Vector2<f64>) -> Result<Vector3<f64>, CameraModelError> {
        let undistorted = self.undistort(&self.ima2cam(point_2d))?;
        Ok(Vector3::new(undistorted.x, undistorted.y, 1.0).normalize())
    }

    /// Unit bearing vectors `normalize(K⁻¹·[u, v, 1])` for each column of
    /// `points`, in the same column order.
    ///
    /// This is the linear back-projection; distortion is not removed. Use
    /// [`CameraModel::unproject`] for distorted pixels.
    fn bearing_vectors(&self, points: &Matrix2xX<f64>) -> Matrix3xX<f64> {
        let inverse = self.inverse_intrinsic_matrix();
        let mut bearings = Matrix3xX::zeros(points.ncols());
        for (i, point) in points.column_iter().enumerate() {
            let ray = inverse * Vector3::new(point[0], point[1], 1.0);
            bearings.set_column(i, &ray.normalize());
        }
        bearings
    }

    /// The calibration matrix `K = [[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`.
    fn intrinsic_matrix(&self) -> Matrix3<f64> {
        self.intrinsics().intrinsic_matrix()
    }

    /// `K⁻¹` in closed form.
    fn inverse_intrinsic_matrix(&self) -> Matrix3<f64> {
        self.intrinsics().inverse_intrinsic_matrix()
    }

    /// The 3×4 projection matrix `K·[R | t]` for the given pose.
    ///
    /// This is a linear operator and ignores distortion. For variants with
    /// non-negligible distortion coefficients it is only an approximation of
    /// [`CameraModel::project`] and must not be treated as exact.
    fn projection_matrix(&self, extrinsics: &Extrinsics) -> Matrix3x4<f64> {
        self.intrinsic_matrix() * extrinsics.extrinsic_matrix()
    }

    /// Parameter vector `[fx, fy, cx, cy, distortion...]`.
    ///
    /// This is the layout an external optimizer works on; its length is
    /// [`CameraModel::param_count`]: 4 for [`PinholeModel`], 9 for
    /// [`BrownModel`].
    fn get_variable_params(&self) -> Vec<f64> {
        let intrinsics = self.intrinsics();
        let mut params = Vec::with_capacity(self.param_count());
        params.extend_from_slice(&[intrinsics.fx, intrinsics.fy, intrinsics.cx, intrinsics.cy]);
        params.extend_from_slice(intrinsics.distortion());
        params
    }

    /// Whether the live parameter vector has this variant's arity.
    fn verify_model_specific_params(&self) -> bool {
        self.get_variable_params().len() == self.param_count()
    }

    /// Replaces the parameters from a vector laid out like
    /// [`CameraModel::get_variable_params`].
    ///
    /// # Arguments
    ///
    /// * `params` - `[fx, fy, cx, cy]` followed by the variant's distortion
    ///   coefficients. The coefficients are stored verbatim.
    ///
    /// # Errors
    ///
    /// [`CameraModelError::ArityMismatch`] when `params` has the wrong length.
    /// Nothing is modified in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use camera_geometry::camera::{BrownModel, CameraModel, CameraModelType, PinholeParams, Resolution};
    ///
    /// let params = PinholeParams::new(CameraModelType::PinholeCameraBrown, 1000.0, 1000.0, 320.0, 240.0)
    ///     .with_distortion(vec![0.0; 5]);
    /// let mut model = BrownModel::new(0, Resolution { width: 640, height: 480 }, params).unwrap();
    ///
    /// let mut vector = model.get_variable_params();
    /// vector[4] = -0.2;
    /// model.update_from_variable_params(&vector).unwrap();
    /// assert_eq!(model.get_distortion()[0], -0.2);
    ///
    /// assert!(model.update_from_variable_params(&vector[..4]).is_err());
    /// ```
    fn update_from_variable_params(&mut self, params: &[f64]) -> Result<(), CameraModelError> {
        if params.len() != self.param_count() {
            warn!(
                "{} camera {} update_from_variable_params failed: expected {} parameters, got {}",
                self.model_type(),
                self.camera_id(),
                self.param_count(),
                params.len()
            );
            return Err(CameraModelError::ArityMismatch {
                expected: self.param_count(),
                found: params.len(),
            });
        }
        let intrinsics = self.intrinsics_mut();
        intrinsics.fx = params[0];
        intrinsics.fy = params[1];
        intrinsics.cx = params[2];
        intrinsics.cy = params[3];
        intrinsics.set_distortion(&params[PINHOLE_PARAM_COUNT..]);
        Ok(())
    }

    /// Marks which entries of the parameter vector an optimizer may vary.
    ///
    /// The mask is aligned with [`CameraModel::get_variable_params`]. A flag
    /// set containing [`IntrinsicParameterType::NONE`] yields an all-`false`
    /// mask.
    fn parameter_mask(&self, flags: IntrinsicParameterType) -> Vec<bool> {
        let mut mask = vec![false; self.param_count()];
        if flags.contains(IntrinsicParameterType::NONE) {
            return mask;
        }
        let focal = flags.contains(IntrinsicParameterType::ADJUST_FOCAL_LENGTH);
        let principal = flags.contains(IntrinsicParameterType::ADJUST_PRINCIPAL_POINT);
        let distortion = flags.contains(IntrinsicParameterType::ADJUST_DISTORTION);
        for (i, variable) in mask.iter_mut().enumerate() {
            *variable = match i {
                0 | 1 => focal,
                2 | 3 => principal,
                _ => distortion,
            };
        }
        mask
    }

    /// Whether a pixel lies inside `[0, width) × [0, height)`.
    fn is_inside_image(&self, point_2d: &Vector2<f64>) -> bool {
        let resolution = self.get_resolution();
        point_2d.x >= 0.0
            && point_2d.x < resolution.width as f64
            && point_2d.y >= 0.0
            && point_2d.y < resolution.height as f64
    }

    /// Checks the intrinsics and the parameter arity.
    fn validate_params(&self) -> Result<(), CameraModelError> {
        validation::validate_intrinsics(self.intrinsics())?;
        if !self.verify_model_specific_params() {
            return Err(CameraModelError::ArityMismatch {
                expected: self.param_count(),
                found: self.get_variable_params().len(),
            });
        }
        Ok(())
    }
}

/// Common validation functions for camera parameters
pub mod validation {
    use super::*;

    pub fn validate_intrinsics(intrinsics: &Intrinsics) -> Result<(), CameraModelError> {
        if intrinsics.fx <= 0.0 || intrinsics.fy <= 0.0 {
            return Err(CameraModelError::FocalLengthMustBePositive);
        }
        if !intrinsics.cx.is_finite() || !intrinsics.cy.is_finite() {
            return Err(CameraModelError::PrincipalPointMustBeFinite);
        }
        Ok(())
    }
}

/// A camera model whose variant is chosen at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CameraModelEnum {
    Pinhole(PinholeModel),
    Brown(BrownModel),
}

impl CameraModelEnum {
    /// Builds the variant named by the bundle's tag.
    ///
    /// # Errors
    ///
    /// * [`CameraModelError::UnsupportedModel`]: the tag names a pinhole variant
    ///   that is not implemented (radial1, radial3).
    /// * [`CameraModelError::TypeMismatch`]: the tag is not a pinhole type.
    /// * Any error of [`CameraModel::init_camera`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use camera_geometry::camera::{
    ///     CameraModel, CameraModelEnum, CameraModelType, PinholeParams, Resolution,
    /// };
    ///
    /// let params = PinholeParams::new(CameraModelType::PinholeCamera, 1000.0, 1000.0, 320.0, 240.0);
    /// let resolution = Resolution { width: 640, height: 480 };
    /// let model = CameraModelEnum::from_params(0, resolution, params).unwrap();
    /// assert!(!model.have_distortion());
    /// assert_eq!(model.get_variable_params(), vec![1000.0, 1000.0, 320.0, 240.0]);
    /// ```
    pub fn from_params(
        camera_id: CameraId,
        resolution: Resolution,
        params: PinholeParams,
    ) -> Result<Self, CameraModelError> {
        match params.model_type {
            CameraModelType::PinholeCamera => Ok(CameraModelEnum::Pinhole(PinholeModel::new(
                camera_id, resolution, params,
            )?)),
            CameraModelType::PinholeCameraBrown => Ok(CameraModelEnum::Brown(BrownModel::new(
                camera_id, resolution, params,
            )?)),
            CameraModelType::PinholeCameraRadial1 | CameraModelType::PinholeCameraRadial3 => {
                Err(CameraModelError::UnsupportedModel(params.model_type))
            }
            other => Err(CameraModelError::TypeMismatch(other)),
        }
    }

    /// Builds the model a [`CameraConfig`] describes, applying its
    /// undistortion iteration bound if one is set.
    ///
    /// # Errors
    ///
    /// Any error of [`CameraModelEnum::from_params`].
    pub fn from_config(config: CameraConfig) -> Result<Self, CameraModelError> {
        let mut model = Self::from_params(config.camera_id, config.resolution, config.params)?;
        if let Some(max_iterations) = config.max_undistort_iterations {
            model.set_max_undistort_iterations(max_iterations);
        }
        Ok(model)
    }

    /// Loads a camera configuration file and builds the model it describes.
    ///
    /// # Errors
    ///
    /// Any error of [`CameraConfig::load_from_yaml`] or
    /// [`CameraModelEnum::from_params`].
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use camera_geometry::camera::{CameraModel, CameraModelEnum};
    ///
    /// let model = CameraModelEnum::load_from_yaml("samples/brown.yaml").unwrap();
    /// println!("{}", model);
    /// ```
    pub fn load_from_yaml(path: &str) -> Result<Self, CameraModelError> {
        Self::from_config(CameraConfig::load_from_yaml(path)?)
    }

    /// Sets the iteration bound of [`CameraModel::undistort`]. Variants without
    /// distortion have nothing to iterate and ignore it.
    pub fn set_max_undistort_iterations(&mut self, max_iterations: usize) {
        match self {
            CameraModelEnum::Pinhole(_) => {}
            CameraModelEnum::Brown(model) => model.set_max_undistort_iterations(max_iterations),
        }
    }

    fn inner(&self) -> &dyn CameraModel {
        match self {
            CameraModelEnum::Pinhole(model) => model,
            CameraModelEnum::Brown(model) => model,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn CameraModel {
        match self {
            CameraModelEnum::Pinhole(model) => model,
            CameraModelEnum::Brown(model) => model,
        }
    }
}

impl CameraModel for CameraModelEnum {
    fn model_type(&self) -> CameraModelType {
        self.inner().model_type()
    }

    fn camera_id(&self) -> CameraId {
        self.inner().camera_id()
    }

    fn set_camera_id(&mut self, camera_id: CameraId) {
        self.inner_mut().set_camera_id(camera_id)
    }

    fn get_resolution(&self) -> Resolution {
        self.inner().get_resolution()
    }

    fn set_resolution(&mut self, resolution: Resolution) {
        self.inner_mut().set_resolution(resolution)
    }

    fn intrinsics(&self) -> &Intrinsics {
        self.inner().intrinsics()
    }

    fn intrinsics_mut(&mut self) -> &mut Intrinsics {
        self.inner_mut().intrinsics_mut()
    }

    fn have_distortion(&self) -> bool {
        self.inner().have_distortion()
    }

    fn distortion_count(&self) -> usize {
        self.inner().distortion_count()
    }

    fn distort(&self, point: &Vector2<f64>) -> Vector2<f64> {
        self.inner().distort(point)
    }

    fn undistort(&self, point: &Vector2<f64>) -> Result<Vector2<f64>, CameraModelError> {
        self.inner().undistort(point)
    }

    fn params_info(&self) -> String {
        self.inner().params_info()
    }
}

impl fmt::Display for CameraModelEnum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.params_info())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn brown_params() -> PinholeParams {
        PinholeParams::new(CameraModelType::PinholeCameraBrown, 1000.0, 1000.0, 320.0, 240.0)
            .with_distortion(vec![-0.1, 0.0, 0.0, 0.0, 0.0])
    }

    fn resolution() -> Resolution {
        Resolution {
            width: 640,
            height: 480,
        }
    }

    #[test]
    fn test_from_params_selects_variant() {
        let model = CameraModelEnum::from_params(3, resolution(), brown_params()).unwrap();
        assert!(matches!(model, CameraModelEnum::Brown(_)));
        assert_eq!(model.model_type(), CameraModelType::PinholeCameraBrown);
        assert_eq!(model.camera_id(), 3);
        assert_eq!(model.param_count(), 9);

        let params =
            PinholeParams::new(CameraModelType::PinholeCamera, 1000.0, 1000.0, 320.0, 240.0);
        let model = CameraModelEnum::from_params(4, resolution(), params).unwrap();
        assert!(matches!(model, CameraModelEnum::Pinhole(_)));
        assert_eq!(model.param_count(), 4);
    }

    #[test]
    fn test_from_params_rejects_unimplemented_and_foreign_tags() {
        for tag in [
            CameraModelType::PinholeCameraRadial1,
            CameraModelType::PinholeCameraRadial3,
        ] {
            let params = PinholeParams::new(tag, 1000.0, 1000.0, 320.0, 240.0);
            let err = CameraModelEnum::from_params(0, resolution(), params).unwrap_err();
            assert!(matches!(err, CameraModelError::UnsupportedModel(t) if t == tag));
        }

        let params = PinholeParams::new(CameraModelType::None, 1000.0, 1000.0, 320.0, 240.0);
        let err = CameraModelEnum::from_params(0, resolution(), params).unwrap_err();
        assert!(matches!(
            err,
            CameraModelError::TypeMismatch(CameraModelType::None)
        ));
    }

    #[test]
    fn test_enum_dispatch_matches_concrete_model() {
        let concrete = BrownModel::new(0, resolution(), brown_params()).unwrap();
        let dynamic = CameraModelEnum::from_params(0, resolution(), brown_params()).unwrap();

        let point = Vector3::new(0.4, -0.3, 2.0);
        assert_eq!(
            concrete.project(&point, false).unwrap(),
            dynamic.project(&point, false).unwrap()
        );
        assert_eq!(concrete.params_info(), dynamic.to_string());
    }

    #[test]
    fn test_enum_update_through_trait() {
        let mut model = CameraModelEnum::from_params(0, resolution(), brown_params()).unwrap();
        let mut params = model.get_variable_params();
        params[0] = 1200.0;
        model.update_from_variable_params(&params).unwrap();
        assert_eq!(model.intrinsics().fx, 1200.0);

        model.set_width(1280);
        model.set_height(960);
        assert_eq!(model.get_resolution(), Resolution { width: 1280, height: 960 });
    }

    #[test]
    fn test_init_camera_rejects_markers_without_mutation() {
        let mut model = BrownModel::new(0, resolution(), brown_params()).unwrap();
        let snapshot = model.clone();

        for tag in [
            CameraModelType::None,
            CameraModelType::PinholeCameraStart,
            CameraModelType::PinholeCameraEnd,
        ] {
            let params = PinholeParams::new(tag, 1.0, 1.0, 1.0, 1.0).with_distortion(vec![0.0; 5]);
            assert!(matches!(
                model.init_camera(params),
                Err(CameraModelError::TypeMismatch(t)) if t == tag
            ));
            assert_eq!(model, snapshot);
        }

        let params = PinholeParams::new(CameraModelType::PinholeCameraBrown, 1.0, 1.0, 1.0, 1.0);
        assert!(matches!(
            model.init_camera(params),
            Err(CameraModelError::ArityMismatch { expected: 5, found: 0 })
        ));
        assert_eq!(model, snapshot);

        let params = PinholeParams::new(CameraModelType::PinholeCameraBrown, 800.0, 800.0, 300.0, 200.0)
            .with_distortion(vec![0.01, 0.0, 0.0, 0.0, 0.0]);
        model.init_camera(params).unwrap();
        assert_eq!(
            model.get_variable_params(),
            vec![800.0, 800.0, 300.0, 200.0, 0.01, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_enum_undistort_iteration_bound() {
        let params =
            PinholeParams::new(CameraModelType::PinholeCameraBrown, 300.0, 300.0, 320.0, 240.0)
                .with_distortion(vec![5.0, 5.0, 5.0, 0.0, 0.0]);
        let mut model = CameraModelEnum::from_params(0, resolution(), params).unwrap();

        model.set_max_undistort_iterations(3);
        assert!(matches!(
            model.undistort(&Vector2::new(1.5, 1.5)),
            Err(CameraModelError::DistortionNotConverged { iterations: 3 })
        ));

        let mut pinhole = CameraModelEnum::from_params(
            0,
            resolution(),
            PinholeParams::new(CameraModelType::PinholeCamera, 300.0, 300.0, 320.0, 240.0),
        )
        .unwrap();
        pinhole.set_max_undistort_iterations(0);
        assert_eq!(
            pinhole.undistort(&Vector2::new(1.5, 1.5)).unwrap(),
            Vector2::new(1.5, 1.5)
        );
    }

    #[test]
    fn test_parameter_mask() {
        let model = CameraModelEnum::from_params(0, resolution(), brown_params()).unwrap();

        assert_eq!(
            model.parameter_mask(IntrinsicParameterType::ADJUST_ALL),
            vec![true; 9]
        );
        assert_eq!(
            model.parameter_mask(IntrinsicParameterType::NONE),
            vec![false; 9]
        );
        assert_eq!(
            model.parameter_mask(
                IntrinsicParameterType::ADJUST_FOCAL_LENGTH
                    | IntrinsicParameterType::ADJUST_DISTORTION
            ),
            vec![true, true, false, false, true, true, true, true, true]
        );
    }

    #[test]
    fn test_is_inside_image() {
        let model = CameraModelEnum::from_params(0, resolution(), brown_params()).unwrap();
        assert!(model.is_inside_image(&Vector2::new(0.0, 0.0)));
        assert!(model.is_inside_image(&Vector2::new(639.5, 479.5)));
        assert!(!model.is_inside_image(&Vector2::new(640.0, 100.0)));
        assert!(!model.is_inside_image(&Vector2::new(-0.1, 100.0)));
    }

    #[test]
    fn test_projection_matrix_matches_undistorted_projection() {
        let model = CameraModelEnum::from_params(0, resolution(), brown_params()).unwrap();
        let pose = Extrinsics::new(
            nalgebra::Rotation3::from_euler_angles(0.05, -0.1, 0.2).into_inner(),
            Vector3::new(0.5, 0.2, -3.0),
        );
        let world = Vector3::new(0.3, -0.2, 2.0);

        let homogeneous = model.projection_matrix(&pose) * world.push(1.0);
        let via_matrix = Vector2::new(
            homogeneous.x / homogeneous.z,
            homogeneous.y / homogeneous.z,
        );
        let via_project = model
            .project(&pose.world_to_camera(&world), true)
            .unwrap();
        assert_relative_eq!(via_matrix, via_project, epsilon = 1e-9);
    }

    #[test]
    fn test_validation() {
        let intrinsics = Intrinsics::new(-1.0, 1.0, 0.0, 0.0);
        assert!(matches!(
            validation::validate_intrinsics(&intrinsics),
            Err(CameraModelError::FocalLengthMustBePositive)
        ));
        let intrinsics = Intrinsics::new(1.0, 1.0, f64::NAN, 0.0);
        assert!(matches!(
            validation::validate_intrinsics(&intrinsics),
            Err(CameraModelError::PrincipalPointMustBeFinite)
        ));
    }
}
