//! Implements the Brown-Conrady pinhole camera model.
//!
//! This module provides the [`BrownModel`] struct: a pinhole camera with
//! three radial (`k1`, `k2`, `k3`) and two tangential (`t1`, `t2`) distortion
//! coefficients. It adheres to the [`CameraModel`] trait defined in the parent
//! `camera` module ([`crate::camera`]); the distortion math lives in
//! [`crate::camera::distortion`].

use crate::camera::distortion::{
    brown_distort, brown_undistort, BROWN_COEFFICIENT_COUNT, DEFAULT_MAX_UNDISTORT_ITERATIONS,
    UNDISTORT_EPSILON,
};
use crate::camera::{
    CameraModel, CameraModelError, CameraModelType, Intrinsics, PinholeParams, Resolution,
};
use crate::types::{CameraId, INVALID_CAMERA_ID};
use log::info;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a Brown-Conrady camera model.
///
/// The distortion coefficients are stored in the intrinsics in the order
/// `[k1, k2, k3, t1, t2]`, and the parameter vector is
/// `[fx, fy, cx, cy, k1, k2, k3, t1, t2]`.
///
/// # Examples
///
/// ```rust
/// use camera_geometry::camera::{BrownModel, CameraModel, CameraModelType, PinholeParams, Resolution};
/// use nalgebra::Vector2;
///
/// let params = PinholeParams::new(CameraModelType::PinholeCameraBrown, 1000.0, 1000.0, 320.0, 240.0)
///     .with_distortion(vec![-0.1, 0.0, 0.0, 0.0, 0.0]);
/// let model = BrownModel::new(0, Resolution { width: 640, height: 480 }, params).unwrap();
///
/// let point = Vector2::new(0.1, 0.1);
/// let undistorted = model.undistort(&model.distort(&point)).unwrap();
/// assert!((undistorted - point).norm() < 1e-8);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrownModel {
    /// Identifier of the physical camera, [`INVALID_CAMERA_ID`] until assigned.
    pub camera_id: CameraId,
    /// The resolution of the camera image, [`Resolution`] (width, height).
    pub resolution: Resolution,
    intrinsics: Intrinsics,
    /// Iteration bound of [`CameraModel::undistort`].
    max_undistort_iterations: usize,
}

impl Default for BrownModel {
    fn default() -> Self {
        BrownModel {
            camera_id: INVALID_CAMERA_ID,
            resolution: Resolution::default(),
            intrinsics: Intrinsics::default(),
            max_undistort_iterations: DEFAULT_MAX_UNDISTORT_ITERATIONS,
        }
    }
}

impl BrownModel {
    /// Creates a new [`BrownModel`] from a parameter bundle carrying five
    /// distortion coefficients `[k1, k2, k3, t1, t2]`.
    ///
    /// # Errors
    ///
    /// * [`CameraModelError::TypeMismatch`]: the bundle is not of the pinhole family.
    /// * [`CameraModelError::ArityMismatch`]: the bundle does not carry exactly five
    ///   distortion coefficients.
    /// * [`CameraModelError::FocalLengthMustBePositive`] /
    ///   [`CameraModelError::PrincipalPointMustBeFinite`]: invalid intrinsics.
    pub fn new(
        camera_id: CameraId,
        resolution: Resolution,
        params: PinholeParams,
    ) -> Result<Self, CameraModelError> {
        let mut model = BrownModel {
            camera_id,
            resolution,
            ..Default::default()
        };
        model.init_camera(params)?;
        model.validate_params()?;

        info!("new Brown model is: {:?}", model);
        Ok(model)
    }

    /// Sets the iteration bound used by [`CameraModel::undistort`].
    pub fn with_max_undistort_iterations(mut self, max_iterations: usize) -> Self {
        self.max_undistort_iterations = max_iterations;
        self
    }

    /// In-place form of [`BrownModel::with_max_undistort_iterations`].
    pub fn set_max_undistort_iterations(&mut self, max_iterations: usize) {
        self.max_undistort_iterations = max_iterations;
    }

    pub fn max_undistort_iterations(&self) -> usize {
        self.max_undistort_iterations
    }

    /// Distortion coefficients `[k1, k2, k3, t1, t2]`.
    ///
    /// Missing trailing entries, possible only in a hand-edited serialized
    /// model, read as zero.
    pub fn coefficients(&self) -> [f64; BROWN_COEFFICIENT_COUNT] {
        let mut coefficients = [0.0; BROWN_COEFFICIENT_COUNT];
        for (dst, src) in coefficients.iter_mut().zip(self.intrinsics.distortion()) {
            *dst = *src;
        }
        coefficients
    }
}

impl CameraModel for BrownModel {
    fn model_type(&self) -> CameraModelType {
        CameraModelType::PinholeCameraBrown
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
        true
    }

    fn distortion_count(&self) -> usize {
        BROWN_COEFFICIENT_COUNT
    }

    /// Applies the Brown-Conrady displacement to a normalized point.
    ///
    /// # Arguments
    ///
    /// * `point` - Undistorted point on the normalized camera plane.
    ///
    /// # Return Value
    ///
    /// `point + displacement(point)`, see
    /// [`crate::camera::distortion::brown_displacement`].
    fn distort(&self, point: &Vector2<f64>) -> Vector2<f64> {
        brown_distort(&self.coefficients(), point)
    }

    /// Fixed-point inverse of [`CameraModel::distort`], bounded by
    /// [`BrownModel::max_undistort_iterations`].
    ///
    /// # Errors
    ///
    /// [`CameraModelError::DistortionNotConverged`] when the point lies outside
    /// the convergence radius of the iteration.
    fn undistort(&self, point: &Vector2<f64>) -> Result<Vector2<f64>, CameraModelError> {
        brown_undistort(
            &self.coefficients(),
            point,
            self.max_undistort_iterations,
            UNDISTORT_EPSILON,
        )
    }

    /// Intrinsics report followed by the five distortion coefficients.
    ///
    /// ```text
    /// Focal Length: (fx:1000, fy:1000)
    /// Principal Point: (cx:320, cy:240)
    /// Distortion: k1: -0.1, k2: 0, k3: 0
    /// t1: 0, t2: 0
    /// ```
    fn params_info(&self) -> String {
        let [k1, k2, k3, t1, t2] = self.coefficients();
        format!(
            "{}Distortion: k1: {}, k2: {}, k3: {}\nt1: {}, t2: {}\n",
            self.intrinsics.params_info(),
            k1,
            k2,
            k3,
            t1,
            t2
        )
    }
}

impl fmt::Display for BrownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.params_info())
    }
}
