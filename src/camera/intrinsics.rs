//! Intrinsic parameters of a pinhole-family camera.

use crate::camera::PinholeParams;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Focal length, principal point and distortion coefficients.
///
/// The focal length and principal point are public and may be adjusted in
/// place. The distortion list is only replaced through validated paths on the
/// owning camera model, which keep its length equal to what the model expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
    distortion: Vec<f64>,
}

impl Intrinsics {
    /// Intrinsics with the given focal length and principal point and no
    /// distortion coefficients.
    pub fn new(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Intrinsics {
            fx,
            fy,
            cx,
            cy,
            distortion: Vec::new(),
        }
    }

    /// Populates the intrinsics from a parameter bundle.
    ///
    /// The owning model has already checked the bundle's tag and distortion
    /// length, see [`crate::camera::CameraModel::init_camera`].
    pub(crate) fn init_camera(&mut self, params: PinholeParams) {
        self.fx = params.fx;
        self.fy = params.fy;
        self.cx = params.cx;
        self.cy = params.cy;
        self.distortion = params.distortion;
    }

    pub fn mean_focal_length(&self) -> f64 {
        (self.fx + self.fy) / 2.0
    }

    /// Sets both focal lengths to `focal_length`.
    pub fn set_focal_length(&mut self, focal_length: f64) {
        self.fx = focal_length;
        self.fy = focal_length;
    }

    pub fn set_principal_point(&mut self, cx: f64, cy: f64) {
        self.cx = cx;
        self.cy = cy;
    }

    pub fn distortion(&self) -> &[f64] {
        &self.distortion
    }

    pub(crate) fn set_distortion(&mut self, distortion: &[f64]) {
        self.distortion = distortion.to_vec();
    }

    /// `K = [[fx, 0, cx], [0, fy, cy], [0, 0, 1]]`
    pub fn intrinsic_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.fx, 0.0, self.cx, //
            0.0, self.fy, self.cy, //
            0.0, 0.0, 1.0,
        )
    }

    /// Closed-form inverse of [`Intrinsics::intrinsic_matrix`].
    ///
    /// Only meaningful for non-zero focal lengths.
    pub fn inverse_intrinsic_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            1.0 / self.fx,
            0.0,
            -self.cx / self.fx,
            0.0,
            1.0 / self.fy,
            -self.cy / self.fy,
            0.0,
            0.0,
            1.0,
        )
    }

    /// Human-readable report of the focal length and principal point.
    pub fn params_info(&self) -> String {
        let mut info = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(info, "Focal Length: (fx:{}, fy:{})", self.fx, self.fy);
        let _ = writeln!(info, "Principal Point: (cx:{}, cy:{})", self.cx, self.cy);
        info
    }
}
