//! Camera pose as a rotation plus a camera center.
//!
//! The pose is stored as `R` and `C` (the camera center in world
//! coordinates); the translation of the usual `[R | t]` form is `t = -R·C`.
//! `R` must be a proper rotation. This is not checked.

use nalgebra::{Matrix3, Matrix3x4, Matrix3xX, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extrinsics {
    pub rotation: Matrix3<f64>,
    pub center: Vector3<f64>,
}

impl Default for Extrinsics {
    fn default() -> Self {
        Extrinsics {
            rotation: Matrix3::identity(),
            center: Vector3::zeros(),
        }
    }
}

impl Extrinsics {
    pub fn new(rotation: Matrix3<f64>, center: Vector3<f64>) -> Self {
        Extrinsics { rotation, center }
    }

    /// `t = -R·C`
    pub fn translation(&self) -> Vector3<f64> {
        -self.rotation * self.center
    }

    /// `[R | -R·C]`, mapping homogeneous world points into the camera frame.
    pub fn extrinsic_matrix(&self) -> Matrix3x4<f64> {
        let mut matrix = Matrix3x4::zeros();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        matrix.set_column(3, &self.translation());
        matrix
    }

    /// `[Rᵗ | C]`, mapping homogeneous camera points back into the world.
    pub fn inverse_matrix(&self) -> Matrix3x4<f64> {
        let mut matrix = Matrix3x4::zeros();
        matrix
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&self.rotation.transpose());
        matrix.set_column(3, &self.center);
        matrix
    }

    /// `R·(X - C)` for a single world point.
    pub fn world_to_camera(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * (point - self.center)
    }

    /// `R·(X - C)` applied to every column of `points`.
    pub fn world_to_camera_batch(&self, points: &Matrix3xX<f64>) -> Matrix3xX<f64> {
        let mut centered = points.clone();
        for mut column in centered.column_iter_mut() {
            column -= self.center;
        }
        self.rotation * centered
    }

    /// `Rᵗ·x + C` for a single camera-frame point.
    pub fn camera_to_world(&self, point: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.transpose() * point + self.center
    }

    /// `Rᵗ·x + C` applied to every column of `points`.
    pub fn camera_to_world_batch(&self, points: &Matrix3xX<f64>) -> Matrix3xX<f64> {
        let mut world = self.rotation.transpose() * points;
        for mut column in world.column_iter_mut() {
            column += self.center;
        }
        world
    }
}

/// Composition of rigid transforms: `(R1, C1) * (R2, C2) = (R1·R2, R1·C2 + C1)`.
///
/// Associative but not commutative.
impl Mul for &Extrinsics {
    type Output = Extrinsics;

    fn mul(self, other: &Extrinsics) -> Extrinsics {
        Extrinsics {
            rotation: self.rotation * other.rotation,
            center: self.rotation * other.center + self.center,
        }
    }
}

impl Mul for Extrinsics {
    type Output = Extrinsics;

    fn mul(self, other: Extrinsics) -> Extrinsics {
        &self * &other
    }
}
