//! Brown-Conrady distortion kernel.
//!
//! Everything here works on the normalized camera plane, after `ima2cam` and
//! before `cam2ima`, so it is independent of image scale.
//!
//! The inverse has no closed form and is found by fixed-point iteration
//! (Heikkilä, "Geometric Camera Calibration Using Circular Control Points",
//! 2000). The iteration is bounded and reports non-convergence as an error.

use crate::camera::CameraModelError;
use log::{debug, warn};
use nalgebra::Vector2;

/// Number of Brown-Conrady coefficients: k1, k2, k3, t1, t2.
pub const BROWN_COEFFICIENT_COUNT: usize = 5;

/// Positions of the distortion coefficients in a Brown parameter vector.
pub const IDX_DISTORTION_K1: usize = 4;
pub const IDX_DISTORTION_K2: usize = 5;
pub const IDX_DISTORTION_K3: usize = 6;
pub const IDX_DISTORTION_T1: usize = 7;
pub const IDX_DISTORTION_T2: usize = 8;

/// L1 convergence threshold of the undistortion iteration.
pub const UNDISTORT_EPSILON: f64 = 1e-10;
/// Default iteration bound of the undistortion iteration.
pub const DEFAULT_MAX_UNDISTORT_ITERATIONS: usize = 50;

/// Displacement added to a normalized point by Brown-Conrady distortion.
///
/// ```text
/// r²           = x² + y²
/// radial       = k1·r² + k2·r⁴ + k3·r⁶
/// tangential_x = t2·(r² + 2x²) + 2·t1·x·y
/// tangential_y = t1·(r² + 2y²) + 2·t2·x·y
/// ```
pub fn brown_displacement(
    coefficients: &[f64; BROWN_COEFFICIENT_COUNT],
    point: &Vector2<f64>,
) -> Vector2<f64> {
    let [k1, k2, k3, t1, t2] = *coefficients;
    let x = point.x;
    let y = point.y;

    let r2 = x * x + y * y;
    let r4 = r2 * r2;
    let r6 = r4 * r2;
    let radial = k1 * r2 + k2 * r4 + k3 * r6;
    let tangential_x = t2 * (r2 + 2.0 * x * x) + 2.0 * t1 * x * y;
    let tangential_y = t1 * (r2 + 2.0 * y * y) + 2.0 * t2 * x * y;

    Vector2::new(x * radial + tangential_x, y * radial + tangential_y)
}

/// Applies Brown-Conrady distortion to an undistorted normalized point.
pub fn brown_distort(
    coefficients: &[f64; BROWN_COEFFICIENT_COUNT],
    point: &Vector2<f64>,
) -> Vector2<f64> {
    point + brown_displacement(coefficients, point)
}

/// Inverts [`brown_distort`] by fixed-point iteration.
///
/// Starting from `p_u = p_d`, repeats `p_u = p_d - displacement(p_u)` until
/// `‖(p_u + displacement(p_u)) - p_d‖₁ < epsilon`.
///
/// # Errors
///
/// [`CameraModelError::DistortionNotConverged`] if the tolerance is not met
/// within `max_iterations` updates, or the iterate stops being finite. This
/// happens for coefficients outside the convergence radius of the iteration,
/// such as strong fisheye distortion.
pub fn brown_undistort(
    coefficients: &[f64; BROWN_COEFFICIENT_COUNT],
    distorted: &Vector2<f64>,
    max_iterations: usize,
    epsilon: f64,
) -> Result<Vector2<f64>, CameraModelError> {
    let mut undistorted = *distorted;
    let mut displacement = brown_displacement(coefficients, &undistorted);

    for iteration in 0..=max_iterations {
        // manhattan distance between the re-distorted estimate and the input
        let error = (undistorted + displacement - distorted).lp_norm(1);
        if error < epsilon {
            debug!("Undistortion converged after {} iterations", iteration);
            return Ok(undistorted);
        }
        if !error.is_finite() || iteration == max_iterations {
            break;
        }
        undistorted = distorted - displacement;
        displacement = brown_displacement(coefficients, &undistorted);
    }

    warn!(
        "Undistortion of ({}, {}) did not converge within {} iterations",
        distorted.x, distorted.y, max_iterations
    );
    Err(CameraModelError::DistortionNotConverged {
        iterations: max_iterations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const K1_ONLY: [f64; 5] = [-0.1, 0.0, 0.0, 0.0, 0.0];
    const FULL: [f64; 5] = [-0.28340811, 0.07395907, 0.0, 0.00019359, 1.76187114e-05];

    #[test]
    fn test_zero_coefficients_are_identity() {
        let point = Vector2::new(0.3, -0.2);
        assert_eq!(brown_displacement(&[0.0; 5], &point), Vector2::zeros());
        assert_eq!(brown_distort(&[0.0; 5], &point), point);
        assert_eq!(
            brown_undistort(&[0.0; 5], &point, 10, UNDISTORT_EPSILON).unwrap(),
            point
        );
    }

    #[test]
    fn test_displacement_matches_formula() {
        let coefficients = [0.1, 0.01, 0.001, 0.002, -0.003];
        let (x, y) = (0.2, -0.4);
        let r2 = x * x + y * y;
        let radial = 0.1 * r2 + 0.01 * r2 * r2 + 0.001 * r2 * r2 * r2;
        let expected_x = x * radial + (-0.003) * (r2 + 2.0 * x * x) + 2.0 * 0.002 * x * y;
        let expected_y = y * radial + 0.002 * (r2 + 2.0 * y * y) + 2.0 * (-0.003) * x * y;

        let displacement = brown_displacement(&coefficients, &Vector2::new(x, y));
        assert_relative_eq!(displacement.x, expected_x, epsilon = 1e-15);
        assert_relative_eq!(displacement.y, expected_y, epsilon = 1e-15);
    }

    #[test]
    fn test_distort_undistort_round_trip() {
        let point = Vector2::new(0.1, 0.1);
        let distorted = brown_distort(&K1_ONLY, &point);
        let undistorted = brown_undistort(
            &K1_ONLY,
            &distorted,
            DEFAULT_MAX_UNDISTORT_ITERATIONS,
            UNDISTORT_EPSILON,
        )
        .unwrap();

        assert!((undistorted - point).lp_norm(1) < 1e-8);
    }

    #[test]
    fn test_round_trip_over_grid() {
        for i in -4..=4 {
            for j in -3..=3 {
                let point = Vector2::new(i as f64 * 0.1, j as f64 * 0.1);

                let distorted = brown_distort(&FULL, &point);
                let undistorted = brown_undistort(
                    &FULL,
                    &distorted,
                    DEFAULT_MAX_UNDISTORT_ITERATIONS,
                    UNDISTORT_EPSILON,
                )
                .unwrap();
                assert!(
                    (brown_distort(&FULL, &undistorted) - distorted).lp_norm(1) < UNDISTORT_EPSILON,
                    "point {:?} did not round trip",
                    point
                );
                assert!((undistorted - point).lp_norm(1) < 1e-8);
            }
        }
    }

    #[test]
    fn test_undistort_reports_non_convergence() {
        // Far outside the convergence radius of the fixed-point iteration
        let extreme = [5.0, 5.0, 5.0, 0.0, 0.0];
        let err = brown_undistort(&extreme, &Vector2::new(1.5, 1.5), 50, UNDISTORT_EPSILON)
            .unwrap_err();
        assert!(matches!(
            err,
            CameraModelError::DistortionNotConverged { iterations: 50 }
        ));
    }

    #[test]
    fn test_zero_iteration_budget() {
        let distorted = brown_distort(&K1_ONLY, &Vector2::new(0.3, 0.2));
        assert!(brown_undistort(&K1_ONLY, &distorted, 0, UNDISTORT_EPSILON).is_err());
    }
}
