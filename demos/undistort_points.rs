//! Undistortion Example
//!
//! Samples a grid of pixels over the image of a configured camera and
//! back-projects each one twice: linearly through `K⁻¹` and through the
//! distortion inverse. Prints the angle between the two rays and the
//! re-projection error of the undistorted ray.
//!
//! Usage:
//! ```bash
//! RUST_LOG=info cargo run --example undistort_points -- \
//!   --input-path samples/brown.yaml \
//!   --grid 8
//! ```

use camera_geometry::camera::{CameraModel, CameraModelEnum};
use clap::Parser;
use log::{info, warn};
use nalgebra::{Matrix2xX, Vector2};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the camera configuration file
    #[arg(short = 'p', long)]
    input_path: PathBuf,

    /// Number of samples along each image axis
    #[arg(short = 'g', long, default_value_t = 6)]
    grid: usize,
}

fn pixel_grid(width: u32, height: u32, samples: usize) -> Matrix2xX<f64> {
    let samples = samples.max(2);
    let step_x = (width.saturating_sub(1)) as f64 / (samples - 1) as f64;
    let step_y = (height.saturating_sub(1)) as f64 / (samples - 1) as f64;

    let mut pixels = Vec::with_capacity(samples * samples);
    for j in 0..samples {
        for i in 0..samples {
            pixels.push(Vector2::new(i as f64 * step_x, j as f64 * step_y));
        }
    }
    Matrix2xX::from_columns(&pixels)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    let input_path = cli.input_path.to_str().ok_or("Invalid input path string")?;
    let model = CameraModelEnum::load_from_yaml(input_path)?;
    info!("Loaded {} camera {}", model.model_type(), model.camera_id());

    println!("{}", model);
    println!("{:>10} {:>10} {:>12} {:>14}", "u", "v", "angle[deg]", "reproj[px]");

    let pixels = pixel_grid(model.width(), model.height(), cli.grid);
    let linear = model.bearing_vectors(&pixels);

    let mut failures = 0;
    for (pixel, linear_ray) in pixels.column_iter().zip(linear.column_iter()) {
        let pixel = pixel.into_owned();
        match model.unproject(&pixel) {
            Ok(ray) => {
                let angle = ray.angle(&linear_ray.into_owned()).to_degrees();
                let reprojection = model
                    .project(&ray, false)
                    .map(|p| (p - pixel).norm())
                    .unwrap_or(f64::NAN);
                println!(
                    "{:>10.2} {:>10.2} {:>12.4} {:>14.2e}",
                    pixel.x, pixel.y, angle, reprojection
                );
            }
            Err(e) => {
                failures += 1;
                warn!("({:.2}, {:.2}): {}", pixel.x, pixel.y, e);
            }
        }
    }

    info!(
        "{} of {} pixels could not be undistorted",
        failures,
        pixels.ncols()
    );
    Ok(())
}
