//! Point Projection Example
//!
//! Loads a camera from a YAML configuration, places it with a pose and
//! projects a few world points, reporting which ones land inside the image.
//!
//! Usage:
//! ```bash
//! cargo run --example project_points -- \
//!   --input_path samples/brown.yaml \
//!   --center 0.0,0.0,-2.0
//! ```

use camera_geometry::camera::{CameraModel, CameraModelEnum, Extrinsics};
use clap::Parser;
use flexi_logger::{colored_detailed_format, detailed_format, Duplicate, FileSpec, Logger};
use log::{info, warn};
use nalgebra::{Matrix3, Matrix3xX, Vector3};
use std::path::PathBuf;

/// Projects world points through a configured camera
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the camera configuration file
    #[arg(short = 'p', long)]
    input_path: PathBuf,

    /// Camera center in world coordinates, as x,y,z
    #[arg(short = 'c', long, value_delimiter = ',', allow_negative_numbers = true, default_values_t = [0.0, 0.0, 0.0])]
    center: Vec<f64>,

    /// Project without lens distortion
    #[arg(long)]
    ignore_distortion: bool,
}

fn sample_points() -> Matrix3xX<f64> {
    Matrix3xX::from_columns(&[
        Vector3::new(0.0, 0.0, 3.0),
        Vector3::new(0.5, 0.2, 3.0),
        Vector3::new(-0.8, 0.4, 2.5),
        Vector3::new(1.5, -1.0, 2.0),
        Vector3::new(3.0, 3.0, 1.0),
    ])
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    Logger::try_with_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory("logs")
                .suppress_timestamp()
                .suffix("log"),
        )
        .duplicate_to_stdout(Duplicate::All)
        .format_for_files(detailed_format)
        .format_for_stdout(colored_detailed_format)
        // error;warn;info;debug;trace
        .set_palette("196;208;76;39;178".to_string())
        .start()?;

    let cli = Cli::parse();
    info!("Input Path: {:?}", cli.input_path);

    let input_path = cli
        .input_path
        .to_str()
        .ok_or("Input path is not valid UTF-8")?;
    let model = CameraModelEnum::load_from_yaml(input_path)?;
    info!("Loaded {} camera {}", model.model_type(), model.camera_id());
    info!("Camera parameters:\n{}", model);

    let center = match cli.center.as_slice() {
        [x, y, z] => Vector3::new(*x, *y, *z),
        other => return Err(format!("Expected center as x,y,z, got {:?}", other).into()),
    };
    let pose = Extrinsics::new(Matrix3::identity(), center);
    info!("Projection matrix: {}", model.projection_matrix(&pose));

    let points_camera = pose.world_to_camera_batch(&sample_points());
    for (i, point) in points_camera.column_iter().enumerate() {
        match model.project(&point.into_owned(), cli.ignore_distortion) {
            Ok(pixel) if model.is_inside_image(&pixel) => {
                info!("point {}: ({:.3}, {:.3})", i, pixel.x, pixel.y);
            }
            Ok(pixel) => {
                warn!(
                    "point {}: ({:.3}, {:.3}) falls outside the image",
                    i, pixel.x, pixel.y
                );
            }
            Err(e) => warn!("point {}: {}", i, e),
        }
    }

    Ok(())
}
