//! Identifier types shared across the photogrammetry pipeline.
//!
//! Cameras, images, image pairs and 2D/3D points are referred to by plain
//! integers. The maximum value of each integer type is reserved as an
//! "invalid" sentinel meaning the identifier has not been assigned yet.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Unique identifier for cameras.
pub type CameraId = u32;
/// Unique identifier for images.
pub type ImageId = u32;
/// Each image pair gets a unique ID.
pub type ImagePairId = u64;
/// Unique identifier for a 2D point.
pub type Point2DId = u32;
/// Unique identifier for a 3D point.
pub type Point3DId = u64;

pub const INVALID_CAMERA_ID: CameraId = CameraId::MAX;
pub const INVALID_IMAGE_ID: ImageId = ImageId::MAX;
pub const INVALID_IMAGE_PAIR_ID: ImagePairId = ImagePairId::MAX;
pub const INVALID_POINT2D_ID: Point2DId = Point2DId::MAX;
pub const INVALID_POINT3D_ID: Point3DId = Point3DId::MAX;

/// An ordered pair of camera identifiers, used as a key for camera-pair maps.
///
/// Equality is ordered (`(a, b) != (b, a)` unless `a == b`), but the hash is
/// symmetric: both orderings land in the same bucket.
///
/// ```rust
/// use camera_geometry::types::Pair;
/// use std::collections::HashMap;
///
/// let mut overlaps: HashMap<Pair, usize> = HashMap::new();
/// overlaps.insert(Pair::new(0, 3), 42);
/// assert_eq!(overlaps.get(&Pair::new(0, 3)), Some(&42));
/// assert_eq!(overlaps.get(&Pair::new(3, 0)), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair {
    pub first: CameraId,
    pub second: CameraId,
}

impl Pair {
    pub fn new(first: CameraId, second: CameraId) -> Self {
        Pair { first, second }
    }

    /// The same pair with its members swapped.
    pub fn swapped(&self) -> Self {
        Pair {
            first: self.second,
            second: self.first,
        }
    }
}

impl Hash for Pair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // xor of the members, so (a, b) and (b, a) hash alike
        (self.first ^ self.second).hash(state);
    }
}

impl From<(CameraId, CameraId)> for Pair {
    fn from((first, second): (CameraId, CameraId)) -> Self {
        Pair::new(first, second)
    }
}
