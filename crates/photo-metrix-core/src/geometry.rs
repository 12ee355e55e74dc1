use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Planar point in pixel space or in a projected map plane.
///
/// Both points of any distance computation must live in the same space;
/// nothing here can check that for the caller.
pub type Point = Point2<f64>;

/// Euclidean distance between two points sharing one planar unit.
#[inline]
pub fn euclidean_distance(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Axis-aligned bounding box `(x_min, y_min, x_max, y_max)` in pixels.
///
/// Serialized as a flat `[x_min, y_min, x_max, y_max]` array, which is the
/// layout object detectors usually emit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl BoundingBox {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Midpoint of the box.
    #[inline]
    pub fn center(&self) -> Point {
        Point::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// `true` when every coordinate is a finite number.
    ///
    /// Inverted boxes are accepted: only the center is used downstream and
    /// it is well defined regardless of corner order.
    pub fn is_finite(&self) -> bool {
        self.x_min.is_finite()
            && self.y_min.is_finite()
            && self.x_max.is_finite()
            && self.y_max.is_finite()
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x_min, b.y_min, b.x_max, b.y_max]
    }
}
