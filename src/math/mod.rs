pub mod distance_2d;
pub mod intersect_2d;

/// 2D point type in document (grid) coordinates.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Threshold below which a squared length is treated as zero.
pub const TOLERANCE: f64 = 1e-10;
