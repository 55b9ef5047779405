use crate::math::distance_2d::{points_coincide, project_onto_segment};
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::{Point2, Vector2};

/// A straight run of a wire between two consecutive wire points.
///
/// The parametric form is: `P(t) = p1 + t * (p2 - p1)`, `t ∈ [0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    p1: Point2,
    p2: Point2,
}

impl Segment {
    /// Creates a new segment from `p1` to `p2`.
    #[must_use]
    pub fn new(p1: Point2, p2: Point2) -> Self {
        Self { p1, p2 }
    }

    /// Returns the start point.
    #[must_use]
    pub fn p1(&self) -> Point2 {
        self.p1
    }

    /// Returns the end point.
    #[must_use]
    pub fn p2(&self) -> Point2 {
        self.p2
    }

    /// Returns the (non-normalized) direction `p2 - p1`.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.p2 - self.p1
    }

    /// Returns `true` if both endpoints coincide within `tol`.
    #[must_use]
    pub fn is_degenerate(&self, tol: f64) -> bool {
        points_coincide(&self.p1, &self.p2, tol)
    }

    /// Evaluates the segment at parameter `t`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.p1 + self.direction() * t
    }

    /// Projects `p` onto the segment, returning `(t, distance)`.
    ///
    /// Returns `None` if the segment is shorter than `tol`: a degenerate
    /// segment has no valid projection.
    #[must_use]
    pub fn project(&self, p: &Point2, tol: f64) -> Option<(f64, f64)> {
        if self.is_degenerate(tol) {
            return None;
        }
        project_onto_segment(p, &self.p1, &self.p2)
    }

    /// Returns the parameter of `p` if it lies on the segment within `tol`.
    #[must_use]
    pub fn parameter_of(&self, p: &Point2, tol: f64) -> Option<f64> {
        self.project(p, tol)
            .and_then(|(t, dist)| (dist <= tol).then_some(t))
    }

    /// Returns `true` if `p` lies on the segment within `tol`.
    #[must_use]
    pub fn contains_point(&self, p: &Point2, tol: f64) -> bool {
        self.parameter_of(p, tol).is_some()
    }

    /// Returns `true` if `p` coincides with one of the endpoints.
    #[must_use]
    pub fn has_endpoint(&self, p: &Point2, tol: f64) -> bool {
        points_coincide(&self.p1, p, tol) || points_coincide(&self.p2, p, tol)
    }

    /// Intersects two segments; see [`segment_segment_intersect_2d`].
    #[must_use]
    pub fn intersection(&self, other: &Segment) -> Option<(Point2, f64, f64)> {
        segment_segment_intersect_2d(&self.p1, &self.p2, &other.p1, &other.p2)
    }
}
