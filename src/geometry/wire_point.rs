use crate::math::Point2;

/// A wire vertex: a position plus a junction marker.
///
/// `is_junction` is set when the point is anchored on a segment of another
/// wire. Only the wire manager changes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WirePoint {
    position: Point2,
    is_junction: bool,
}

impl WirePoint {
    /// Creates a non-junction wire point.
    #[must_use]
    pub fn new(position: Point2) -> Self {
        Self {
            position,
            is_junction: false,
        }
    }

    /// Creates a wire point with an explicit junction marker, e.g. when
    /// restoring a stored wire.
    #[must_use]
    pub fn with_junction(position: Point2, is_junction: bool) -> Self {
        Self {
            position,
            is_junction,
        }
    }

    #[must_use]
    pub fn position(&self) -> Point2 {
        self.position
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[must_use]
    pub fn is_junction(&self) -> bool {
        self.is_junction
    }

    pub(crate) fn set_position(&mut self, position: Point2) {
        self.position = position;
    }

    pub(crate) fn set_is_junction(&mut self, is_junction: bool) {
        self.is_junction = is_junction;
    }
}

impl From<Point2> for WirePoint {
    fn from(position: Point2) -> Self {
        Self::new(position)
    }
}
