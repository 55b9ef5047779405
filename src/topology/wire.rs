use crate::error::{Result, TopologyError};
use crate::geometry::{Segment, WirePoint};
use crate::math::distance_2d::points_coincide;
use crate::math::{Point2, Vector2};

slotmap::new_key_type! {
    /// Unique identifier for a wire owned by a [`WireManager`](super::WireManager).
    pub struct WireId;
}

/// A poly-line wire: an ordered sequence of wire points.
///
/// Index 0 is the first endpoint, the last index the second endpoint and
/// everything in between is a bend point. Segments and junction indices are
/// derived from the point list on demand.
///
/// A wire owned by a manager is only reachable through `&Wire`; structural
/// edits go through the manager (see [`crate::operations::edit`]) so that the
/// network stays consistent. The mutators below are the raw, unobserved edits
/// the manager brackets with its change hooks.
#[derive(Debug, Clone, Default)]
pub struct Wire {
    points: Vec<WirePoint>,
    connected: Vec<WireId>,
}

impl Wire {
    /// Creates an empty wire.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wire made of a single segment.
    #[must_use]
    pub fn from_segment(p1: Point2, p2: Point2) -> Self {
        Self::from_points([WirePoint::new(p1), WirePoint::new(p2)])
    }

    /// Rebuilds a wire from a stored point sequence.
    ///
    /// Junction flags are kept as given; a manager recomputes them on load.
    pub fn from_points(points: impl IntoIterator<Item = WirePoint>) -> Self {
        Self {
            points: points.into_iter().collect(),
            connected: Vec::new(),
        }
    }

    /// Returns the point list.
    #[must_use]
    pub fn points(&self) -> &[WirePoint] {
        &self.points
    }

    #[must_use]
    pub fn points_count(&self) -> usize {
        self.points.len()
    }

    /// Returns the point at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn point(&self, index: usize) -> Result<&WirePoint> {
        self.check_index(index)?;
        Ok(&self.points[index])
    }

    #[must_use]
    pub fn first_point(&self) -> Option<Point2> {
        self.points.first().map(WirePoint::position)
    }

    #[must_use]
    pub fn last_point(&self) -> Option<Point2> {
        self.points.last().map(WirePoint::position)
    }

    /// Returns the indices of all points flagged as junctions.
    #[must_use]
    pub fn junctions(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_junction())
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns the wires this wire is connected to.
    ///
    /// The identifiers are non-owning; resolve them through the manager.
    #[must_use]
    pub fn connected_wires(&self) -> &[WireId] {
        &self.connected
    }

    /// Returns one segment per pair of consecutive points.
    #[must_use]
    pub fn line_segments(&self) -> Vec<Segment> {
        self.points
            .windows(2)
            .map(|w| Segment::new(w[0].position(), w[1].position()))
            .collect()
    }

    /// Returns `true` if `p` lies on one of the wire's segments or
    /// coincides with one of its points.
    #[must_use]
    pub fn is_point_on_wire(&self, p: &Point2, tol: f64) -> bool {
        self.points
            .iter()
            .any(|wp| points_coincide(&wp.position(), p, tol))
            || self
                .line_segments()
                .iter()
                .any(|s| s.contains_point(p, tol))
    }

    /// Moves the point at `index` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn move_point_to(&mut self, index: usize, to: Point2) -> Result<()> {
        self.check_index(index)?;
        self.points[index].set_position(to);
        Ok(())
    }

    /// Sets or clears the junction marker of a single point.
    pub(crate) fn set_point_is_junction(&mut self, index: usize, is_junction: bool) -> Result<()> {
        self.check_index(index)?;
        self.points[index].set_is_junction(is_junction);
        Ok(())
    }

    /// Inserts a point before the first endpoint.
    pub fn prepend_point(&mut self, point: Point2) {
        self.points.insert(0, WirePoint::new(point));
    }

    /// Appends a point after the last endpoint.
    pub fn append_point(&mut self, point: Point2) {
        self.points.push(WirePoint::new(point));
    }

    /// Inserts a point so that it ends up at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index > points_count()`.
    pub fn insert_point(&mut self, index: usize, point: Point2) -> Result<()> {
        if index > self.points.len() {
            return Err(TopologyError::PointIndexOutOfRange {
                index,
                len: self.points.len(),
            }
            .into());
        }
        self.points.insert(index, WirePoint::new(point));
        Ok(())
    }

    /// Removes and returns the point at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn remove_point(&mut self, index: usize) -> Result<WirePoint> {
        self.check_index(index)?;
        Ok(self.points.remove(index))
    }

    /// Moves every point by `delta`.
    pub fn translate(&mut self, delta: Vector2) {
        for p in &mut self.points {
            p.set_position(p.position() + delta);
        }
    }

    /// Reverses the point order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Collapses runs of coincident consecutive points, keeping at least two
    /// points. A collapsed point hands its junction marker to the survivor.
    ///
    /// Returns the number of removed points.
    pub fn remove_duplicate_points(&mut self, tol: f64) -> usize {
        let mut removed = 0;
        let mut i = 1;
        while i < self.points.len() && self.points.len() > 2 {
            let prev = self.points[i - 1];
            let cur = self.points[i];
            if points_coincide(&prev.position(), &cur.position(), tol) {
                // Keep the endpoint's position when the duplicate is the last point.
                let keep = if i == self.points.len() - 1 { i } else { i - 1 };
                let junction = prev.is_junction() || cur.is_junction();
                self.points[keep].set_is_junction(junction);
                self.points.remove(if keep == i { i - 1 } else { i });
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Returns `true` if every point coincides with its neighbour, i.e. the
    /// wire has no extent left to collapse into.
    #[must_use]
    pub fn is_zero_length(&self, tol: f64) -> bool {
        self.line_segments().iter().all(|s| s.is_degenerate(tol))
    }

    /// Splits the wire at `index`: `self` keeps `0..=index`, the returned
    /// wire holds `index..`. Both share the point at `index`.
    pub(crate) fn split_off(&mut self, index: usize) -> Result<Wire> {
        if index == 0 || index + 1 >= self.points.len() {
            return Err(TopologyError::InvalidArgument(format!(
                "cannot split a wire of {} points at endpoint index {index}",
                self.points.len()
            ))
            .into());
        }
        let mut tail = self.points.split_off(index);
        let seam = tail[0];
        self.points.push(seam);
        for p in &mut tail {
            p.set_is_junction(false);
        }
        Ok(Wire::from_points(tail))
    }

    /// Appends another wire's points, dropping the shared seam point.
    pub(crate) fn absorb(&mut self, other: &Wire) {
        self.points.extend(other.points.iter().skip(1).copied());
    }

    pub(crate) fn set_connected(&mut self, connected: Vec<WireId>) {
        self.connected = connected;
    }

    pub(crate) fn disconnect(&mut self, id: WireId) {
        self.connected.retain(|&c| c != id);
    }

    pub(crate) fn set_junction_flags(&mut self, flags: &[bool]) {
        for (p, &flag) in self.points.iter_mut().zip(flags) {
            p.set_is_junction(flag);
        }
    }

    pub(crate) fn clear_junctions(&mut self) {
        for p in &mut self.points {
            p.set_is_junction(false);
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.points.len() {
            Ok(())
        } else {
            Err(TopologyError::PointIndexOutOfRange {
                index,
                len: self.points.len(),
            }
            .into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{positions, wire};
    use approx::assert_abs_diff_eq;

    #[test]
    fn segment_count_matches_point_count() {
        assert!(Wire::new().line_segments().is_empty());
        assert!(wire(&[(1.0, 1.0)]).line_segments().is_empty());
        for n in 2..6 {
            let pts: Vec<(f64, f64)> = (0..n).map(|i| (f64::from(i), 0.0)).collect();
            let w = wire(&pts);
            let segments = w.line_segments();
            assert_eq!(segments.len(), w.points_count() - 1);
            for (i, s) in segments.iter().enumerate() {
                assert_eq!(s.p1(), w.points()[i].position());
                assert_eq!(s.p2(), w.points()[i + 1].position());
            }
        }
    }

    #[test]
    fn junctions_follow_flags() {
        let mut w = wire(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
        assert!(w.junctions().is_empty());
        w.set_point_is_junction(1, true).unwrap();
        w.set_point_is_junction(3, true).unwrap();
        assert_eq!(w.junctions(), vec![1, 3]);
        w.set_point_is_junction(1, false).unwrap();
        w.set_point_is_junction(3, true).unwrap();
        assert_eq!(w.junctions(), vec![3]);
    }

    #[test]
    fn move_point_out_of_range_fails() {
        let mut w = wire(&[(0.0, 0.0), (1.0, 0.0)]);
        let err = w.move_point_to(2, Point2::new(5.0, 5.0));
        assert!(err.is_err());
        assert_eq!(positions(&w), vec![(0.0, 0.0), (1.0, 0.0)]);
    }

    #[test]
    fn prepend_and_append_extend_the_ends() {
        let mut w = Wire::from_segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        w.prepend_point(Point2::new(-1.0, 0.0));
        w.append_point(Point2::new(2.0, 0.0));
        assert_eq!(
            positions(&w),
            vec![(-1.0, 0.0), (0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]
        );
        assert_eq!(w.first_point(), Some(Point2::new(-1.0, 0.0)));
        assert_eq!(w.last_point(), Some(Point2::new(2.0, 0.0)));
    }

    #[test]
    fn duplicates_collapse() {
        let mut w = wire(&[(0.0, 0.0), (5.0, 0.0), (5.0, 0.0)]);
        assert_eq!(w.remove_duplicate_points(1e-6), 1);
        assert_eq!(positions(&w), vec![(0.0, 0.0), (5.0, 0.0)]);
    }

    #[test]
    fn duplicates_never_drop_below_two_points() {
        let mut w = wire(&[(1.0, 1.0), (1.0, 1.0)]);
        assert_eq!(w.remove_duplicate_points(1e-6), 0);
        assert_eq!(w.points_count(), 2);
    }

    #[test]
    fn zero_length_needs_every_segment_degenerate() {
        assert!(wire(&[(3.0, 3.0), (3.0, 3.0)]).is_zero_length(1e-6));
        assert!(wire(&[(3.0, 3.0), (3.0, 3.0 + 1e-9), (3.0, 3.0)]).is_zero_length(1e-6));
        assert!(!wire(&[(3.0, 3.0), (3.0, 3.0), (4.0, 3.0)]).is_zero_length(1e-6));
    }

    #[test]
    fn collapsed_point_keeps_junction_marker() {
        let mut w = wire(&[(0.0, 0.0), (5.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        w.set_point_is_junction(2, true).unwrap();
        w.remove_duplicate_points(1e-6);
        assert_eq!(positions(&w), vec![(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        assert_eq!(w.junctions(), vec![1]);
    }

    #[test]
    fn split_off_shares_seam() {
        let mut w = wire(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        let tail = w.split_off(1).unwrap();
        assert_eq!(positions(&w), vec![(0.0, 0.0), (5.0, 0.0)]);
        assert_eq!(positions(&tail), vec![(5.0, 0.0), (5.0, 5.0)]);
        assert!(w.split_off(0).is_err());
    }

    #[test]
    fn translate_moves_every_point() {
        let mut w = wire(&[(0.0, 0.0), (5.0, 0.0)]);
        w.translate(Vector2::new(1.0, 2.0));
        assert_abs_diff_eq!(w.points()[0].position(), Point2::new(1.0, 2.0));
        assert_abs_diff_eq!(w.points()[1].position(), Point2::new(6.0, 2.0));
    }

    #[test]
    fn point_on_wire() {
        let w = wire(&[(0.0, 0.0), (5.0, 0.0), (5.0, 5.0)]);
        assert!(w.is_point_on_wire(&Point2::new(5.0, 2.0), 1e-6));
        assert!(!w.is_point_on_wire(&Point2::new(2.0, 2.0), 1e-6));
    }
}
