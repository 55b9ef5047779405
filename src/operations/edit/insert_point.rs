use crate::error::{Result, TopologyError};
use crate::geometry::Segment;
use crate::math::Point2;
use crate::topology::{WireEdit, WireId, WireManager};

/// Inserts a point into a wire so that it ends up at `index`.
///
/// Inserting between two points splits their segment at the projection of
/// the new point; junctions on either part are carried to the matching new
/// segment at the same relative position.
pub struct InsertPoint {
    wire: WireId,
    index: usize,
    point: Point2,
}

impl InsertPoint {
    /// Creates a new `InsertPoint` operation.
    #[must_use]
    pub fn new(wire: WireId, index: usize, point: Point2) -> Self {
        Self { wire, index, point }
    }

    /// Executes the insertion.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found or `index` exceeds the
    /// number of points.
    pub fn execute(&self, manager: &mut WireManager) -> Result<()> {
        let len = manager.wire(self.wire)?.points_count();
        if self.index > len {
            return Err(TopologyError::PointIndexOutOfRange {
                index: self.index,
                len,
            }
            .into());
        }
        let tol = manager.settings().tolerance();
        let (index, point) = (self.index, self.point);

        manager.edit(self.wire, |wire| {
            let mut remaps = Vec::new();
            if index > 0 && index < len {
                let a = wire.point(index - 1)?.position();
                let b = wire.point(index)?.position();
                let old = Segment::new(a, b);
                if let Some((t, _)) = old.project(&point, tol) {
                    let q = old.point_at(t);
                    remaps.push((Segment::new(a, q), Segment::new(a, point)));
                    remaps.push((Segment::new(q, b), Segment::new(point, b)));
                }
            }
            wire.insert_point(index, point)?;
            let is_endpoint = index == 0 || index == len;
            Ok(WireEdit {
                remaps,
                new_endpoints: if is_endpoint { vec![point] } else { Vec::new() },
                ..WireEdit::default()
            })
        })
    }
}
