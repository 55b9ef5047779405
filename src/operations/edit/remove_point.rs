use crate::error::{Result, TopologyError};
use crate::geometry::Segment;
use crate::topology::{WireEdit, WireId, WireManager};

/// Removes a point from a wire.
///
/// Removing a bend point joins its two segments; junctions on them are
/// spread over the joined segment in proportion to the old lengths.
pub struct RemovePoint {
    wire: WireId,
    index: usize,
}

impl RemovePoint {
    /// Creates a new `RemovePoint` operation.
    #[must_use]
    pub fn new(wire: WireId, index: usize) -> Self {
        Self { wire, index }
    }

    /// Executes the removal.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found, `index` is out of range or
    /// the wire would be left with fewer than two points.
    pub fn execute(&self, manager: &mut WireManager) -> Result<()> {
        let wire = manager.wire(self.wire)?;
        wire.point(self.index)?;
        let len = wire.points_count();
        if len <= 2 {
            return Err(TopologyError::InvalidArgument(
                "a wire needs at least two points; remove the wire instead".into(),
            )
            .into());
        }
        let tol = manager.settings().tolerance();
        let index = self.index;

        manager.edit(self.wire, |wire| {
            let mut remaps = Vec::new();
            let mut new_endpoints = Vec::new();
            if index > 0 && index + 1 < len {
                let a = wire.point(index - 1)?.position();
                let p = wire.point(index)?.position();
                let b = wire.point(index + 1)?.position();
                let (l1, l2) = ((p - a).norm(), (b - p).norm());
                if l1 + l2 > tol {
                    let q = Segment::new(a, b).point_at(l1 / (l1 + l2));
                    remaps.push((Segment::new(a, p), Segment::new(a, q)));
                    remaps.push((Segment::new(p, b), Segment::new(q, b)));
                }
            } else {
                let neighbour = if index == 0 { 1 } else { index - 1 };
                new_endpoints.push(wire.point(neighbour)?.position());
            }
            wire.remove_point(index)?;
            Ok(WireEdit {
                remaps,
                new_endpoints,
                ..WireEdit::default()
            })
        })
    }
}
