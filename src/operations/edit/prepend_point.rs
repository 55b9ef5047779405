use crate::error::Result;
use crate::math::Point2;
use crate::topology::{WireEdit, WireId, WireManager};

/// Extends a wire backwards with a new first point.
pub struct PrependPoint {
    wire: WireId,
    point: Point2,
}

impl PrependPoint {
    /// Creates a new `PrependPoint` operation.
    #[must_use]
    pub fn new(wire: WireId, point: Point2) -> Self {
        Self { wire, point }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found.
    pub fn execute(&self, manager: &mut WireManager) -> Result<()> {
        let point = self.point;
        manager.edit(self.wire, |wire| {
            wire.prepend_point(point);
            Ok(WireEdit {
                new_endpoints: vec![point],
                ..WireEdit::default()
            })
        })
    }
}
