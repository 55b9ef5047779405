use crate::error::Result;
use crate::math::Point2;
use crate::topology::{WireEdit, WireId, WireManager};

/// Extends a wire with a new last point.
pub struct AppendPoint {
    wire: WireId,
    point: Point2,
}

impl AppendPoint {
    /// Creates a new `AppendPoint` operation.
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
            wire.append_point(point);
            Ok(WireEdit {
                new_endpoints: vec![point],
                ..WireEdit::default()
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{positions, wire};

    #[test]
    fn append_onto_endpoint_merges() {
        let mut mgr = WireManager::new();
        let a = mgr.add_wire(wire(&[(0.0, 0.0), (5.0, 0.0)])).unwrap();
        let b = mgr.add_wire(wire(&[(10.0, 5.0), (10.0, 0.0)])).unwrap();
        AppendPoint::new(a, Point2::new(10.0, 0.0))
            .execute(&mut mgr)
            .unwrap();

        assert_eq!(mgr.len(), 1);
        assert!(!mgr.contains(b));
        assert_eq!(
            positions(mgr.wire(a).unwrap()),
            vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (10.0, 5.0)]
        );
    }
}
