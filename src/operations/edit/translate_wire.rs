use crate::error::Result;
use crate::math::Vector2;
use crate::topology::{diff_segments, WireEdit, WireId, WireManager};

/// Moves a whole wire by a displacement.
///
/// Junctions of other wires anchored on it travel along; the wire's own
/// junctions stay with it and detach from hosts they no longer touch.
pub struct TranslateWire {
    wire: WireId,
    delta: Vector2,
}

impl TranslateWire {
    /// Creates a new `TranslateWire` operation.
    #[must_use]
    pub fn new(wire: WireId, delta: Vector2) -> Self {
        Self { wire, delta }
    }

    /// Executes the translation.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found.
    pub fn execute(&self, manager: &mut WireManager) -> Result<()> {
        let delta = self.delta;
        manager.edit(self.wire, |wire| {
            let before = wire.line_segments();
            wire.translate(delta);
            Ok(WireEdit {
                remaps: diff_segments(&before, &wire.line_segments()),
                moved: (0..wire.points_count()).map(|i| (i, delta)).collect(),
                new_endpoints: wire.first_point().into_iter().chain(wire.last_point()).collect(),
            })
        })
    }
}
