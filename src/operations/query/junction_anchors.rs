use crate::error::Result;
use crate::topology::{Anchor, WireId, WireManager};

/// Lists where the junction points of a wire are anchored, e.g. to draw
/// junction dots or to snapshot connectivity for undo.
pub struct JunctionAnchors {
    wire: WireId,
}

impl JunctionAnchors {
    /// Creates a new `JunctionAnchors` query.
    #[must_use]
    pub fn new(wire: WireId) -> Self {
        Self { wire }
    }

    /// Executes the query, returning one anchor per junction point of the
    /// wire in point order.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found.
    pub fn execute(&self, manager: &WireManager) -> Result<Vec<Anchor>> {
        manager.wire(self.wire)?;
        Ok(manager
            .anchors()
            .into_iter()
            .filter(|a| a.wire == self.wire)
            .collect())
    }
}
