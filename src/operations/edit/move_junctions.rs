use crate::error::Result;
use crate::geometry::Segment;
use crate::topology::{WireId, WireManager};

/// Replaces a segment of a host wire, identified by its geometry, and
/// carries the junctions anchored on it to the same parametric position on
/// the new segment.
pub struct MoveJunctionsToNewSegment {
    host: WireId,
    old: Segment,
    new: Segment,
}

impl MoveJunctionsToNewSegment {
    /// Creates a new `MoveJunctionsToNewSegment` operation.
    #[must_use]
    pub fn new(host: WireId, old: Segment, new: Segment) -> Self {
        Self { host, old, new }
    }

    /// Executes the replacement.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is not found or none of its segments
    /// matches `old`.
    pub fn execute(&self, manager: &mut WireManager) -> Result<()> {
        manager.move_junctions_to_new_segment(self.host, &self.old, &self.new)
    }
}
