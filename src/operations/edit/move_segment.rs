use crate::error::Result;
use crate::geometry::Segment;
use crate::topology::{WireId, WireManager};

/// Rewrites one segment of a wire by moving both of its endpoints.
///
/// Junctions anchored on the rewritten segment keep their relative
/// position; those on the two neighbouring segments follow as well.
pub struct MoveSegment {
    wire: WireId,
    segment: usize,
    to: Segment,
}

impl MoveSegment {
    /// Creates a new `MoveSegment` operation.
    #[must_use]
    pub fn new(wire: WireId, segment: usize, to: Segment) -> Self {
        Self { wire, segment, to }
    }

    /// Executes the rewrite.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found, has no segment at the
    /// given index or would be left with zero length.
    pub fn execute(&self, manager: &mut WireManager) -> Result<()> {
        manager.replace_segment(self.wire, self.segment, self.to)
    }
}
