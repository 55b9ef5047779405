use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::topology::{NetworkEvent, WireId, WireManager};

/// Splits a wire in two at one of its bend points.
///
/// The original wire keeps the points up to and including the bend; a new
/// wire starts there and carries the rest. Both ends stay connected at the
/// seam and are not merged back automatically.
pub struct SplitWire {
    wire: WireId,
    index: usize,
}

impl SplitWire {
    /// Creates a new `SplitWire` operation.
    #[must_use]
    pub fn new(wire: WireId, index: usize) -> Self {
        Self { wire, index }
    }

    /// Executes the split, returning the id of the new wire.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found or `index` is not a bend
    /// point.
    pub fn execute(&self, manager: &mut WireManager) -> Result<WireId> {
        let len = manager.wire(self.wire)?.points_count();
        if self.index == 0 || self.index + 1 >= len {
            return Err(TopologyError::InvalidArgument(format!(
                "split index {} is not a bend point of a wire with {len} points",
                self.index
            ))
            .into());
        }
        let (original, index) = (self.wire, self.index);

        manager.transaction(|mgr, ctx| {
            mgr.touch(ctx, original);
            let tail = mgr.wire_mut(original)?.split_off(index)?;
            let created = mgr.insert_raw(tail);
            debug!(?original, ?created, index, "wire split");
            ctx.push_event(NetworkEvent::Added(created));
            ctx.push_event(NetworkEvent::Split { original, created });
            mgr.refresh(ctx);
            Ok(created)
        })
    }
}
