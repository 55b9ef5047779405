use crate::error::{Result, TopologyError};
use crate::topology::{has_endpoint_at, WireId, WireManager};

/// Joins two wires that share an endpoint into one.
///
/// The earlier inserted wire survives; the other one is removed once its
/// points have been absorbed. Unlike automatic merging this also joins
/// wires whose seam is touched by a third wire.
pub struct MergeWires {
    a: WireId,
    b: WireId,
}

impl MergeWires {
    /// Creates a new `MergeWires` operation.
    #[must_use]
    pub fn new(a: WireId, b: WireId) -> Self {
        Self { a, b }
    }

    /// Executes the merge, returning the surviving wire.
    ///
    /// # Errors
    ///
    /// Returns an error if either wire is not found, both ids are the same
    /// or the wires do not share an endpoint.
    pub fn execute(&self, manager: &mut WireManager) -> Result<WireId> {
        let tol = manager.settings().tolerance();
        let a = manager.wire(self.a)?;
        let b = manager.wire(self.b)?;
        let at = a
            .first_point()
            .into_iter()
            .chain(a.last_point())
            .find(|p| has_endpoint_at(b, p, tol))
            .ok_or_else(|| {
                TopologyError::InvalidArgument("wires do not share an endpoint".into())
            })?;
        let (a, b) = (self.a, self.b);

        manager.transaction(|mgr, ctx| {
            let survivor = mgr.merge_pair(ctx, a, b, &at)?;
            mgr.refresh(ctx);
            Ok(survivor)
        })
    }
}
