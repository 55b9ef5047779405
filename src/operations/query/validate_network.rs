use crate::error::{Result, TopologyError};
use crate::math::distance_2d::points_coincide;
use crate::topology::WireManager;

/// Checks the structural invariants of a wire network.
///
/// A valid network has a wire arena and insertion order that agree. Every
/// wire has at least two points, a non-zero length and no coincident
/// neighbours. Connections are symmetric and point at live wires only, and
/// junction flags and connections match a fresh derivation from geometry.
#[derive(Debug, Default)]
pub struct ValidateNetwork;

impl ValidateNetwork {
    /// Creates a new `ValidateNetwork` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn execute(&self, manager: &WireManager) -> Result<()> {
        let tol = manager.settings().tolerance();
        if manager.wire_ids().len() != manager.len() {
            return Err(invalid("insertion order and wire arena disagree"));
        }

        for &id in manager.wire_ids() {
            let wire = manager.wire(id)?;
            if wire.points_count() < 2 {
                return Err(invalid(format!("wire {id:?} has fewer than two points")));
            }
            if wire.is_zero_length(tol) {
                return Err(invalid(format!("wire {id:?} has zero length")));
            }
            let coincident = wire
                .points()
                .windows(2)
                .any(|w| points_coincide(&w[0].position(), &w[1].position(), tol));
            if coincident {
                return Err(invalid(format!("wire {id:?} has coincident consecutive points")));
            }
            for &other in wire.connected_wires() {
                let other_wire = manager
                    .wire(other)
                    .map_err(|_| TopologyError::DanglingConnection)?;
                if !other_wire.connected_wires().contains(&id) {
                    return Err(invalid(format!("connection {id:?} -> {other:?} is one-sided")));
                }
            }
        }

        let expected = manager.compute_connectivity();
        for (id, flags) in &expected.flags {
            let wire = manager.wire(*id)?;
            let actual: Vec<bool> = wire.points().iter().map(|p| p.is_junction()).collect();
            if &actual != flags {
                return Err(invalid(format!("junction flags of {id:?} are stale")));
            }
        }
        for (id, partners) in &expected.connected {
            if manager.wire(*id)?.connected_wires() != partners.as_slice() {
                return Err(invalid(format!("connections of {id:?} are stale")));
            }
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> crate::error::WireNetError {
    TopologyError::InvalidTopology(message.into()).into()
}
