use crate::math::Vector2;

use super::wire::{Wire, WireId};

/// Notification emitted once an edit has been committed.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    /// A wire was added to the network.
    Added(WireId),
    /// A wire was removed; no remaining wire refers to it.
    Removed(WireId),
    /// A point moved, either by the edit itself or by junction propagation.
    PointMoved {
        wire: WireId,
        index: usize,
        delta: Vector2,
    },
    /// `absorbed` was merged into `survivor` and no longer exists.
    Merged { survivor: WireId, absorbed: WireId },
    /// `created` was split off the end of `original`.
    Split { original: WireId, created: WireId },
    /// The wire's connected-wire list changed.
    ConnectivityChanged(WireId),
}

/// Observer of structural edits, registered with
/// [`WireManager::add_observer`](super::WireManager::add_observer).
///
/// All methods are invoked synchronously. `about_to_change` receives a wire
/// before its first mutation within an edit, `has_changed` receives it once
/// the network is consistent again, and `on_event` follows for every event
/// the edit produced. Wires touched by propagation are reported like the
/// edited wire. When an edit fails, `has_changed` still follows with the
/// restored wire and no events are delivered.
pub trait WireObserver {
    fn about_to_change(&mut self, _id: WireId, _wire: &Wire) {}

    fn has_changed(&mut self, _id: WireId, _wire: &Wire) {}

    fn on_event(&mut self, _event: &NetworkEvent) {}
}
