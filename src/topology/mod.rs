mod connectivity;
mod observer;
mod propagate;
mod settings;
mod wire;

pub use connectivity::Anchor;
pub use observer::{NetworkEvent, WireObserver};
pub use settings::{ConnectivitySettings, DEFAULT_TOLERANCE};
pub use wire::{Wire, WireId};

pub(crate) use propagate::{diff_segments, WireEdit};

use std::fmt;

use slotmap::SlotMap;
use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::math::distance_2d::points_coincide;
use crate::math::Point2;

/// Central arena that owns every wire of a schematic.
///
/// Wires refer to each other through [`WireId`]s (generational indices), so
/// removing a wire invalidates lookups instead of leaving dangling
/// references. Every structural edit runs as a transaction: it either
/// leaves the network consistent or restores the state it started from.
#[derive(Default)]
pub struct WireManager {
    wires: SlotMap<WireId, Wire>,
    /// Insertion order, used for deterministic tie-breaks.
    order: Vec<WireId>,
    settings: ConnectivitySettings,
    observers: Vec<Box<dyn WireObserver>>,
}

/// Bookkeeping for a single top-level edit.
#[derive(Debug, Default)]
pub(crate) struct EditContext {
    /// Wires that received `about_to_change`, in first-touch order.
    touched: Vec<WireId>,
    events: Vec<NetworkEvent>,
    /// Endpoints created or moved by the edit; candidates for auto-merge.
    merge_candidates: Vec<(WireId, Point2)>,
    /// Positions reached by propagated moves.
    carried: Vec<(WireId, Point2)>,
    /// `(survivor, absorbed)` pairs produced by merges.
    merges: Vec<(WireId, WireId)>,
}

impl EditContext {
    pub(crate) fn push_event(&mut self, event: NetworkEvent) {
        self.events.push(event);
    }

    pub(crate) fn add_merge_candidate(&mut self, wire: WireId, at: Point2) {
        self.merge_candidates.push((wire, at));
    }

    /// Follows merges so that an id that was absorbed resolves to its survivor.
    pub(crate) fn resolve(&self, mut id: WireId) -> WireId {
        while let Some(&(survivor, _)) = self.merges.iter().find(|(_, a)| *a == id) {
            id = survivor;
        }
        id
    }
}

impl WireManager {
    /// Creates a new, empty manager with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty manager with the given settings.
    #[must_use]
    pub fn with_settings(settings: ConnectivitySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ConnectivitySettings {
        &self.settings
    }

    /// Registers an observer for change notifications.
    pub fn add_observer(&mut self, observer: Box<dyn WireObserver>) {
        self.observers.push(observer);
    }

    // --- Queries ---

    /// Returns a reference to the wire, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not owned by this manager.
    pub fn wire(&self, id: WireId) -> Result<&Wire> {
        Ok(self.wires.get(id).ok_or(TopologyError::WireNotFound)?)
    }

    #[must_use]
    pub fn contains(&self, id: WireId) -> bool {
        self.wires.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Returns all wire ids in insertion order.
    #[must_use]
    pub fn wire_ids(&self) -> &[WireId] {
        &self.order
    }

    /// Iterates over all wires in insertion order.
    pub fn wires(&self) -> impl Iterator<Item = (WireId, &Wire)> + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.wires.get(id).map(|w| (id, w)))
    }

    /// Returns the wires connected to `id`, each checked for liveness.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is unknown, or if one of its connections
    /// refers to a wire that no longer exists.
    pub fn connected_wires(&self, id: WireId) -> Result<Vec<WireId>> {
        let wire = self.wire(id)?;
        wire.connected_wires()
            .iter()
            .map(|&c| -> Result<WireId> {
                if self.wires.contains_key(c) {
                    Ok(c)
                } else {
                    Err(TopologyError::DanglingConnection.into())
                }
            })
            .collect()
    }

    /// Returns every wire that has a point or a segment at `p`.
    #[must_use]
    pub fn wires_at(&self, p: &Point2) -> Vec<WireId> {
        let tol = self.settings.tolerance();
        self.wires()
            .filter(|(_, w)| w.is_point_on_wire(p, tol))
            .map(|(id, _)| id)
            .collect()
    }

    /// Returns the first wire (in insertion order) with an endpoint at `p`.
    #[must_use]
    pub fn wire_with_extremity_at(&self, p: &Point2) -> Option<WireId> {
        let tol = self.settings.tolerance();
        self.wires()
            .find(|(_, w)| has_endpoint_at(w, p, tol))
            .map(|(id, _)| id)
    }

    // --- Network edits ---

    /// Adds a wire and connects it to the network.
    ///
    /// Stored junction flags and connections are ignored and recomputed.
    /// If one of the new wire's endpoints lands on the endpoint of an
    /// existing wire, the two may be merged; the returned id is the wire
    /// that holds the new geometry afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire has fewer than two points.
    pub fn add_wire(&mut self, mut wire: Wire) -> Result<WireId> {
        check_wire(&wire, self.settings.tolerance())?;
        wire.clear_junctions();
        wire.set_connected(Vec::new());
        let endpoints: Vec<Point2> = wire
            .first_point()
            .into_iter()
            .chain(wire.last_point())
            .collect();

        let id = self.insert_raw(wire);
        debug!(?id, "wire added");

        let mut ctx = EditContext::default();
        ctx.push_event(NetworkEvent::Added(id));
        for p in endpoints {
            ctx.add_merge_candidate(id, p);
        }
        self.refresh(&mut ctx);
        let holder = ctx.resolve(id);
        self.commit(ctx);
        Ok(holder)
    }

    /// Rebuilds the network from stored wires.
    ///
    /// Junction flags are not trusted: coincidence detection runs once all
    /// wires are in place. No wires are merged.
    ///
    /// # Errors
    ///
    /// Returns an error if any wire has fewer than two points; nothing is
    /// loaded in that case.
    pub fn load(&mut self, wires: impl IntoIterator<Item = Wire>) -> Result<Vec<WireId>> {
        let wires: Vec<Wire> = wires.into_iter().collect();
        let tol = self.settings.tolerance();
        for wire in &wires {
            check_wire(wire, tol)?;
        }

        let mut ctx = EditContext::default();
        let ids: Vec<WireId> = wires
            .into_iter()
            .map(|mut wire| {
                wire.clear_junctions();
                wire.set_connected(Vec::new());
                let id = self.insert_raw(wire);
                ctx.push_event(NetworkEvent::Added(id));
                id
            })
            .collect();
        debug!(count = ids.len(), "wires loaded");

        self.refresh(&mut ctx);
        self.commit(ctx);
        Ok(ids)
    }

    /// Removes a wire from the network and returns it.
    ///
    /// Every back-reference to the wire is dropped before it is released,
    /// and the junctions that were anchored on it are recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found.
    pub fn remove_wire(&mut self, id: WireId) -> Result<Wire> {
        self.transaction(|mgr, ctx| {
            mgr.wire(id)?;
            mgr.touch(ctx, id);
            let wire = mgr.release(id)?;
            ctx.push_event(NetworkEvent::Removed(id));
            mgr.refresh(ctx);
            Ok(wire)
        })
    }

    /// Removes every wire.
    pub fn clear(&mut self) {
        let mut ctx = EditContext::default();
        for id in std::mem::take(&mut self.order) {
            ctx.push_event(NetworkEvent::Removed(id));
        }
        self.wires.clear();
        self.commit(ctx);
    }

    /// Re-runs coincidence detection over the whole network.
    ///
    /// Running it again without intervening geometry changes has no effect.
    pub fn refresh_connectivity(&mut self) {
        let mut ctx = EditContext::default();
        self.refresh(&mut ctx);
        self.commit(ctx);
    }

    // --- Edit machinery ---

    /// Runs `f` as one top-level edit of `id`: the change hooks bracket the
    /// mutation, junctions anchored on the wire follow it and connectivity
    /// is recomputed.
    pub(crate) fn edit<F>(&mut self, id: WireId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Wire) -> Result<WireEdit>,
    {
        self.transaction(|mgr, ctx| {
            mgr.wire(id)?;
            mgr.touch(ctx, id);
            let wire = mgr.wires.get_mut(id).ok_or(TopologyError::WireNotFound)?;
            let edit = f(wire)?;
            for &(index, delta) in &edit.moved {
                ctx.push_event(NetworkEvent::PointMoved {
                    wire: id,
                    index,
                    delta,
                });
            }
            for &p in &edit.new_endpoints {
                ctx.add_merge_candidate(id, p);
            }
            mgr.propagate(ctx, id, &edit.remaps)?;
            mgr.refresh(ctx);
            Ok(())
        })
    }

    /// Runs `f` against the manager; on error the wire arena is restored.
    ///
    /// An edit that leaves a touched wire with zero length fails as well.
    /// Observers still get `has_changed` for every wire announced before the
    /// failure.
    pub(crate) fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self, &mut EditContext) -> Result<T>,
    {
        let wires = self.wires.clone();
        let order = self.order.clone();
        let mut ctx = EditContext::default();
        let outcome = f(self, &mut ctx).and_then(|value| {
            self.check_touched(&ctx)?;
            Ok(value)
        });
        match outcome {
            Ok(value) => {
                self.commit(ctx);
                Ok(value)
            }
            Err(err) => {
                debug!(%err, "edit rolled back");
                let edited = std::mem::replace(&mut self.wires, wires);
                self.order = order;
                for &id in &ctx.touched {
                    let Some(wire) = self.wires.get(id).or_else(|| edited.get(id)) else {
                        continue;
                    };
                    for observer in &mut self.observers {
                        observer.has_changed(id, wire);
                    }
                }
                Err(err)
            }
        }
    }

    fn check_touched(&self, ctx: &EditContext) -> Result<()> {
        let tol = self.settings.tolerance();
        for &id in &ctx.touched {
            if self.wires.get(id).is_some_and(|w| w.is_zero_length(tol)) {
                return Err(TopologyError::InvalidArgument(format!(
                    "edit would leave wire {id:?} with zero length"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Announces the upcoming mutation of `id` once per edit.
    pub(crate) fn touch(&mut self, ctx: &mut EditContext, id: WireId) {
        if ctx.touched.contains(&id) {
            return;
        }
        let Some(wire) = self.wires.get(id) else {
            return;
        };
        ctx.touched.push(id);
        for observer in &mut self.observers {
            observer.about_to_change(id, wire);
        }
    }

    pub(crate) fn wire_mut(&mut self, id: WireId) -> Result<&mut Wire> {
        Ok(self.wires.get_mut(id).ok_or(TopologyError::WireNotFound)?)
    }

    /// Inserts a wire produced by an edit (e.g. a split) without refreshing.
    pub(crate) fn insert_raw(&mut self, wire: Wire) -> WireId {
        let id = self.wires.insert(wire);
        self.order.push(id);
        id
    }

    /// Drops every back-reference to `id`, then releases the wire.
    pub(crate) fn release(&mut self, id: WireId) -> Result<Wire> {
        for other in self.wires.values_mut() {
            other.disconnect(id);
        }
        self.order.retain(|&o| o != id);
        let mut wire = self.wires.remove(id).ok_or(TopologyError::WireNotFound)?;
        wire.set_connected(Vec::new());
        wire.clear_junctions();
        debug!(?id, "wire released");
        Ok(wire)
    }

    pub(crate) fn order_index(&self, id: WireId) -> usize {
        self.order.iter().position(|&o| o == id).unwrap_or(usize::MAX)
    }

    fn commit(&mut self, ctx: EditContext) {
        for &id in &ctx.touched {
            if let Some(wire) = self.wires.get(id) {
                for observer in &mut self.observers {
                    observer.has_changed(id, wire);
                }
            }
        }
        for event in &ctx.events {
            for observer in &mut self.observers {
                observer.on_event(event);
            }
        }
    }
}

impl fmt::Debug for WireManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireManager")
            .field("wires", &self.wires)
            .field("order", &self.order)
            .field("settings", &self.settings)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn check_wire(wire: &Wire, tol: f64) -> Result<()> {
    if wire.points_count() < 2 {
        return Err(TopologyError::InvalidArgument(format!(
            "a wire needs at least two points, got {}",
            wire.points_count()
        ))
        .into());
    }
    if wire.is_zero_length(tol) {
        return Err(TopologyError::InvalidArgument("a wire cannot have zero length".into()).into());
    }
    Ok(())
}

pub(crate) fn has_endpoint_at(wire: &Wire, p: &Point2, tol: f64) -> bool {
    wire.first_point()
        .into_iter()
        .chain(wire.last_point())
        .any(|e| points_coincide(&e, p, tol))
}
