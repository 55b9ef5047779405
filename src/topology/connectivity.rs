use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::{Segment, WirePoint};
use crate::math::distance_2d::points_coincide;
use crate::math::Point2;

use super::wire::{Wire, WireId};
use super::{has_endpoint_at, EditContext, NetworkEvent, WireManager};

/// A junction point together with the host segment it is anchored on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// The wire owning the junction point.
    pub wire: WireId,
    /// Index of the junction point within `wire`.
    pub point: usize,
    /// The wire whose segment carries the point.
    pub host: WireId,
    /// Index of the carrying segment within `host`.
    pub segment: usize,
    /// Parametric position of the point along the segment.
    pub t: f64,
    /// Perpendicular distance between the point and the segment.
    pub distance: f64,
}

/// Junction flags and connections derived purely from geometry.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Connectivity {
    pub(crate) flags: Vec<(WireId, Vec<bool>)>,
    pub(crate) connected: Vec<(WireId, Vec<WireId>)>,
}

impl WireManager {
    /// Restores the network invariants after an edit.
    ///
    /// Coincident consecutive points are collapsed first, then endpoints the
    /// edit brought together are merged, crossings are turned into
    /// junctions and finally flags and connections are rederived.
    pub(crate) fn refresh(&mut self, ctx: &mut EditContext) {
        self.collapse_duplicates(ctx);
        if self.settings.auto_merge() {
            self.merge_touching_endpoints(ctx);
        } else {
            ctx.merge_candidates.clear();
        }
        if self.settings.connect_crossings() {
            self.insert_crossing_junctions(ctx);
        }
        self.apply_connectivity(ctx);
    }

    /// Returns one anchor per junction point, in wire insertion order.
    ///
    /// When a point lies on several segments, the nearest one wins; ties go
    /// to the earlier inserted host, then to the lower segment index.
    #[must_use]
    pub fn anchors(&self) -> Vec<Anchor> {
        let tol = self.settings.tolerance();
        let table = self.segment_table();
        let mut anchors = Vec::new();
        for (id, wire) in self.wires() {
            for (index, wp) in wire.points().iter().enumerate() {
                if let Some(first) = host_hits(&table, id, index, &wp.position(), tol).first() {
                    anchors.push(*first);
                }
            }
        }
        anchors
    }

    /// Derives junction flags and connected-wire lists from geometry.
    pub(crate) fn compute_connectivity(&self) -> Connectivity {
        let tol = self.settings.tolerance();
        let table = self.segment_table();
        let position_of = |id: WireId| table.iter().position(|(t, _)| *t == id);

        let mut flags = Vec::with_capacity(table.len());
        let mut links: BTreeSet<(usize, usize)> = BTreeSet::new();

        for (xi, &(id, _)) in table.iter().enumerate() {
            let Some(wire) = self.wires.get(id) else {
                continue;
            };
            let mut wire_flags = Vec::with_capacity(wire.points_count());
            for (index, wp) in wire.points().iter().enumerate() {
                let hits = host_hits(&table, id, index, &wp.position(), tol);
                wire_flags.push(!hits.is_empty());
                for hit in hits {
                    if let Some(hi) = position_of(hit.host) {
                        links.insert((xi.min(hi), xi.max(hi)));
                    }
                }
            }
            flags.push((id, wire_flags));
        }

        let connected = table
            .iter()
            .enumerate()
            .map(|(xi, &(id, _))| {
                let partners = links
                    .iter()
                    .filter_map(|&(a, b)| match (a == xi, b == xi) {
                        (true, _) => Some(b),
                        (_, true) => Some(a),
                        _ => None,
                    })
                    .collect::<BTreeSet<usize>>()
                    .into_iter()
                    .map(|i| table[i].0)
                    .collect();
                (id, partners)
            })
            .collect();

        Connectivity { flags, connected }
    }

    /// Merges `a` and `b`, which must share an endpoint at `at`.
    ///
    /// The earlier inserted wire survives and absorbs the other one. A seam
    /// point that ends up in the middle of a straight run is dropped unless
    /// another wire touches it.
    pub(crate) fn merge_pair(
        &mut self,
        ctx: &mut EditContext,
        a: WireId,
        b: WireId,
        at: &Point2,
    ) -> Result<WireId> {
        let tol = self.settings.tolerance();
        if a == b {
            return Err(
                TopologyError::InvalidArgument("cannot merge a wire with itself".into()).into(),
            );
        }
        let (survivor, absorbed) = if self.order_index(a) <= self.order_index(b) {
            (a, b)
        } else {
            (b, a)
        };

        let survivor_ends_at = ends_at(self.wire(survivor)?, at, tol);
        let absorbed_starts_at = starts_at(self.wire(absorbed)?, at, tol);
        let survivor_touches = survivor_ends_at || starts_at(self.wire(survivor)?, at, tol);
        let absorbed_touches = absorbed_starts_at || ends_at(self.wire(absorbed)?, at, tol);
        if !survivor_touches || !absorbed_touches {
            return Err(TopologyError::InvalidArgument(
                "wires do not share an endpoint at the merge location".into(),
            )
            .into());
        }

        self.touch(ctx, survivor);
        self.touch(ctx, absorbed);
        let mut tail = self.release(absorbed)?;
        if !absorbed_starts_at {
            tail.reverse();
        }
        let seam_shared = self
            .wires()
            .any(|(id, w)| id != survivor && w.is_point_on_wire(at, tol));
        let wire = self.wire_mut(survivor)?;
        if !survivor_ends_at {
            wire.reverse();
        }
        let seam = wire.points_count() - 1;
        wire.absorb(&tail);
        if !seam_shared {
            drop_straight_seam(wire, seam, tol);
        }

        debug!(?survivor, ?absorbed, "wires merged");
        ctx.merges.push((survivor, absorbed));
        ctx.push_event(NetworkEvent::Merged { survivor, absorbed });
        Ok(survivor)
    }

    pub(super) fn segment_table(&self) -> Vec<(WireId, Vec<Segment>)> {
        self.wires()
            .map(|(id, wire)| (id, wire.line_segments()))
            .collect()
    }

    fn collapse_duplicates(&mut self, ctx: &mut EditContext) {
        let tol = self.settings.tolerance();
        for id in self.order.clone() {
            let needed = self
                .wires
                .get(id)
                .is_some_and(|w| has_coincident_neighbours(w, tol));
            if !needed {
                continue;
            }
            self.touch(ctx, id);
            if let Some(wire) = self.wires.get_mut(id) {
                let removed = wire.remove_duplicate_points(tol);
                debug!(?id, removed, "collapsed coincident points");
            }
        }
    }

    fn merge_touching_endpoints(&mut self, ctx: &mut EditContext) {
        for (candidate, at) in std::mem::take(&mut ctx.merge_candidates) {
            let id = ctx.resolve(candidate);
            let Some(partner) = self.merge_partner(ctx, id, &at) else {
                continue;
            };
            if let Err(err) = self.merge_pair(ctx, id, partner, &at) {
                debug!(%err, ?id, ?partner, "merge skipped");
            }
        }
    }

    /// Finds the single other wire whose endpoint meets `id`'s endpoint at
    /// `at`, provided nothing else touches that location and the contact was
    /// made by the edit rather than carried along by it.
    fn merge_partner(&self, ctx: &EditContext, id: WireId, at: &Point2) -> Option<WireId> {
        let tol = self.settings.tolerance();
        let wire = self.wires.get(id)?;
        if !has_endpoint_at(wire, at, tol) || is_closed_at(wire, at, tol) {
            return None;
        }

        let mut partner = None;
        for (other_id, other) in self.wires() {
            if other_id == id || !other.is_point_on_wire(at, tol) {
                continue;
            }
            if partner.is_some()
                || !has_endpoint_at(other, at, tol)
                || is_closed_at(other, at, tol)
            {
                return None;
            }
            partner = Some(other_id);
        }

        let partner = partner?;
        let carried = ctx
            .carried
            .iter()
            .any(|(w, p)| *w == partner && points_coincide(p, at, tol));
        (!carried).then_some(partner)
    }

    fn insert_crossing_junctions(&mut self, ctx: &mut EditContext) {
        let tol = self.settings.tolerance();
        let order = self.order.clone();
        for (ai, &a) in order.iter().enumerate() {
            for &b in &order[ai + 1..] {
                let mut last: Option<Point2> = None;
                while let Some((segment, at)) = self.find_crossing(a, b, tol) {
                    if last.is_some_and(|l| points_coincide(&l, &at, tol)) {
                        break;
                    }
                    self.touch(ctx, a);
                    let Some(wire) = self.wires.get_mut(a) else {
                        break;
                    };
                    if wire.insert_point(segment + 1, at).is_err() {
                        break;
                    }
                    debug!(wire = ?a, other = ?b, x = at.x, y = at.y, "crossing junction inserted");
                    last = Some(at);
                }
            }
        }
    }

    /// Returns the first proper crossing between segment interiors of `a`
    /// and `b`, as `(segment index in a, crossing point)`.
    fn find_crossing(&self, a: WireId, b: WireId, tol: f64) -> Option<(usize, Point2)> {
        let sa = self.wires.get(a)?.line_segments();
        let sb = self.wires.get(b)?.line_segments();
        for (i, s) in sa.iter().enumerate() {
            if s.is_degenerate(tol) {
                continue;
            }
            for t in sb.iter().filter(|t| !t.is_degenerate(tol)) {
                if let Some((p, _, _)) = s.intersection(t) {
                    if !s.has_endpoint(&p, tol) && !t.has_endpoint(&p, tol) {
                        return Some((i, p));
                    }
                }
            }
        }
        None
    }

    fn apply_connectivity(&mut self, ctx: &mut EditContext) {
        let Connectivity { flags, connected } = self.compute_connectivity();

        for (id, wire_flags) in flags {
            let Some(wire) = self.wires.get(id) else {
                continue;
            };
            let current: Vec<bool> = wire.points().iter().map(WirePoint::is_junction).collect();
            if current == wire_flags {
                continue;
            }
            self.touch(ctx, id);
            if let Some(wire) = self.wires.get_mut(id) {
                wire.set_junction_flags(&wire_flags);
            }
        }

        for (id, partners) in connected {
            let Some(wire) = self.wires.get_mut(id) else {
                continue;
            };
            if wire.connected_wires() != partners.as_slice() {
                wire.set_connected(partners);
                ctx.push_event(NetworkEvent::ConnectivityChanged(id));
            }
        }
    }
}

/// Collects every segment of another wire that carries `p`, nearest first.
/// The sort is stable, so insertion order and segment index break ties.
pub(super) fn host_hits(
    table: &[(WireId, Vec<Segment>)],
    wire: WireId,
    point: usize,
    p: &Point2,
    tol: f64,
) -> Vec<Anchor> {
    let mut hits: Vec<Anchor> = table
        .iter()
        .filter(|(host, _)| *host != wire)
        .flat_map(|(host, segments)| {
            segments.iter().enumerate().filter_map(move |(segment, s)| {
                s.project(p, tol)
                    .filter(|&(_, distance)| distance <= tol)
                    .map(|(t, distance)| Anchor {
                        wire,
                        point,
                        host: *host,
                        segment,
                        t,
                        distance,
                    })
            })
        })
        .collect();
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

fn has_coincident_neighbours(wire: &Wire, tol: f64) -> bool {
    wire.points_count() > 2
        && wire
            .points()
            .windows(2)
            .any(|w| points_coincide(&w[0].position(), &w[1].position(), tol))
}

fn starts_at(wire: &Wire, at: &Point2, tol: f64) -> bool {
    wire.first_point().is_some_and(|p| points_coincide(&p, at, tol))
}

fn ends_at(wire: &Wire, at: &Point2, tol: f64) -> bool {
    wire.last_point().is_some_and(|p| points_coincide(&p, at, tol))
}

fn is_closed_at(wire: &Wire, at: &Point2, tol: f64) -> bool {
    starts_at(wire, at, tol) && ends_at(wire, at, tol)
}

fn drop_straight_seam(wire: &mut Wire, seam: usize, tol: f64) {
    if seam == 0 || seam + 1 >= wire.points_count() {
        return;
    }
    let points = wire.points();
    let run = Segment::new(points[seam - 1].position(), points[seam + 1].position());
    if run.contains_point(&points[seam].position(), tol) {
        let _ = wire.remove_point(seam);
    }
}
