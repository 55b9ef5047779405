use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

use tracing::trace;

use crate::error::{Result, TopologyError};
use crate::geometry::Segment;
use crate::math::distance_2d::points_coincide;
use crate::math::{Point2, Vector2, TOLERANCE};

use super::connectivity::host_hits;
use super::wire::WireId;
use super::{EditContext, NetworkEvent, WireManager};

/// Segment replacements produced by an edit: `(old, new)`.
pub(crate) type Remaps = Vec<(Segment, Segment)>;

/// Outcome of a single-wire mutation, consumed by the edit pipeline.
#[derive(Debug, Default)]
pub(crate) struct WireEdit {
    /// Old and new geometry of every segment the mutation replaced.
    pub(crate) remaps: Remaps,
    /// Points moved by the mutation, with their displacement.
    pub(crate) moved: Vec<(usize, Vector2)>,
    /// Endpoints created or moved by the mutation.
    pub(crate) new_endpoints: Vec<Point2>,
}

/// Pairs up segments that differ between two equally long segment lists.
pub(crate) fn diff_segments(before: &[Segment], after: &[Segment]) -> Remaps {
    before
        .iter()
        .zip(after)
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (*a, *b))
        .collect()
}

impl WireManager {
    /// Replaces `old`, a segment of `host`, with `new` and re-homes the
    /// junctions anchored on it.
    ///
    /// A junction keeps its parametric position: one at the middle of `old`
    /// ends up at the middle of `new`. Wires moved this way carry their own
    /// anchored junctions along, and connectivity is recomputed afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` is not found, has no segment matching
    /// `old` or a connection is dangling; the network is left unchanged in
    /// that case.
    pub fn move_junctions_to_new_segment(
        &mut self,
        host: WireId,
        old: &Segment,
        new: &Segment,
    ) -> Result<()> {
        let tol = self.settings.tolerance();
        let segment = self
            .wire(host)?
            .line_segments()
            .iter()
            .position(|s| {
                points_coincide(&s.p1(), &old.p1(), tol)
                    && points_coincide(&s.p2(), &old.p2(), tol)
            })
            .ok_or_else(|| {
                TopologyError::InvalidArgument("segment is not part of the host wire".into())
            })?;
        self.replace_segment(host, segment, *new)
    }

    /// Moves both endpoints of segment `segment` of `id` onto `to`.
    pub(crate) fn replace_segment(
        &mut self,
        id: WireId,
        segment: usize,
        to: Segment,
    ) -> Result<()> {
        let len = self.wire(id)?.points_count();
        if segment + 1 >= len {
            return Err(TopologyError::PointIndexOutOfRange {
                index: segment + 1,
                len,
            }
            .into());
        }
        let i = segment;

        self.edit(id, |wire| {
            let before = wire.line_segments();
            let (from1, from2) = (wire.point(i)?.position(), wire.point(i + 1)?.position());
            wire.move_point_to(i, to.p1())?;
            wire.move_point_to(i + 1, to.p2())?;

            let mut new_endpoints = Vec::new();
            if i == 0 {
                new_endpoints.push(to.p1());
            }
            if i + 2 == len {
                new_endpoints.push(to.p2());
            }
            Ok(WireEdit {
                remaps: diff_segments(&before, &wire.line_segments()),
                moved: vec![(i, to.p1() - from1), (i + 1, to.p2() - from2)],
                new_endpoints,
            })
        })
    }

    /// Cascades segment replacements of `origin` through the network,
    /// breadth-first.
    ///
    /// `origin` itself is never moved, and every other point moves at most
    /// once, which bounds the cascade by the number of points.
    pub(crate) fn propagate(
        &mut self,
        ctx: &mut EditContext,
        origin: WireId,
        remaps: &[(Segment, Segment)],
    ) -> Result<()> {
        if remaps.is_empty() {
            return Ok(());
        }
        let mut moved: HashSet<(WireId, usize)> = HashSet::new();
        let mut queue = VecDeque::from([(origin, remaps.to_vec())]);
        while let Some((host, host_remaps)) = queue.pop_front() {
            let followers = self.rehome_junctions(ctx, origin, host, &host_remaps, &mut moved)?;
            queue.extend(followers.into_iter().filter(|(_, r)| !r.is_empty()));
        }
        Ok(())
    }

    fn rehome_junctions(
        &mut self,
        ctx: &mut EditContext,
        origin: WireId,
        host: WireId,
        remaps: &[(Segment, Segment)],
        moved: &mut HashSet<(WireId, usize)>,
    ) -> Result<Vec<(WireId, Remaps)>> {
        let tol = self.settings.tolerance();
        let connected = self.wire(host)?.connected_wires().to_vec();
        let rivals: Vec<(WireId, Vec<Segment>)> = self
            .segment_table()
            .into_iter()
            .filter(|(other, _)| *other != host)
            .collect();
        let host_rank = self.order_index(host);
        let mut followers = Vec::new();

        for id in connected {
            if id == origin {
                continue;
            }
            let wire = self
                .wires
                .get(id)
                .ok_or(TopologyError::DanglingConnection)?;
            let targets: Vec<(usize, Point2)> = wire
                .points()
                .iter()
                .enumerate()
                .filter(|(index, wp)| wp.is_junction() && !moved.contains(&(id, *index)))
                .filter_map(|(index, wp)| {
                    let from = wp.position();
                    let (new, t, distance) = remaps
                        .iter()
                        .filter_map(|(old, new)| {
                            old.project(&from, tol)
                                .filter(|&(_, d)| d <= tol)
                                .map(|(t, d)| (new, t, d))
                        })
                        .min_by(|a, b| a.2.total_cmp(&b.2))?;
                    // Only the host that wins the anchor tie-break carries the point.
                    let anchored_here = match host_hits(&rivals, id, index, &from, tol).first() {
                        None => true,
                        Some(rival) => match distance.total_cmp(&rival.distance) {
                            Ordering::Less => true,
                            Ordering::Equal => host_rank < self.order_index(rival.host),
                            Ordering::Greater => false,
                        },
                    };
                    let to = new.point_at(t);
                    (anchored_here && (to - from).norm_squared() > TOLERANCE * TOLERANCE)
                        .then_some((index, to))
                })
                .collect();
            if targets.is_empty() {
                continue;
            }

            self.touch(ctx, id);
            let wire = self.wire_mut(id)?;
            let last = wire.points_count() - 1;
            let before = wire.line_segments();
            let mut deltas = Vec::with_capacity(targets.len());
            for (index, to) in targets {
                let from = wire.point(index)?.position();
                wire.move_point_to(index, to)?;
                moved.insert((id, index));
                deltas.push((index, to, to - from));
            }
            let follower_remaps = diff_segments(&before, &wire.line_segments());

            for (index, to, delta) in deltas {
                trace!(wire = ?id, index, dx = delta.x, dy = delta.y, "junction carried");
                ctx.push_event(NetworkEvent::PointMoved {
                    wire: id,
                    index,
                    delta,
                });
                if index == 0 || index == last {
                    ctx.carried.push((id, to));
                }
            }
            followers.push((id, follower_remaps));
        }
        Ok(followers)
    }
}
