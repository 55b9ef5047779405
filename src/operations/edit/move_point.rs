use crate::error::Result;
use crate::math::Point2;
use crate::topology::{diff_segments, WireEdit, WireId, WireManager};

/// Moves a single point of a wire.
///
/// Junctions of other wires anchored on the segments next to the point
/// follow it proportionally, and an endpoint dragged onto a segment or
/// endpoint of another wire connects (or merges) there.
pub struct MovePoint {
    wire: WireId,
    index: usize,
    to: Point2,
}

impl MovePoint {
    /// Creates a new `MovePoint` operation.
    #[must_use]
    pub fn new(wire: WireId, index: usize, to: Point2) -> Self {
        Self { wire, index, to }
    }

    /// Executes the move.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is not found or `index` is out of range.
    pub fn execute(&self, manager: &mut WireManager) -> Result<()> {
        manager.wire(self.wire)?.point(self.index)?;
        let (index, to) = (self.index, self.to);
        manager.edit(self.wire, |wire| {
            let before = wire.line_segments();
            let from = wire.point(index)?.position();
            wire.move_point_to(index, to)?;
            let is_endpoint = index == 0 || index + 1 == wire.points_count();
            Ok(WireEdit {
                remaps: diff_segments(&before, &wire.line_segments()),
                moved: vec![(index, to - from)],
                new_endpoints: if is_endpoint { vec![to] } else { Vec::new() },
            })
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::math::Vector2;
    use crate::test_support::{init_tracing, positions, wire};
    use crate::topology::{NetworkEvent, Wire, WireObserver};
    use approx::assert_abs_diff_eq;

    #[derive(Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl WireObserver for Recorder {
        fn about_to_change(&mut self, _id: WireId, wire: &Wire) {
            self.log
                .borrow_mut()
                .push(format!("about {:?}", positions(wire)));
        }

        fn has_changed(&mut self, _id: WireId, wire: &Wire) {
            self.log
                .borrow_mut()
                .push(format!("changed {:?}", positions(wire)));
        }

        fn on_event(&mut self, event: &NetworkEvent) {
            if let NetworkEvent::PointMoved { index, .. } = event {
                self.log.borrow_mut().push(format!("moved {index}"));
            }
        }
    }

    #[test]
    fn moving_anchor_endpoint_moves_junction_by_same_delta() {
        init_tracing();
        let mut mgr = WireManager::new();
        let b = mgr.add_wire(wire(&[(0.0, 0.0), (10.0, 0.0)])).unwrap();
        let a = mgr
            .add_wire(wire(&[(10.0, -5.0), (10.0, 0.0), (10.0, 5.0)]))
            .unwrap();
        assert_eq!(mgr.wire(a).unwrap().junctions(), vec![1]);

        MovePoint::new(b, 1, Point2::new(12.0, 3.0))
            .execute(&mut mgr)
            .unwrap();

        let moved = mgr.wire(a).unwrap().points()[1].position();
        assert_abs_diff_eq!(moved - Point2::new(10.0, 0.0), Vector2::new(2.0, 3.0), epsilon = 1e-9);
        assert_eq!(mgr.wire(a).unwrap().junctions(), vec![1]);
        assert_eq!(mgr.wire(b).unwrap().connected_wires(), &[a]);
    }

    #[test]
    fn interior_junction_stays_proportional() {
        let mut mgr = WireManager::new();
        let b = mgr.add_wire(wire(&[(0.0, 0.0), (10.0, 0.0)])).unwrap();
        let a = mgr.add_wire(wire(&[(2.5, 0.0), (2.5, 5.0)])).unwrap();

        MovePoint::new(b, 1, Point2::new(20.0, 8.0))
            .execute(&mut mgr)
            .unwrap();

        // t = 0.25 along (0,0)→(20,8).
        let junction = mgr.wire(a).unwrap().points()[0].position();
        assert_abs_diff_eq!(junction, Point2::new(5.0, 2.0), epsilon = 1e-9);
        assert_eq!(mgr.wire(a).unwrap().junctions(), vec![0]);
    }

    #[test]
    fn dragging_endpoint_away_detaches() {
        let mut mgr = WireManager::new();
        let host = mgr.add_wire(wire(&[(0.0, 0.0), (10.0, 0.0)])).unwrap();
        let stub = mgr.add_wire(wire(&[(4.0, 0.0), (4.0, 6.0)])).unwrap();

        MovePoint::new(stub, 0, Point2::new(4.0, 2.0))
            .execute(&mut mgr)
            .unwrap();

        assert!(mgr.wire(stub).unwrap().junctions().is_empty());
        assert!(mgr.wire(stub).unwrap().connected_wires().is_empty());
        assert!(mgr.wire(host).unwrap().connected_wires().is_empty());
    }

    #[test]
    fn dragging_endpoint_onto_segment_attaches() {
        let mut mgr = WireManager::new();
        let host = mgr.add_wire(wire(&[(0.0, 0.0), (10.0, 0.0)])).unwrap();
        let stub = mgr.add_wire(wire(&[(4.0, 3.0), (4.0, 6.0)])).unwrap();
        assert!(mgr.wire(stub).unwrap().connected_wires().is_empty());

        MovePoint::new(stub, 0, Point2::new(4.0, 0.0))
            .execute(&mut mgr)
            .unwrap();

        assert_eq!(mgr.wire(stub).unwrap().junctions(), vec![0]);
        assert_eq!(mgr.wire(host).unwrap().connected_wires(), &[stub]);
    }

    #[test]
    fn dragging_endpoint_onto_endpoint_merges() {
        let mut mgr = WireManager::new();
        let a = mgr.add_wire(wire(&[(0.0, 0.0), (5.0, 0.0)])).unwrap();
        let b = mgr.add_wire(wire(&[(5.0, 3.0), (5.0, 8.0)])).unwrap();

        MovePoint::new(b, 0, Point2::new(5.0, 0.0))
            .execute(&mut mgr)
            .unwrap();

        assert!(!mgr.contains(b));
        assert_eq!(
            positions(mgr.wire(a).unwrap()),
            vec![(0.0, 0.0), (5.0, 0.0), (5.0, 8.0)]
        );
    }

    #[test]
    fn out_of_range_index_changes_nothing() {
        let mut mgr = WireManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        mgr.add_observer(Box::new(Recorder { log: Rc::clone(&log) }));
        let a = mgr.add_wire(wire(&[(0.0, 0.0), (5.0, 0.0)])).unwrap();
        log.borrow_mut().clear();

        let result = MovePoint::new(a, 2, Point2::new(1.0, 1.0)).execute(&mut mgr);
        assert!(result.is_err());
        assert_eq!(positions(mgr.wire(a).unwrap()), vec![(0.0, 0.0), (5.0, 0.0)]);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn hooks_bracket_the_mutation() {
        let mut mgr = WireManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        mgr.add_observer(Box::new(Recorder { log: Rc::clone(&log) }));
        let a = mgr.add_wire(wire(&[(0.0, 0.0), (5.0, 0.0)])).unwrap();
        log.borrow_mut().clear();

        MovePoint::new(a, 1, Point2::new(5.0, 5.0))
            .execute(&mut mgr)
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "about [(0.0, 0.0), (5.0, 0.0)]".to_owned(),
                "changed [(0.0, 0.0), (5.0, 5.0)]".to_owned(),
                "moved 1".to_owned(),
            ]
        );
    }

    #[test]
    fn collapsing_a_wire_to_a_point_is_rolled_back() {
        let mut mgr = WireManager::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        mgr.add_observer(Box::new(Recorder { log: Rc::clone(&log) }));
        let a = mgr.add_wire(wire(&[(0.0, 0.0), (5.0, 0.0)])).unwrap();
        log.borrow_mut().clear();

        let result = MovePoint::new(a, 1, Point2::new(0.0, 0.0)).execute(&mut mgr);
        assert!(result.is_err());
        assert_eq!(positions(mgr.wire(a).unwrap()), vec![(0.0, 0.0), (5.0, 0.0)]);
        // The bracket is closed with the restored geometry and no events follow.
        assert_eq!(
            *log.borrow(),
            vec![
                "about [(0.0, 0.0), (5.0, 0.0)]".to_string(),
                "changed [(0.0, 0.0), (5.0, 0.0)]".to_string(),
            ]
        );
    }
}
