use tracing_subscriber::EnvFilter;

use crate::geometry::WirePoint;
use crate::math::Point2;
use crate::topology::Wire;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) fn wire(points: &[(f64, f64)]) -> Wire {
    Wire::from_points(
        points
            .iter()
            .map(|&(x, y)| WirePoint::new(Point2::new(x, y))),
    )
}

pub(crate) fn positions(wire: &Wire) -> Vec<(f64, f64)> {
    wire.points().iter().map(|p| (p.x(), p.y())).collect()
}
