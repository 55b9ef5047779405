use super::{Point2, TOLERANCE};

/// Projects `p` onto the segment `a → b` and returns the clamped parameter
/// `t ∈ [0, 1]` of the foot point together with the distance from `p` to it.
///
/// Returns `None` for a zero-length segment: it has no valid projection.
#[must_use]
pub fn project_onto_segment(p: &Point2, a: &Point2, b: &Point2) -> Option<(f64, f64)> {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return None;
    }

    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    let foot = a + d * t;
    Some((t, (p - foot).norm()))
}

/// Returns `true` if `a` and `b` are within `tol` of each other.
#[must_use]
pub fn points_coincide(a: &Point2, b: &Point2, tol: f64) -> bool {
    (a - b).norm_squared() <= tol * tol
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn projection_of_offset_point() {
        // Point (1, 1) onto segment (0,0)→(2,0). Foot at (1,0), dist = 1.
        let (t, d) = project_onto_segment(
            &Point2::new(1.0, 1.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap_or((f64::NAN, f64::NAN));
        assert!((t - 0.5).abs() < TOL, "t={t}");
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn projection_clamps_to_nearest_endpoint() {
        let (t, d) = project_onto_segment(
            &Point2::new(-1.0, 0.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(2.0, 0.0),
        )
        .unwrap_or((f64::NAN, f64::NAN));
        assert!(t.abs() < TOL, "t={t}");
        assert!((d - 1.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn projection_parameter_is_proportional() {
        let (t, d) = project_onto_segment(
            &Point2::new(3.0, 0.0),
            &Point2::new(0.0, 0.0),
            &Point2::new(4.0, 0.0),
        )
        .unwrap_or((f64::NAN, f64::NAN));
        assert!((t - 0.75).abs() < TOL, "t={t}");
        assert!(d.abs() < TOL, "d={d}");
    }

    #[test]
    fn zero_length_segment_has_no_projection() {
        let p = Point2::new(1.0, 1.0);
        assert!(project_onto_segment(&p, &p, &p).is_none());
    }

    #[test]
    fn coincidence_uses_tolerance() {
        let a = Point2::new(1.0, 1.0);
        assert!(points_coincide(&a, &Point2::new(1.0 + 1e-7, 1.0), 1e-6));
        assert!(!points_coincide(&a, &Point2::new(1.1, 1.0), 1e-6));
    }
}
