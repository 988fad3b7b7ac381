//! Clipping of lines and polygon rings to the visible hemisphere.
//!
//! Everything here works on unit vectors already rotated into the view
//! frame, where the clip circle is the set of points with `x == cos(clip)`.

use super::GnomonicProjection;
use glam::DVec3;
use std::f64::consts::{PI, TAU};

/// Angular step used when walking along the clip circle.
const CIRCLE_STEP: f64 = 6.0 * PI / 180.0;

/// Bisection iterations when locating a horizon crossing.
const CROSSING_ITERATIONS: usize = 52;

/// A stretch of a ring hidden behind the horizon.
///
/// Tracks how far the hidden vertices wind around the view axis, so the
/// gap can be closed along the clip circle in the same direction.
#[derive(Debug, Clone, Copy)]
struct HiddenRun {
    start: f64,
    last: f64,
    sweep: f64,
}

impl HiddenRun {
    fn new(exit: DVec3) -> Self {
        let angle = horizon_angle(exit);
        Self {
            start: angle,
            last: angle,
            sweep: 0.0,
        }
    }

    fn advance(&mut self, point: DVec3) {
        let angle = horizon_angle(point);
        let mut delta = (angle - self.last).rem_euclid(TAU);
        if delta > PI {
            delta -= TAU;
        }
        self.sweep += delta;
        self.last = angle;
    }
}

/// Splits a polyline into the runs that lie inside the clip circle.
///
/// Each segment is a great-circle arc; a run ends where an arc leaves the
/// hemisphere and a new one starts where an arc re-enters it.
pub fn clip_line(points: &[DVec3], projection: &GnomonicProjection) -> Vec<Vec<DVec3>> {
    let cos_clip = projection.cos_clip();
    let mut runs = Vec::new();
    let mut current: Vec<DVec3> = Vec::new();

    for (i, &point) in points.iter().enumerate() {
        let inside = point.x > cos_clip;
        if i == 0 {
            if inside {
                current.push(point);
            }
            continue;
        }

        let prev = points[i - 1];
        let prev_inside = prev.x > cos_clip;
        match (prev_inside, inside) {
            (true, true) => current.push(point),
            (true, false) => {
                current.push(horizon_crossing(prev, point, cos_clip));
                flush_run(&mut runs, &mut current);
            }
            (false, true) => {
                current.push(horizon_crossing(point, prev, cos_clip));
                current.push(point);
            }
            (false, false) => {}
        }
    }

    flush_run(&mut runs, &mut current);
    runs
}

fn flush_run(runs: &mut Vec<Vec<DVec3>>, current: &mut Vec<DVec3>) {
    if current.len() >= 2 {
        runs.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Clips a closed ring against the visible half-space.
///
/// Where the ring leaves the hemisphere and later comes back, the gap is
/// filled with points along the clip circle so the result follows the
/// horizon. Returns an empty ring when nothing is visible.
pub fn clip_ring(ring: &[DVec3], projection: &GnomonicProjection) -> Vec<DVec3> {
    let cos_clip = projection.cos_clip();

    // Rings arrive closed; the duplicate closing vertex adds nothing.
    let ring = match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    };
    if ring.len() < 3 {
        return Vec::new();
    }

    if ring.iter().all(|p| p.x > cos_clip) {
        return ring.to_vec();
    }

    // Walking from a visible vertex keeps every hidden run in one piece.
    let Some(start) = ring.iter().position(|p| p.x > cos_clip) else {
        return Vec::new();
    };

    let n = ring.len();
    let mut out = Vec::with_capacity(n * 2);
    let mut hidden: Option<HiddenRun> = None;
    for k in 1..=n {
        let prev = ring[(start + k - 1) % n];
        let current = ring[(start + k) % n];

        match (prev.x > cos_clip, current.x > cos_clip) {
            (true, true) => out.push(current),
            (true, false) => {
                let exit = horizon_crossing(prev, current, cos_clip);
                out.push(exit);
                let mut run = HiddenRun::new(exit);
                run.advance(current);
                hidden = Some(run);
            }
            (false, false) => {
                if let Some(run) = hidden.as_mut() {
                    run.advance(current);
                }
            }
            (false, true) => {
                let entry = horizon_crossing(current, prev, cos_clip);
                if let Some(mut run) = hidden.take() {
                    run.advance(entry);
                    out.extend(horizon_arc(run.start, run.sweep, projection));
                }
                out.push(entry);
                out.push(current);
            }
        }
    }

    if out.len() < 3 {
        return Vec::new();
    }
    out
}

/// Samples the full clip circle, counter-clockwise in the view frame.
pub fn clip_circle(projection: &GnomonicProjection) -> Vec<DVec3> {
    let steps = (TAU / CIRCLE_STEP).round() as usize;
    (0..steps)
        .map(|i| projection.clip_circle_point(i as f64 * TAU / steps as f64))
        .collect()
}

/// Locates where the arc from `inside` to `outside` meets the horizon.
///
/// Bisects along the normalised chord, which traces the same great circle.
/// The returned point is always on the visible side.
fn horizon_crossing(inside: DVec3, outside: DVec3, cos_clip: f64) -> DVec3 {
    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    let mut best = inside;

    for _ in 0..CROSSING_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let point = inside.lerp(outside, mid).normalize();
        if point.x > cos_clip {
            best = point;
            lo = mid;
        } else {
            hi = mid;
        }
    }

    best
}

/// Angle of a point around the view axis, measured in the y-z plane.
fn horizon_angle(point: DVec3) -> f64 {
    point.z.atan2(point.y)
}

/// Points strictly inside a clip-circle arc that starts at angle `start`
/// and turns through `sweep` radians (negative is clockwise).
fn horizon_arc(start: f64, sweep: f64, projection: &GnomonicProjection) -> Vec<DVec3> {
    let steps = (sweep.abs() / CIRCLE_STEP).ceil() as usize;
    (1..steps)
        .map(|i| projection.clip_circle_point(start + sweep * i as f64 / steps as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Rotation;
    use geo_types::Coord;

    fn projection() -> GnomonicProjection {
        GnomonicProjection::new(Rotation::new(0.0, 0.0))
    }

    fn rotated(projection: &GnomonicProjection, coords: &[(f64, f64)]) -> Vec<DVec3> {
        coords
            .iter()
            .map(|&(x, y)| projection.rotate(Coord { x, y }))
            .collect()
    }

    #[test]
    fn test_visible_line_is_untouched() {
        let p = projection();
        let line = rotated(&p, &[(-10.0, 0.0), (0.0, 5.0), (10.0, 0.0)]);
        let runs = clip_line(&line, &p);
        assert_eq!(runs, vec![line]);
    }

    #[test]
    fn test_line_leaving_and_returning_splits_into_two_runs() {
        let p = projection();
        let coords = [
            (60.0, 0.0),
            (80.0, 0.0),
            (100.0, 0.0),
            (170.0, 0.0),
            (-100.0, 0.0),
            (-80.0, 0.0),
        ];
        let line = rotated(&p, &coords);
        let runs = clip_line(&line, &p);
        assert_eq!(runs.len(), 2);
        for run in &runs {
            assert!(run.iter().all(|v| p.is_visible_vector(*v)));
        }
        // Each run ends (or starts) right at the horizon.
        assert!(runs[0].last().unwrap().x < 1e-4);
        assert!(runs[1].first().unwrap().x < 1e-4);
    }

    #[test]
    fn test_hidden_line_produces_nothing() {
        let p = projection();
        let line = rotated(&p, &[(120.0, 0.0), (150.0, 10.0)]);
        assert!(clip_line(&line, &p).is_empty());
    }

    #[test]
    fn test_crossing_lies_on_horizon() {
        let p = projection();
        let a = p.rotate(Coord { x: 80.0, y: 10.0 });
        let b = p.rotate(Coord { x: 100.0, y: 20.0 });
        let c = horizon_crossing(a, b, p.cos_clip());
        assert!(p.is_visible_vector(c));
        assert!((c.x - p.cos_clip()).abs() < 1e-9);
    }

    #[test]
    fn test_visible_ring_is_kept_without_closing_duplicate() {
        let p = projection();
        let ring = rotated(&p, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)]);
        let clipped = clip_ring(&ring, &p);
        assert_eq!(clipped.len(), 3);
    }

    #[test]
    fn test_ring_straddling_horizon_follows_clip_circle() {
        let p = projection();
        let coords = [
            (70.0, -30.0),
            (120.0, -30.0),
            (120.0, 30.0),
            (70.0, 30.0),
            (70.0, -30.0),
        ];
        let ring = rotated(&p, &coords);
        let clipped = clip_ring(&ring, &p);
        assert!(clipped.len() > 4);
        assert!(clipped.iter().all(|v| v.x >= p.cos_clip() - 1e-12));

        let on_horizon = clipped
            .iter()
            .filter(|v| (v.x - p.cos_clip()).abs() < 1e-6)
            .count();
        assert!(on_horizon >= 3);
        // The hidden side is a short eastward bulge, so the horizon arc
        // stays on the eastern limb.
        assert!(clipped.iter().all(|v| v.y > 0.0));
    }

    #[test]
    fn test_ring_winding_far_round_back_takes_long_horizon_arc() {
        let p = projection();
        // Leaves eastward near the equator, swings from south to north
        // around the back of the globe and re-enters just north of where
        // it left.
        let coords = [
            (80.0, -10.0),
            (100.0, -10.0),
            (150.0, -70.0),
            (-150.0, -70.0),
            (-100.0, 0.0),
            (-150.0, 70.0),
            (150.0, 70.0),
            (100.0, 10.0),
            (80.0, 10.0),
            (80.0, -10.0),
        ];
        let ring = rotated(&p, &coords);
        let clipped = clip_ring(&ring, &p);

        assert!(clipped.iter().all(|v| v.x >= p.cos_clip() - 1e-12));
        // Roughly 340 degrees of horizon at 6 degree steps.
        let on_horizon = clipped
            .iter()
            .filter(|v| (v.x - p.cos_clip()).abs() < 1e-6)
            .count();
        assert!(on_horizon > 50);
        assert!(clipped.iter().any(|v| v.y < -0.9));
    }

    #[test]
    fn test_hidden_ring_is_dropped() {
        let p = projection();
        let ring = rotated(&p, &[(120.0, 0.0), (130.0, 0.0), (130.0, 10.0), (120.0, 0.0)]);
        assert!(clip_ring(&ring, &p).is_empty());
    }

    #[test]
    fn test_clip_circle_sampling() {
        let p = projection();
        let circle = clip_circle(&p);
        assert_eq!(circle.len(), 60);
        assert!(circle.iter().all(|v| (v.x - p.cos_clip()).abs() < 1e-12));
    }
}
