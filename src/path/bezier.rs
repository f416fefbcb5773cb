//! Smooth cubic Bezier splines through a sequence of waypoints.
//!
//! Control points are chosen so the spline passes through every waypoint with
//! continuous first and second derivatives. The inner control points come from
//! a tridiagonal system solved with the Thomas algorithm.

use glam::Vec2;

/// One cubic segment running from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    /// First waypoint.
    pub start: Vec2,
    /// Control point leaving `start`.
    pub first: Vec2,
    /// Control point entering `end`.
    pub second: Vec2,
    /// Second waypoint.
    pub end: Vec2,
}

impl CubicSegment {
    /// Point on the segment at parameter `t` in `[0, 1]`.
    #[must_use]
    pub fn point(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.start * (u * u * u)
            + self.first * (3.0 * u * u * t)
            + self.second * (3.0 * u * t * t)
            + self.end * (t * t * t)
    }
}

/// Cubic segments through `knots`, one per consecutive pair.
///
/// Fewer than two knots produce no segments.
#[must_use]
pub fn control_segments(knots: &[Vec2]) -> Vec<CubicSegment> {
    let [first_knot, .., last_knot] = knots else {
        return Vec::new();
    };
    let n = knots.len() - 1;

    if n == 1 {
        let first = (*first_knot * 2.0 + *last_knot) / 3.0;
        let second = first * 2.0 - *first_knot;
        return vec![CubicSegment {
            start: *first_knot,
            first,
            second,
            end: *last_knot,
        }];
    }

    let rhs: Vec<Vec2> = (0..n)
        .map(|i| {
            let k = |j: usize| knots.get(j).copied().unwrap_or(Vec2::ZERO);
            if i == 0 {
                k(0) + k(1) * 2.0
            } else if i == n - 1 {
                (k(n - 1) * 8.0 + k(n)) / 2.0
            } else {
                k(i) * 4.0 + k(i + 1) * 2.0
            }
        })
        .collect();
    let firsts = solve_first_controls(&rhs);

    (0..n)
        .map(|i| {
            let start = knots.get(i).copied().unwrap_or(Vec2::ZERO);
            let end = knots.get(i + 1).copied().unwrap_or(Vec2::ZERO);
            let first = firsts.get(i).copied().unwrap_or(start);
            let second = if i + 1 < n {
                end * 2.0 - firsts.get(i + 1).copied().unwrap_or(end)
            } else {
                (end + first) / 2.0
            };
            CubicSegment {
                start,
                first,
                second,
                end,
            }
        })
        .collect()
}

/// Thomas algorithm for the first-control-point system
/// (diagonal 2, 4, ..., 4, 3.5; off-diagonals 1).
fn solve_first_controls(rhs: &[Vec2]) -> Vec<Vec2> {
    let n = rhs.len();
    let mut solution = vec![Vec2::ZERO; n];
    let mut scratch = vec![0.0_f32; n];
    let mut pivot = 2.0_f32;

    if let (Some(x0), Some(r0)) = (solution.first_mut(), rhs.first()) {
        *x0 = *r0 / pivot;
    }
    for i in 1..n {
        let ratio = 1.0 / pivot;
        if let Some(s) = scratch.get_mut(i) {
            *s = ratio;
        }
        pivot = if i < n - 1 { 4.0 } else { 3.5 } - ratio;
        let prev = solution.get(i - 1).copied().unwrap_or(Vec2::ZERO);
        let r = rhs.get(i).copied().unwrap_or(Vec2::ZERO);
        if let Some(x) = solution.get_mut(i) {
            *x = (r - prev) / pivot;
        }
    }
    for i in (0..n.saturating_sub(1)).rev() {
        let next = solution.get(i + 1).copied().unwrap_or(Vec2::ZERO);
        let factor = scratch.get(i + 1).copied().unwrap_or(0.0);
        if let Some(x) = solution.get_mut(i) {
            *x -= next * factor;
        }
    }
    solution
}

/// Dense path along a smooth spline through `waypoints`.
///
/// Each segment is sampled `resolution` times at `t = k / resolution` and the
/// final waypoint is appended, so the result starts and ends on the input.
/// Fewer than three waypoints are returned unchanged.
#[expect(
    clippy::cast_precision_loss,
    reason = "Sample counts are small configuration values."
)]
#[must_use]
pub fn smooth_path(waypoints: &[Vec2], resolution: u32) -> Vec<Vec2> {
    if waypoints.len() < 3 {
        return waypoints.to_vec();
    }
    let samples = resolution.max(1);
    let step = 1.0 / samples as f32;
    let segments = control_segments(waypoints);

    let mut out = Vec::with_capacity(segments.len() * samples as usize + 1);
    for segment in &segments {
        out.extend((0..samples).map(|k| segment.point(k as f32 * step)));
    }
    out.extend(waypoints.last().copied());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn two_waypoints_bypass_the_curve() {
        let input = [Vec2::new(1.0, 2.0), Vec2::new(9.0, 4.0)];
        assert_eq!(smooth_path(&input, 4), input.to_vec());
    }

    #[rstest]
    fn spline_passes_through_every_waypoint() {
        let knots = [
            Vec2::new(0.0, 0.0),
            Vec2::new(64.0, 0.0),
            Vec2::new(64.0, 64.0),
            Vec2::new(128.0, 96.0),
        ];
        let segments = control_segments(&knots);
        assert_eq!(segments.len(), 3);
        for (segment, pair) in segments.iter().zip(knots.windows(2)) {
            let [a, b] = pair else { continue };
            assert_relative_eq!(segment.point(0.0).x, a.x, epsilon = 1e-3);
            assert_relative_eq!(segment.point(0.0).y, a.y, epsilon = 1e-3);
            assert_relative_eq!(segment.point(1.0).x, b.x, epsilon = 1e-3);
            assert_relative_eq!(segment.point(1.0).y, b.y, epsilon = 1e-3);
        }
    }

    #[rstest]
    fn collinear_knots_stay_on_the_line() {
        let knots = [Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(20.0, 0.0)];
        let dense = smooth_path(&knots, 4);
        assert_eq!(dense.len(), 2 * 4 + 1);
        assert!(dense.iter().all(|p| p.y.abs() < 1e-4));
        assert!(dense.windows(2).all(|w| matches!(w, [a, b] if b.x >= a.x)));
    }

    #[rstest]
    fn tangent_is_continuous_at_inner_knots() {
        let knots = [Vec2::ZERO, Vec2::new(32.0, 32.0), Vec2::new(64.0, 0.0)];
        let segments = control_segments(&knots);
        let [left, right] = segments.as_slice() else {
            panic!("expected two segments");
        };
        let incoming = left.end - left.second;
        let outgoing = right.first - right.start;
        assert_relative_eq!(incoming.x, outgoing.x, epsilon = 1e-3);
        assert_relative_eq!(incoming.y, outgoing.y, epsilon = 1e-3);
    }
}
