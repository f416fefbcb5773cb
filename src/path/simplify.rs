//! Removal of collinear interior points from tile paths.

use glam::IVec2;

/// True when `u` and `v` point the same way (parallel, not opposite).
const fn same_direction(u: IVec2, v: IVec2) -> bool {
    let cross = u.x * v.y - u.y * v.x;
    let dot = u.x * v.x + u.y * v.y;
    cross == 0 && dot > 0
}

/// Collapses runs of steps sharing a direction into their endpoints.
///
/// The first and last points always survive and repeated points are dropped,
/// leaving only the turn points. The output contains no two consecutive
/// segments with the same direction, so simplifying it again is a no-op.
///
/// # Examples
/// ```
/// use escort::path::simplify;
/// use glam::IVec2;
/// let run = [IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 0), IVec2::new(2, 1)];
/// assert_eq!(simplify(&run), vec![IVec2::new(0, 0), IVec2::new(2, 0), IVec2::new(2, 1)]);
/// ```
#[must_use]
pub fn simplify(path: &[IVec2]) -> Vec<IVec2> {
    let mut out: Vec<IVec2> = Vec::with_capacity(path.len());
    for &point in path {
        if out.last() == Some(&point) {
            continue;
        }
        if let [.., before, last] = out.as_slice() {
            if same_direction(*last - *before, point - *last) {
                out.pop();
            }
        }
        out.push(point);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn pts(raw: &[(i32, i32)]) -> Vec<IVec2> {
        raw.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    #[rstest]
    #[case(&[], &[])]
    #[case(&[(3, 3)], &[(3, 3)])]
    #[case(&[(0, 0), (1, 1), (2, 2), (3, 3)], &[(0, 0), (3, 3)])]
    #[case(&[(0, 0), (1, 0), (1, 1), (1, 2), (2, 3)], &[(0, 0), (1, 0), (1, 2), (2, 3)])]
    #[case(&[(0, 0), (1, 0), (1, 0), (2, 0)], &[(0, 0), (2, 0)])]
    #[case(&[(0, 0), (2, 0), (1, 0)], &[(0, 0), (2, 0), (1, 0)])]
    fn keeps_only_turn_points(#[case] input: &[(i32, i32)], #[case] expected: &[(i32, i32)]) {
        assert_eq!(simplify(&pts(input)), pts(expected));
    }

    #[rstest]
    fn uneven_collinear_steps_collapse_in_one_pass() {
        let once = simplify(&pts(&[(0, 0), (1, 0), (2, 0), (4, 0)]));
        assert_eq!(once, pts(&[(0, 0), (4, 0)]));
        assert_eq!(simplify(&once), once);
    }
}
