//! Planar vector helpers.
//! Distances, guarded normalisation and heading selection for agents that
//! steer towards a point.
use glam::Vec2;

/// Euclidean distance between two points.
///
/// # Examples
/// ```
/// use escort::vector_math::distance;
/// use glam::Vec2;
/// let d = distance(Vec2::ZERO, Vec2::new(3.0, 4.0));
/// assert!((d - 5.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn distance(from: Vec2, to: Vec2) -> f32 {
    from.distance(to)
}

/// Returns the unit vector along `vector`, or `None` when the input is the
/// zero vector or carries non-finite components.
///
/// # Examples
///
/// ```
/// use escort::vec_normalize;
/// use glam::Vec2;
/// let unit = vec_normalize(Vec2::new(3.0, 4.0)).unwrap_or(Vec2::ZERO);
/// assert!((unit.x - 0.6).abs() < 1e-6);
/// assert!((unit.y - 0.8).abs() < 1e-6);
///
/// assert_eq!(vec_normalize(Vec2::ZERO), None);
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec2) -> Option<Vec2> {
    if !vector.is_finite() {
        return None;
    }
    vector.try_normalize()
}

/// Angle (radians) of the direction from `from` to `to`.
///
/// When the two points coincide there is no direction, so `previous` is
/// returned unchanged.
///
/// # Examples
/// ```
/// use escort::vector_math::heading_towards;
/// use glam::Vec2;
/// let here = Vec2::new(5.0, 5.0);
/// assert_eq!(heading_towards(here, here, 1.25), 1.25);
/// ```
#[must_use]
pub fn heading_towards(from: Vec2, to: Vec2, previous: f32) -> f32 {
    vec_normalize(to - from).map_or(previous, |dir| dir.y.atan2(dir.x))
}

/// Unit vector pointing along `angle`.
#[must_use]
pub fn facing(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// The step of length `speed` from `from` towards `to`, shortened so the
/// step never overshoots the target. Zero when the points coincide.
#[must_use]
pub fn step_towards(from: Vec2, to: Vec2, speed: f32) -> Vec2 {
    let offset = to - from;
    let length = offset.length();
    match vec_normalize(offset) {
        Some(dir) => dir * length.min(speed),
        None => Vec2::ZERO,
    }
}
