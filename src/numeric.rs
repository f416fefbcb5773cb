//! Numeric conversion helpers used across the project.
//!
//! World coordinates are `f32` pixels while the obstacle grid is addressed by
//! integer tiles. These helpers keep the float/integer boundary in one place.

/// Tile index containing the world coordinate `value` for tiles of `tile_size`.
///
/// Returns `None` for non-finite input or values that overflow `i32`. Negative
/// coordinates map to negative tiles so the grid can reject them explicitly.
#[expect(
    clippy::cast_possible_truncation,
    reason = "The floored value is validated against the i32 domain."
)]
#[must_use]
pub fn world_to_tile(value: f32, tile_size: f32) -> Option<i32> {
    let scaled = f64::from(value) / f64::from(tile_size);
    if !scaled.is_finite() {
        return None;
    }
    let floored = scaled.floor();
    if floored < f64::from(i32::MIN) || floored > f64::from(i32::MAX) {
        return None;
    }
    Some(floored as i32)
}

/// World coordinate of the centre of tile `index`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Tile indices stay far below the 2^24 exactness limit of f32."
)]
#[must_use]
pub fn tile_centre(index: i32, tile_size: f32) -> f32 {
    (index as f32 + 0.5) * tile_size
}
