//! Small vector and rectangle helpers shared by physics, AI and combat.
//!
//! All rectangles are axis-aligned [`Rect`]s in y-down world space, so `min` is
//! the top-left corner and `max` the bottom-right.

use bevy::prelude::*;

/// Strict overlap test: rectangles that merely share an edge do not overlap.
#[inline]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// Square hit box of edge `size` centred on `center`.
#[inline]
pub fn square(center: Vec2, size: f32) -> Rect {
    Rect::from_center_size(center, Vec2::splat(size))
}

/// Heading of `v` in radians (`atan2(y, x)`); zero for the zero vector.
#[inline]
pub fn heading(v: Vec2) -> f32 {
    if v == Vec2::ZERO {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}

/// Unit vector for a heading in radians.
#[inline]
pub fn from_heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle in degrees into `[-180, 180)`.
#[inline]
pub fn wrap_degrees(deg: f32) -> f32 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Wrap an angle in radians into `[-π, π)`.
#[inline]
pub fn wrap_radians(rad: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (rad + PI).rem_euclid(TAU) - PI
}

/// Move `current` toward `target` by `factor` of the shortest angular
/// difference (degrees).
#[inline]
pub fn smooth_angle(current: f32, target: f32, factor: f32) -> f32 {
    current + wrap_degrees(target - current) * factor
}

/// Sign of `x` with zero mapping to zero (unlike [`f32::signum`]).
#[inline]
pub fn sign_or_zero(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!overlaps(a, b));
        let c = Rect::new(9.5, 0.0, 20.0, 10.0);
        assert!(overlaps(a, c));
    }

    #[test]
    fn zero_vector_has_zero_heading() {
        assert_eq!(heading(Vec2::ZERO), 0.0);
    }

    #[test]
    fn smoothing_takes_the_short_way_round() {
        // 170 → -170 is a 20° step across the seam, not 340° back.
        let next = smooth_angle(170.0, -170.0, 0.5);
        assert!((next - 180.0).abs() < 1e-4, "{next}");
    }

    #[test]
    fn wrap_radians_range() {
        let w = wrap_radians(3.5 * std::f32::consts::PI);
        assert!(w >= -std::f32::consts::PI && w < std::f32::consts::PI);
    }
}
