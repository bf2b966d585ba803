//! Angle helpers for the degree-based heading model.

use crate::util::vec2::Vec2;

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Smallest absolute difference between two angles in degrees, in [0, 180]
#[inline]
pub fn degrees_between(a: f32, b: f32) -> f32 {
    let diff = normalize_degrees(a - b);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Bearing from `from` to `to` in degrees, wrapped to [0, 360)
#[inline]
pub fn bearing_degrees(from: Vec2, to: Vec2) -> f32 {
    (to - from).angle_degrees()
}
