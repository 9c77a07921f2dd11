//! Angle math for the rotary correction.
//!
//! The correction is the slope angle of the line through the two probed
//! points in the Y/Z plane, wrapped into [-90, 90] so the probe order along
//! Y does not flip its sign.

use crate::points::MeasuredPosition;

/// `atan2(z0 - z1, y0 - y1)` in degrees.
pub fn raw_angle_deg(p0: &MeasuredPosition, p1: &MeasuredPosition) -> f64 {
    let y_diff = p0[1] - p1[1];
    let z_diff = p0[2] - p1[2];
    z_diff.atan2(y_diff) / (std::f64::consts::PI / 180.0)
}

/// Fold an `atan2` result from (-180, 180] into [-90, 90].
#[inline]
pub fn normalize_deg(angle: f64) -> f64 {
    if angle > 90.0 {
        angle - 180.0
    } else if angle < -90.0 {
        180.0 + angle
    } else {
        angle
    }
}

/// Normalized correction angle between two probed positions.
pub fn correction_angle(p0: &MeasuredPosition, p1: &MeasuredPosition) -> f64 {
    normalize_deg(raw_angle_deg(p0, p1))
}

/// Whether a correction must not be applied automatically.
#[inline]
pub fn exceeds_limit(correction_deg: f64, limit_deg: f64) -> bool {
    !correction_deg.is_finite() || correction_deg.abs() > limit_deg
}

/// Rotary coordinate after cancelling the measured tilt.
#[inline]
pub fn corrected_rotary(current: f64, correction_deg: f64) -> f64 {
    current + -correction_deg
}
