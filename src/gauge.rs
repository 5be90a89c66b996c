//! # Clock-Face Gauge Scaling
//!
//! Maps "minutes until the next extreme" onto a dial: the half-circle
//! 0–180° covers the run-up to a low tide and 180–360° the run-up to a high
//! tide, so the arm points at "High Tide" (top) at high water and at "Low Tide"
//! (bottom) at low water.

use crate::TideKind;

/// Average minutes between consecutive high and low water used to normalize
/// the dial (half of a ~12.5 h semi-diurnal period).
pub const HALF_PERIOD_MINUTES: f64 = 375.0;

/// Gauge angle in degrees for the time remaining until the next extreme.
///
/// No clamping is applied: more than 375 minutes to go yields angles below
/// the half-circle start, and negative minutes push past it.
///
/// # Example
/// ```
/// use tide_sensor_lib::{gauge::to_degree, TideKind};
///
/// assert_eq!(to_degree(0, TideKind::Low), 180.0);
/// assert_eq!(to_degree(375, TideKind::Low), 0.0);
/// assert_eq!(to_degree(0, TideKind::High), 360.0);
/// ```
pub fn to_degree(minutes_to_next: i64, next_kind: TideKind) -> f64 {
    let degree = -180.0 * (minutes_to_next as f64 / HALF_PERIOD_MINUTES) + 180.0;
    match next_kind {
        TideKind::High => degree + 180.0,
        TideKind::Low => degree,
    }
}
