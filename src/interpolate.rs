//! # Current Tide Interpolation
//!
//! Turns the cached list of predicted extremes into a point-in-time reading.
//!
//! The current height is a straight line between the last extreme before
//! "now" and the first one after it:
//! ```text
//! f       = minutes_since_last / (minutes_since_last + minutes_to_next)
//! current = last_height + (next_height - last_height) * f
//! ```
//! Both minute counts are rounded to whole minutes before use.
//!
//! When the list has no extreme before "now" the first future extreme serves
//! as both anchors (`f = 1`), so the reading snaps to its height until a past
//! event is available again.

use crate::gauge::to_degree;
use crate::{round2, TideError, TideEvent, TideSnapshot};
use chrono::{DateTime, TimeZone};

/// Whole minutes from `now` to `event`, negative for past events.
fn minutes_from<Tz: TimeZone>(event: &TideEvent, now: &DateTime<Tz>) -> (f64, i64) {
    let delta_secs =
        event.time.signed_duration_since(now.clone()).num_milliseconds() as f64 / 1000.0;
    (delta_secs, (delta_secs / 60.0).round() as i64)
}

/// Locate the straddling pair of events around `now` and interpolate.
///
/// # Errors
/// [`TideError::NoFutureEvent`] when no event lies strictly after `now`;
/// callers should keep the previously published reading.
///
/// # Example
/// ```
/// use chrono::{DateTime, Duration};
/// use tide_sensor_lib::{interpolate::next_event, TideEvent, TideKind};
///
/// let now = DateTime::parse_from_rfc3339("2024-06-16T12:00:00+10:00").unwrap();
/// let events = vec![
///     TideEvent { time: now - Duration::minutes(60), kind: TideKind::Low, height_m: 0.20 },
///     TideEvent { time: now + Duration::minutes(120), kind: TideKind::High, height_m: 1.80 },
/// ];
///
/// let snapshot = next_event(&events, now).unwrap();
/// assert_eq!(snapshot.minutes_to_next, 120);
/// assert_eq!(snapshot.current_height_m, 0.73);
/// ```
pub fn next_event<Tz: TimeZone>(
    events: &[TideEvent],
    now: DateTime<Tz>,
) -> Result<TideSnapshot, TideError> {
    let mut last: Option<(f64, i64)> = None;

    for event in events {
        let (delta_secs, minutes) = minutes_from(event, &now);
        if delta_secs <= 0.0 {
            last = Some((event.height_m, minutes));
            continue;
        }

        let next_min = minutes;
        let (last_height, fraction) = match last {
            None => (event.height_m, 1.0),
            Some((height, last_min)) => {
                let span = -last_min + next_min;
                if span == 0 {
                    (height, 1.0)
                } else {
                    (height, -last_min as f64 / span as f64)
                }
            }
        };

        let current_height_m = round2(last_height + (event.height_m - last_height) * fraction);

        return Ok(TideSnapshot {
            next_kind: event.kind,
            minutes_to_next: next_min,
            next_time: event.time,
            next_height_m: event.height_m,
            current_height_m,
            degree: to_degree(next_min, event.kind).round() as i64,
        });
    }

    Err(TideError::NoFutureEvent)
}
