//! # Tide Sensor Core Library
//!
//! This library turns the Bureau of Meteorology (BOM) tide tables into a single
//! live sensor reading: the current water level, the next tide event and a
//! clock-face gauge angle.
//!
//! ## Design Philosophy
//!
//! ### Pure core, thin shell
//! - **Parsing, resolution and interpolation are synchronous**: [`tide_table`],
//!   [`geo`], [`interpolate`] and [`gauge`] take plain values and return plain
//!   values, so they are tested without a network or a timer
//! - **I/O lives at the edges**: [`tide_data`] fetches markup, [`sensor`] caches
//!   events and publishes readings, [`scheduler`] drives both on a timer
//!
//! ### Data Flow
//! 1. **Startup**: resolve the nearest station (or the configured override)
//! 2. **Nightly**: fetch a 3-day window (yesterday → +2 days) → parse → replace cache
//! 3. **Every poll**: cached events + "now" → interpolate → gauge degree → publish
//!
//! ## Core Types
//!
//! - [`TideKind`]: high or low water
//! - [`TideEvent`]: a single predicted extreme (time, kind, height)
//! - [`TideSnapshot`]: the point-in-time reading derived from a list of events

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// Module declarations
pub mod config;
pub mod error;
pub mod gauge;
pub mod geo;
pub mod interpolate;
pub mod renderer;
pub mod scheduler;
pub mod sensor;
pub mod stations;
pub mod tide_data;
pub mod tide_table;

pub use error::{GeoError, TideError};

/// The two kinds of tidal extreme reported by the tide table.
///
/// The BOM markup tags each time cell with `high-tide` or `low-tide`; those
/// tags are also what the sensor publishes in its `Next tide` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TideKind {
    #[serde(rename = "high-tide")]
    High,
    #[serde(rename = "low-tide")]
    Low,
}

impl TideKind {
    /// The class tag used by the tide table markup.
    pub fn tag(self) -> &'static str {
        match self {
            TideKind::High => "high-tide",
            TideKind::Low => "low-tide",
        }
    }
}

impl fmt::Display for TideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for TideKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high-tide" => Ok(TideKind::High),
            "low-tide" => Ok(TideKind::Low),
            _ => Err(()),
        }
    }
}

/// A single predicted high or low water.
///
/// Timestamps keep the UTC offset printed by the source so that the
/// `Tide time` attribute shows station-local time.
///
/// # Example
/// ```
/// use chrono::DateTime;
/// use tide_sensor_lib::{TideEvent, TideKind};
///
/// let event = TideEvent {
///     time: DateTime::parse_from_rfc3339("2024-06-16T04:12:00+10:00").unwrap(),
///     kind: TideKind::High,
///     height_m: 1.84,
/// };
///
/// assert_eq!(event.time_string(), "2024-06-16T04:12:00+10:00");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideEvent {
    /// Absolute time of the extreme, with the source's UTC offset
    pub time: DateTime<FixedOffset>,
    /// High or low water
    pub kind: TideKind,
    /// Predicted height in meters, rounded to 2 decimals
    pub height_m: f64,
}

impl TideEvent {
    /// ISO-8601 rendering used for display, e.g. `2024-06-16T04:12:00+10:00`.
    pub fn time_string(&self) -> String {
        self.time.to_rfc3339_opts(SecondsFormat::Secs, false)
    }
}

/// Point-in-time reading produced by [`interpolate::next_event`].
///
/// Never cached: a fresh snapshot is computed on every poll.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TideSnapshot {
    /// Kind of the next extreme
    pub next_kind: TideKind,
    /// Whole minutes until the next extreme
    pub minutes_to_next: i64,
    /// Absolute time of the next extreme
    pub next_time: DateTime<FixedOffset>,
    /// Height of the next extreme in meters
    pub next_height_m: f64,
    /// Linearly interpolated current height in meters (2 decimals)
    pub current_height_m: f64,
    /// Clock-face gauge angle, rounded, not wrapped into [0, 360)
    pub degree: i64,
}

/// Round to 2 decimal places, the precision of every published height.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place, the precision of published distances.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
