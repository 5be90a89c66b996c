//! # Tide Sensor Orchestration
//!
//! Owns the cached list of tide events for one station and turns it into
//! published readings.
//!
//! ## Operations
//! - **Refresh** (nightly, or on first use): fetch + parse a 3-day window and
//!   replace the cached list in one swap. On failure the previous list stays.
//! - **Poll** (every few minutes): interpolate against the cached list and
//!   publish a [`SensorReading`] to the [`SensorSink`]. No reading is published
//!   when every cached event is in the past.
//!
//! The cached list sits behind `RwLock<Arc<Vec<_>>>`: a poll clones the `Arc`
//! and never sees a partially replaced list.

use crate::geo::ResolvedStation;
use crate::interpolate::next_event;
use crate::tide_data::{fetch_events, TideSource};
use crate::{config::SensorConfig, TideError, TideEvent, TideSnapshot};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Serialize, Serializer};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Unit published with every reading.
pub const UNIT: &str = "m";
/// Icon hint for dashboards.
pub const ICON: &str = "mdi:waves";

/// Primary sensor value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SensorState {
    /// No reading has been computed yet
    Unknown,
    /// Current water height in meters (2 decimals)
    Height(f64),
}

impl Serialize for SensorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SensorState::Unknown => serializer.serialize_str("Unknown"),
            SensorState::Height(h) => serializer.serialize_f64(*h),
        }
    }
}

/// Descriptive attributes published alongside the state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SensorAttributes {
    pub unit_of_measurement: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    pub icon: &'static str,
    /// `high-tide` or `low-tide`, empty before the first reading
    #[serde(rename = "Next tide")]
    pub next_tide: String,
    #[serde(rename = "Next height")]
    pub next_height: f64,
    /// ISO-8601 time of the next extreme
    #[serde(rename = "Tide time")]
    pub tide_time: String,
    #[serde(rename = "Time in min")]
    pub time_in_min: i64,
    /// Clock-face arm angle
    pub degree: i64,
    /// Station name with distance, e.g. `Sydney (Fort Denison) (3.1km)`
    pub location: String,
}

/// Everything the sink receives for one update.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SensorReading {
    pub entity_id: String,
    pub state: SensorState,
    pub attributes: SensorAttributes,
}

/// External collaborator that makes readings visible (home automation
/// bus, MQTT bridge, stdout...).
pub trait SensorSink {
    fn publish(&self, reading: &SensorReading) -> Result<(), TideError>;
}

/// Writes each reading as one JSON line.
pub struct JsonLinesSink<W: Write> {
    out: Mutex<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JsonLinesSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> SensorSink for JsonLinesSink<W> {
    fn publish(&self, reading: &SensorReading) -> Result<(), TideError> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *out, reading).map_err(|e| TideError::Sink(e.to_string()))?;
        writeln!(out).map_err(|e| TideError::Sink(e.to_string()))?;
        out.flush().map_err(|e| TideError::Sink(e.to_string()))
    }
}

/// Live tide sensor for one station.
pub struct TideSensor<S, K> {
    source: S,
    sink: K,
    station: ResolvedStation,
    entity_id: String,
    friendly_name: Option<String>,
    events: RwLock<Arc<Vec<TideEvent>>>,
    last: RwLock<SensorReading>,
}

impl<S: TideSource, K: SensorSink> TideSensor<S, K> {
    pub fn new(source: S, sink: K, station: ResolvedStation, config: &SensorConfig) -> Self {
        let initial = SensorReading {
            entity_id: config.entity_id.clone(),
            state: SensorState::Unknown,
            attributes: SensorAttributes {
                unit_of_measurement: UNIT,
                friendly_name: config.friendly_name.clone(),
                icon: ICON,
                next_tide: String::new(),
                next_height: 0.0,
                tide_time: String::new(),
                time_in_min: 0,
                degree: 0,
                location: station.location_label(),
            },
        };

        Self {
            source,
            sink,
            station,
            entity_id: config.entity_id.clone(),
            friendly_name: config.friendly_name.clone(),
            events: RwLock::new(Arc::new(Vec::new())),
            last: RwLock::new(initial),
        }
    }

    pub fn station(&self) -> &ResolvedStation {
        &self.station
    }

    /// The last published reading (the `Unknown` placeholder before the first).
    pub fn last_reading(&self) -> SensorReading {
        self.last
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Publish the `Unknown` placeholder so the entity exists before data arrives.
    pub fn publish_initial(&self) -> Result<(), TideError> {
        self.sink.publish(&self.last_reading())
    }

    /// Snapshot of the cached events.
    pub fn cached_events(&self) -> Arc<Vec<TideEvent>> {
        Arc::clone(&self.events.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Replace the cached events wholesale.
    pub fn replace_events(&self, events: Vec<TideEvent>) {
        *self.events.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(events);
    }

    /// Fetch and parse a fresh window; keep the previous list on failure.
    ///
    /// Returns the number of events now cached.
    pub async fn refresh(&self, today: NaiveDate) -> Result<usize, TideError> {
        let station_id = self.station.station.id;
        match fetch_events(&self.source, station_id, today).await {
            Ok(events) => {
                let count = events.len();
                self.replace_events(events);
                info!(station = station_id, events = count, "Tide data refreshed");
                Ok(count)
            }
            Err(e) => {
                warn!(
                    station = station_id,
                    url = %self.source.url_for(station_id, today),
                    error = %e,
                    kept = self.cached_events().len(),
                    "Error getting tide data, keeping previous events"
                );
                Err(e)
            }
        }
    }

    /// Nightly trigger: refresh, log, never fail.
    pub async fn nightly_refresh(&self, today: NaiveDate) {
        info!("Nightly refresh triggered");
        if self.refresh(today).await.is_err() {
            info!(
                cached = self.cached_events().len(),
                "Nightly refresh failed, serving previous events"
            );
        }
    }

    /// Compute and publish a reading for `now`.
    ///
    /// Refreshes first when the cache is empty.
    pub async fn poll(&self, now: DateTime<Local>) -> Result<SensorReading, TideError> {
        if self.cached_events().is_empty() {
            info!("No data, refresh triggered");
            self.refresh(now.date_naive()).await?;
        }

        let events = self.cached_events();
        let snapshot = next_event(&events, now)?;
        let reading = self.reading_for(&snapshot);

        self.sink.publish(&reading)?;
        debug!(
            height_m = snapshot.current_height_m,
            next = %snapshot.next_kind,
            minutes = snapshot.minutes_to_next,
            degree = snapshot.degree,
            "Published tide reading"
        );

        *self.last.write().unwrap_or_else(PoisonError::into_inner) = reading.clone();
        Ok(reading)
    }

    /// Poll bounded by `limit`; failures are logged and the reading skipped.
    pub async fn poll_with_timeout(
        &self,
        now: DateTime<Local>,
        limit: Duration,
    ) -> Option<SensorReading> {
        match tokio::time::timeout(limit, self.poll(now)).await {
            Ok(Ok(reading)) => Some(reading),
            Ok(Err(TideError::NoFutureEvent)) => {
                warn!(
                    cached = self.cached_events().len(),
                    "No future tide event cached, reading not updated"
                );
                None
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Tide poll failed, try later");
                None
            }
            Err(_) => {
                warn!(limit_secs = limit.as_secs(), "Refresh took too long. Try later.");
                None
            }
        }
    }

    fn reading_for(&self, snapshot: &TideSnapshot) -> SensorReading {
        SensorReading {
            entity_id: self.entity_id.clone(),
            state: SensorState::Height(snapshot.current_height_m),
            attributes: SensorAttributes {
                unit_of_measurement: UNIT,
                friendly_name: self.friendly_name.clone(),
                icon: ICON,
                next_tide: snapshot.next_kind.tag().to_string(),
                next_height: snapshot.next_height_m,
                tide_time: snapshot
                    .next_time
                    .to_rfc3339_opts(chrono::SecondsFormat::Secs, false),
                time_in_min: snapshot.minutes_to_next,
                degree: snapshot.degree,
                location: self.station.location_label(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geo::{ResolvedStation, Selection};
    use crate::stations;

    struct NoSource;

    impl TideSource for NoSource {
        async fn fetch_table(&self, _: &str, _: NaiveDate) -> Result<String, TideError> {
            Err(TideError::Timeout { secs: 30 })
        }

        fn url_for(&self, station_id: &str, _: NaiveDate) -> String {
            format!("none://{station_id}")
        }
    }

    /// Answers long after any reasonable poll limit.
    struct SlowSource;

    impl TideSource for SlowSource {
        async fn fetch_table(&self, _: &str, _: NaiveDate) -> Result<String, TideError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("<table></table>".to_string())
        }

        fn url_for(&self, station_id: &str, _: NaiveDate) -> String {
            format!("slow://{station_id}")
        }
    }

    /// Counts published readings.
    #[derive(Default)]
    struct CountingSink(Mutex<usize>);

    impl SensorSink for CountingSink {
        fn publish(&self, _: &SensorReading) -> Result<(), TideError> {
            *self.0.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn sample_events() -> Vec<TideEvent> {
        vec![TideEvent {
            time: chrono::DateTime::parse_from_rfc3339("2024-06-16T05:20:00+10:00").unwrap(),
            kind: crate::TideKind::High,
            height_m: 1.77,
        }]
    }

    fn station() -> ResolvedStation {
        ResolvedStation {
            station: *stations::find("NSW_TP007").unwrap(),
            distance_km: 3.1,
            selection: Selection::Nearest,
        }
    }

    #[test]
    fn test_unknown_state_serializes_as_text() {
        let config = Config::default();
        let sensor = TideSensor::new(
            NoSource,
            JsonLinesSink::new(Vec::new()),
            station(),
            &config.sensor,
        );
        sensor.publish_initial().unwrap();

        let out = String::from_utf8(sensor.sink.into_inner()).unwrap();
        let json: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(json["entity_id"], "sensor.tide");
        assert_eq!(json["state"], "Unknown");
        assert_eq!(json["attributes"]["unit_of_measurement"], "m");
        assert_eq!(json["attributes"]["icon"], "mdi:waves");
        assert_eq!(json["attributes"]["friendly_name"], "Next Tide");
        assert_eq!(json["attributes"]["Next tide"], "");
        assert_eq!(
            json["attributes"]["location"],
            "Sydney (Fort Denison) (3.1km)"
        );
    }

    #[test]
    fn test_height_state_serializes_as_number() {
        let json = serde_json::to_string(&SensorState::Height(0.73)).unwrap();
        assert_eq!(json, "0.73");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_events() {
        let config = Config::default();
        let sensor = TideSensor::new(
            NoSource,
            JsonLinesSink::new(Vec::new()),
            station(),
            &config.sensor,
        );
        let kept = sample_events();
        sensor.replace_events(kept.clone());

        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let err = sensor.refresh(today).await.unwrap_err();
        assert!(matches!(err, TideError::Timeout { .. }));
        assert_eq!(*sensor.cached_events(), kept);
    }

    #[tokio::test]
    async fn test_nightly_refresh_failure_keeps_previous_events() {
        let config = Config::default();
        let sensor = TideSensor::new(NoSource, CountingSink::default(), station(), &config.sensor);
        sensor.replace_events(sample_events());

        sensor
            .nightly_refresh(NaiveDate::from_ymd_opt(2024, 6, 17).unwrap())
            .await;
        assert_eq!(*sensor.cached_events(), sample_events());
        assert_eq!(*sensor.sink.0.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_slow_refresh_times_out_without_publishing() {
        let config = Config::default();
        let sensor = TideSensor::new(SlowSource, CountingSink::default(), station(), &config.sensor);

        let reading = sensor
            .poll_with_timeout(Local::now(), Duration::from_millis(50))
            .await;

        assert!(reading.is_none());
        assert_eq!(*sensor.sink.0.lock().unwrap(), 0);
        assert!(sensor.cached_events().is_empty());
        assert_eq!(sensor.last_reading().state, SensorState::Unknown);
    }

    #[tokio::test]
    async fn test_slow_refresh_leaves_cached_events_alone() {
        let config = Config::default();
        let sensor = TideSensor::new(SlowSource, CountingSink::default(), station(), &config.sensor);
        sensor.replace_events(sample_events());

        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let outcome = tokio::time::timeout(Duration::from_millis(50), sensor.refresh(today)).await;

        assert!(outcome.is_err());
        assert_eq!(*sensor.cached_events(), sample_events());
    }
}
