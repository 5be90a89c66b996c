//! # Refresh and Poll Scheduling
//!
//! Drives a [`TideSensor`] on two timers:
//! - a nightly refresh at a fixed local wall-clock time (default `00:00:05`)
//! - a poll every `poll_interval_secs`, first fired `startup_delay_secs` after start
//!
//! Both run on one task through `tokio::select!`, so a refresh and a poll never
//! overlap.

use crate::config::ScheduleConfig;
use crate::sensor::{SensorSink, TideSensor};
use crate::tide_data::TideSource;
use crate::TideError;
use chrono::{Local, NaiveDateTime, NaiveTime};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Parse a `HH:MM:SS` (or `HH:MM`) refresh time.
pub fn parse_refresh_time(s: &str) -> Result<NaiveTime, TideError> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|e| TideError::Config(format!("nightly_refresh {s:?}: {e}")))
}

/// Time from `now` until the next occurrence of `at`, in local wall-clock time.
///
/// An `at` equal to `now` is scheduled for the following day. Computed on
/// naive local times, so a DST change in between shifts the refresh by the
/// DST offset.
pub fn until_next(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let mut target = now.date().and_time(at);
    if target <= now {
        target += chrono::Duration::days(1);
    }
    (target - now).to_std().unwrap_or(Duration::ZERO)
}

/// Run the sensor until `shutdown` completes.
pub async fn run<S, K, F>(
    sensor: &TideSensor<S, K>,
    schedule: &ScheduleConfig,
    shutdown: F,
) -> Result<(), TideError>
where
    S: TideSource,
    K: SensorSink,
    F: Future<Output = ()>,
{
    let refresh_at = parse_refresh_time(&schedule.nightly_refresh)?;
    if schedule.poll_interval_secs == 0 {
        return Err(TideError::Config("poll_interval_secs must be > 0".to_string()));
    }

    let mut poll = tokio::time::interval_at(
        Instant::now() + schedule.startup_delay(),
        schedule.poll_interval(),
    );
    poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(
        station = sensor.station().station.id,
        poll_interval_secs = schedule.poll_interval_secs,
        nightly_refresh = %refresh_at,
        "Tide sensor scheduler starting"
    );

    tokio::pin!(shutdown);
    loop {
        let nightly = until_next(Local::now().naive_local(), refresh_at);
        debug!(secs = nightly.as_secs(), "Next nightly refresh");

        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Tide sensor scheduler shutting down");
                break;
            }

            _ = tokio::time::sleep(nightly) => {
                sensor.nightly_refresh(Local::now().date_naive()).await;
            }

            _ = poll.tick() => {
                sensor.poll_with_timeout(Local::now(), schedule.poll_timeout()).await;
            }
        }
    }

    Ok(())
}
