//! # Tide Sensor Application Entry Point
//!
//! This binary crate wires the library together: configuration, station
//! resolution, the BOM source, the state sink and the scheduler.
//! It supports both service mode (JSON lines on stdout, forever) and
//! development mode (`--stdout`: one reading drawn as an ASCII tide clock).

use anyhow::Context;
use std::{env, io};
use tide_sensor_lib::{
    config::Config,
    geo,
    renderer::draw_ascii,
    scheduler,
    sensor::{JsonLinesSink, TideSensor},
    stations::CATALOG,
    tide_data::BomSource,
};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command line options (`--stdout`, `--config <path>`).
struct Args {
    development_mode: bool,
    config_path: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let mut args = env::args().skip(1);
        let mut parsed = Args {
            development_mode: false,
            config_path: None,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--stdout" => parsed.development_mode = true,
                "--config" => parsed.config_path = args.next(),
                other => warn!(arg = other, "Ignoring unknown argument"),
            }
        }
        parsed
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the readings
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tide_sensor=info,tide_sensor_lib=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = match &args.config_path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    // Nearest station, unless the configuration names one
    let station = geo::resolve(
        config.reference(),
        CATALOG,
        config.sensor.tide_location.as_deref(),
    )
    .inspect_err(|e| error!(error = %e, "Location not supported or known"))?;
    info!(
        station = station.station.id,
        location = %station.location_label(),
        "Using tide station"
    );

    let source = BomSource::new(&config.source, &config.location.time_zone)
        .context("building HTTP client")?;

    let rt = tokio::runtime::Runtime::new()?;

    // Development mode: one reading, drawn as a tide clock
    if args.development_mode {
        let sensor = TideSensor::new(source, JsonLinesSink::new(io::sink()), station, &config.sensor);
        let reading = rt.block_on(async {
            sensor
                .poll_with_timeout(chrono::Local::now(), config.schedule.poll_timeout())
                .await
        });
        draw_ascii(&reading.unwrap_or_else(|| sensor.last_reading()));
        return Ok(());
    }

    let sensor = TideSensor::new(source, JsonLinesSink::stdout(), station, &config.sensor);
    if let Err(e) = sensor.publish_initial() {
        warn!(error = %e, "Could not publish initial state");
    }

    rt.block_on(scheduler::run(&sensor, &config.schedule, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Could not listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }))?;

    Ok(())
}
