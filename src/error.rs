//! Error types for the tide sensor.
//!
//! Every failure is contained at the operation boundary (resolve, refresh,
//! poll): callers log it and keep the last known good state.

use thiserror::Error;

/// Errors that can occur while resolving, fetching, parsing or publishing tides.
#[derive(Error, Debug)]
pub enum TideError {
    /// HTTP request failed (connection, TLS or protocol error)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// The request or the poll did not finish in time
    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The markup contained no tide table at all
    #[error("scrape failed: {0}")]
    Scrape(String),

    /// Every cached event is in the past
    #[error("no tide event after the current time")]
    NoFutureEvent,

    /// Configured station id is not in the catalog
    #[error("location not supported or known: {0}")]
    UnknownStation(String),

    /// Distance computation failed
    #[error(transparent)]
    Geo(#[from] GeoError),

    /// The state sink rejected a reading
    #[error("sink error: {0}")]
    Sink(String),

    /// Configuration could not be read or written
    #[error("config error: {0}")]
    Config(String),
}

/// Errors from great-circle distance computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// A coordinate was NaN or infinite
    #[error("invalid coordinate pair ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
}
