//! # BOM Tide Data Fetching
//!
//! This module handles the network side of the sensor: building the BOM
//! tide-table print URL for a station and downloading the markup.
//!
//! ## Data Source
//!
//! ### Bureau of Meteorology tide predictions
//! - **URL**: `<base>/australia/tides/print.php?aac=<AAC>&type=tide&date=<DD-MM-YYYY>&tz=<zone>&days=3`
//! - **Window**: starts *yesterday* and covers 3 days, so at least one future
//!   extreme is present whatever time of day the refresh runs
//! - **Format**: HTML tables, parsed by [`crate::tide_table`]
//!
//! ## Error Handling
//!
//! - **Network timeouts**: the HTTP client carries a request timeout; expiry
//!   becomes [`TideError::Timeout`]
//! - **Server errors**: non-2xx responses become [`TideError::Status`]
//! - **Transport failures**: [`TideError::Http`]
//!
//! Callers keep their previous event list on any of these.

use crate::config::SourceConfig;
use crate::{tide_table, TideError, TideEvent};
use chrono::{Duration, NaiveDate};
use std::future::Future;

/// Public BOM site.
pub const DEFAULT_BASE_URL: &str = "http://www.bom.gov.au";

/// Anything that can deliver the raw tide table markup for a station.
///
/// Implemented by [`BomSource`] for the live site; tests substitute canned
/// markup.
pub trait TideSource {
    /// Fetch the tide table covering yesterday (relative to `today`) onwards.
    fn fetch_table(
        &self,
        station_id: &str,
        today: NaiveDate,
    ) -> impl Future<Output = Result<String, TideError>> + Send;

    /// Where [`TideSource::fetch_table`] reads from, for log fields.
    fn url_for(&self, station_id: &str, today: NaiveDate) -> String;
}

/// Build the print-page URL for a station.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_sensor_lib::tide_data::build_url;
///
/// let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let url = build_url("http://www.bom.gov.au", "NSW_TP007", today, "Australia/Sydney", 3);
/// assert_eq!(
///     url,
///     "http://www.bom.gov.au/australia/tides/print.php?aac=NSW_TP007&type=tide&date=29-02-2024&tz=Australia/Sydney&days=3"
/// );
/// ```
pub fn build_url(
    base_url: &str,
    station_id: &str,
    today: NaiveDate,
    time_zone: &str,
    days: u32,
) -> String {
    let yesterday = today - Duration::days(1);
    format!(
        "{}/australia/tides/print.php?aac={}&type=tide&date={}&tz={}&days={}",
        base_url.trim_end_matches('/'),
        station_id,
        yesterday.format("%d-%m-%Y"),
        time_zone,
        days
    )
}

/// HTTP client for the BOM tide-table print page.
#[derive(Clone, Debug)]
pub struct BomSource {
    client: reqwest::Client,
    base_url: String,
    time_zone: String,
    days: u32,
    timeout_secs: u64,
}

impl BomSource {
    /// Create a source with the configured base URL, window and timeout.
    pub fn new(config: &SourceConfig, time_zone: &str) -> Result<Self, TideError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tide-sensor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            time_zone: time_zone.to_string(),
            days: config.days,
            timeout_secs: config.timeout_secs,
        })
    }

    fn classify(&self, error: reqwest::Error) -> TideError {
        if error.is_timeout() {
            TideError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            TideError::Http(error)
        }
    }
}

impl TideSource for BomSource {
    async fn fetch_table(&self, station_id: &str, today: NaiveDate) -> Result<String, TideError> {
        let url = self.url_for(station_id, today);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TideError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response.text().await.map_err(|e| self.classify(e))
    }

    fn url_for(&self, station_id: &str, today: NaiveDate) -> String {
        build_url(&self.base_url, station_id, today, &self.time_zone, self.days)
    }
}

/// Fetch and parse a station's tide table.
pub async fn fetch_events<S: TideSource>(
    source: &S,
    station_id: &str,
    today: NaiveDate,
) -> Result<Vec<TideEvent>, TideError> {
    let markup = source.fetch_table(station_id, today).await?;
    tide_table::parse(&markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_url_uses_yesterday_across_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let url = build_url(DEFAULT_BASE_URL, "VIC_TP003", today, "Australia/Melbourne", 3);
        assert!(url.contains("aac=VIC_TP003"));
        assert!(url.contains("date=31-12-2024"));
        assert!(url.contains("tz=Australia/Melbourne"));
        assert!(url.ends_with("&days=3"));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let url = build_url("http://localhost:8080/", "WA_TP015", today, "Australia/Perth", 2);
        assert!(url.starts_with("http://localhost:8080/australia/tides/print.php?"));
        assert!(url.contains("date=15-06-2024"));
    }

    #[test]
    fn test_source_url_from_config() {
        let config = Config::default();
        let source = BomSource::new(&config.source, &config.location.time_zone).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        assert_eq!(
            source.url_for("NSW_TP007", today),
            "http://www.bom.gov.au/australia/tides/print.php?aac=NSW_TP007&type=tide&date=15-06-2024&tz=Australia/Sydney&days=3"
        );
    }

    struct CannedSource(&'static str);

    impl TideSource for CannedSource {
        async fn fetch_table(&self, _: &str, _: NaiveDate) -> Result<String, TideError> {
            Ok(self.0.to_string())
        }

        fn url_for(&self, station_id: &str, _: NaiveDate) -> String {
            format!("canned://{station_id}")
        }
    }

    #[tokio::test]
    async fn test_fetch_events_parses_markup() {
        let source = CannedSource(
            r#"<table><tr><td class="localtime high-tide" data-time-local="2024-06-16T05:20:00+10:00">x</td><td class="height high-tide">1.77 m</td></tr></table>"#,
        );
        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let events = fetch_events(&source, "NSW_TP007", today).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].height_m, 1.77);
    }

    #[tokio::test]
    async fn test_fetch_events_rejects_non_table_markup() {
        let source = CannedSource("<html><body>Bad gateway</body></html>");
        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let err = fetch_events(&source, "NSW_TP007", today).await.unwrap_err();
        assert!(matches!(err, TideError::Scrape(_)));
    }

    #[tokio::test]
    async fn test_slow_server_maps_to_timeout_error() {
        // Accepted by the kernel backlog, never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let source = BomSource {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_millis(100))
                .build()
                .unwrap(),
            base_url: format!("http://127.0.0.1:{port}"),
            time_zone: "Australia/Sydney".to_string(),
            days: 3,
            timeout_secs: 7,
        };

        let today = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let err = source.fetch_table("NSW_TP007", today).await.unwrap_err();
        assert!(matches!(err, TideError::Timeout { secs: 7 }), "got {err:?}");
        drop(listener);
    }

    #[test]
    fn test_url_for_through_trait() {
        fn logged_url<S: TideSource>(source: &S) -> String {
            source.url_for("QLD_TP011", NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        }
        let config = Config::default();
        let source = BomSource::new(&config.source, &config.location.time_zone).unwrap();
        assert!(logged_url(&source).contains("aac=QLD_TP011&type=tide&date=01-01-2024"));
    }
}
