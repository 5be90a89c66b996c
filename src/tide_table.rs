//! # BOM Tide Table Parsing
//!
//! Extracts high/low tide events from the BOM tide-table print page.
//!
//! ## Markup
//!
//! The parser only relies on two cell shapes, wherever they appear in a row:
//! ```html
//! <tr>
//!   <th>High</th>
//!   <td class="localtime high-tide" data-time-local="2024-06-16T04:12:00+10:00">4:12 am</td>
//!   <td class="height high-tide">1.84 m</td>
//! </tr>
//! ```
//! - A `localtime` cell with exactly two classes opens a new event; its second
//!   class is the tide tag and `data-time-local` the ISO-8601 timestamp
//! - A `height` cell with exactly two classes supplies the height of the most
//!   recently opened event
//!
//! Everything else is ignored. Events are returned in document order, which
//! the source publishes chronologically.
//!
//! ## Malformed rows
//!
//! An event whose timestamp, tag or height cannot be read is dropped (logged
//! at debug level). Only a document with no table at all is an error.

use crate::{round2, TideError, TideEvent, TideKind};
use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Event record as read from the markup, before validation.
#[derive(Debug, Default)]
struct RawEvent {
    time: Option<String>,
    tag: String,
    height: Option<String>,
}

/// Parse a tide table into an ordered list of events.
///
/// # Errors
/// [`TideError::Scrape`] if the document contains no `<table>`.
///
/// # Example
/// ```
/// use tide_sensor_lib::{tide_table, TideKind};
///
/// let html = r#"<table><tr>
///   <td class="localtime low-tide" data-time-local="2024-06-16T10:30:00+10:00">10:30 am</td>
///   <td class="height low-tide">0.42 m</td>
/// </tr></table>"#;
///
/// let events = tide_table::parse(html).unwrap();
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].kind, TideKind::Low);
/// assert_eq!(events[0].height_m, 0.42);
/// ```
pub fn parse(markup: &str) -> Result<Vec<TideEvent>, TideError> {
    let doc = Html::parse_document(markup);

    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    if doc.select(&table_sel).next().is_none() {
        return Err(TideError::Scrape("no tide table in markup".to_string()));
    }

    let mut raw: Vec<RawEvent> = Vec::new();
    for row in doc.select(&row_sel) {
        for cell in row.select(&cell_sel) {
            let classes = classes(&cell);
            if classes.len() != 2 {
                continue;
            }
            match classes[0] {
                "localtime" => raw.push(RawEvent {
                    time: cell.value().attr("data-time-local").map(str::to_string),
                    tag: classes[1].to_string(),
                    height: None,
                }),
                "height" => match raw.last_mut() {
                    Some(open) if open.height.is_none() => {
                        open.height = Some(cell.text().collect());
                    }
                    Some(_) => {}
                    None => debug!("Height cell before any time cell, ignored"),
                },
                _ => {}
            }
        }
    }

    let total = raw.len();
    let events: Vec<TideEvent> = raw.into_iter().filter_map(validate).collect();
    if events.len() < total {
        debug!(
            dropped = total - events.len(),
            kept = events.len(),
            "Dropped incomplete tide rows"
        );
    }
    Ok(events)
}

fn selector(css: &str) -> Result<Selector, TideError> {
    Selector::parse(css).map_err(|e| TideError::Scrape(format!("selector {css}: {e}")))
}

/// Class list in document order (scraper's own class set is unordered).
fn classes<'a>(cell: &ElementRef<'a>) -> Vec<&'a str> {
    cell.value()
        .attr("class")
        .map(|c| c.split_whitespace().collect())
        .unwrap_or_default()
}

fn validate(raw: RawEvent) -> Option<TideEvent> {
    let Some(time) = raw.time.as_deref().and_then(parse_local_time) else {
        debug!(time = ?raw.time, "Unreadable tide time");
        return None;
    };
    let Ok(kind) = raw.tag.parse::<TideKind>() else {
        debug!(tag = %raw.tag, "Unknown tide tag");
        return None;
    };
    let Some(height_m) = raw.height.as_deref().and_then(parse_height) else {
        debug!(time = %time, height = ?raw.height, "Missing or unreadable tide height");
        return None;
    };
    Some(TideEvent {
        time,
        kind,
        height_m,
    })
}

/// Parse `data-time-local`, e.g. `2024-06-16T04:12:00+10:00` or `...+1000`.
pub fn parse_local_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

/// Parse a height cell such as `1.84 m` into meters (2 decimals).
pub fn parse_height(text: &str) -> Option<f64> {
    let text = text.trim();
    let number = text.strip_suffix('m').unwrap_or(text).trim();
    number
        .parse::<f64>()
        .ok()
        .filter(|h| h.is_finite())
        .map(round2)
}
