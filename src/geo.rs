//! # Nearest Station Resolution
//!
//! Great-circle distances from the configured home coordinate to every station
//! in the catalog, and selection of the closest one.
//!
//! Distances are rounded to 0.1 km before comparison, so two stations that
//! round to the same distance tie; ties go to the first station in catalog
//! order.

use crate::error::{GeoError, TideError};
use crate::round1;
use crate::stations::Station;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_M: f64 = 6_372_800.0;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// How the active station was chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Closest station to the reference point
    Nearest,
    /// `tide_location` set in the configuration
    Configured,
}

/// A station together with its distance from the reference point.
///
/// Only meaningful for the reference point it was computed against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ResolvedStation {
    pub station: Station,
    /// Great-circle distance in km, rounded to 0.1
    pub distance_km: f64,
    pub selection: Selection,
}

impl ResolvedStation {
    /// Label for the `location` attribute, e.g. `Sydney (Fort Denison) (4.2km)`.
    pub fn location_label(&self) -> String {
        format!("{} ({:.1}km)", self.station.name, self.distance_km)
    }
}

/// Haversine distance between two `(lat, lon)` pairs in degrees.
///
/// Returns kilometers rounded to 0.1. Fails on NaN or infinite input.
///
/// # Example
/// ```
/// use tide_sensor_lib::geo::haversine_km;
///
/// // Fort Denison to Botany Bay
/// let d = haversine_km((-33.85, 151.233333), (-33.966667, 151.216667)).unwrap();
/// assert!((12.0..14.0).contains(&d));
/// ```
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> Result<f64, GeoError> {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    for (lat, lon) in [from, to] {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(GeoError::InvalidCoordinate { lat, lon });
        }
    }

    let phi1 = lat1 * DEG_TO_RAD;
    let phi2 = lat2 * DEG_TO_RAD;
    let dphi = (lat2 - lat1) * DEG_TO_RAD;
    let dlambda = (lon2 - lon1) * DEG_TO_RAD;

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let meters = 2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt());

    Ok(round1(meters / 1000.0))
}

/// Distance used for ranking: a failed computation counts as 0 km.
fn ranking_distance(reference: (f64, f64), station: &Station) -> f64 {
    match haversine_km(reference, station.coords()) {
        Ok(distance) => distance,
        Err(e) => {
            warn!(station = station.id, error = %e, "Issue calculating the distance");
            0.0
        }
    }
}

/// Find the station closest to `reference`.
///
/// Returns `None` only for an empty catalog.
pub fn nearest(reference: (f64, f64), catalog: &[Station]) -> Option<ResolvedStation> {
    let mut best: Option<ResolvedStation> = None;

    for station in catalog {
        let distance_km = ranking_distance(reference, station);
        debug!(station = station.id, distance_km, "Station distance");

        // Strict comparison keeps the first station on ties
        if best.map_or(true, |b| distance_km < b.distance_km) {
            best = Some(ResolvedStation {
                station: *station,
                distance_km,
                selection: Selection::Nearest,
            });
        }
    }

    if let Some(found) = &best {
        info!(
            station = found.station.id,
            name = found.station.name,
            distance_km = found.distance_km,
            "Closest tide station"
        );
    }
    best
}

/// Resolve the active station: the configured override if any, else the nearest.
///
/// An override must name a catalog station. Its distance from `reference` is
/// still computed so the `location` attribute can show it.
pub fn resolve(
    reference: (f64, f64),
    catalog: &[Station],
    override_id: Option<&str>,
) -> Result<ResolvedStation, TideError> {
    match override_id {
        Some(id) => {
            let station = catalog
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| TideError::UnknownStation(id.to_string()))?;
            Ok(ResolvedStation {
                station: *station,
                distance_km: ranking_distance(reference, station),
                selection: Selection::Configured,
            })
        }
        None => nearest(reference, catalog)
            .ok_or_else(|| TideError::UnknownStation("<empty catalog>".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::{self, CATALOG};

    fn test_station(id: &'static str, latitude: f64, longitude: f64) -> Station {
        Station {
            id,
            latitude,
            longitude,
            name: id,
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        for s in CATALOG.iter().take(10) {
            assert_eq!(haversine_km(s.coords(), s.coords()).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            ((-33.85, 151.233333), (-42.883333, 147.333333)),
            ((-12.466667, 130.85), (-35.033333, 117.9)),
            ((0.0, 0.0), (0.0, 179.9)),
        ];
        for (a, b) in pairs {
            assert_eq!(haversine_km(a, b).unwrap(), haversine_km(b, a).unwrap());
        }
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 2πR / 360 with R = 6372.8 km
        let d = haversine_km((0.0, 0.0), (1.0, 0.0)).unwrap();
        assert_eq!(d, 111.2);
    }

    #[test]
    fn test_non_finite_coordinates_fail() {
        assert!(haversine_km((f64::NAN, 151.0), (-33.0, 151.0)).is_err());
        assert!(haversine_km((-33.0, 151.0), (-33.0, f64::INFINITY)).is_err());
    }

    #[test]
    fn test_nearest_on_catalog_entry_returns_it_with_zero_distance() {
        let hobart = stations::find("TAS_TP003").unwrap();
        let resolved = nearest(hobart.coords(), CATALOG).unwrap();
        assert_eq!(resolved.station.id, "TAS_TP003");
        assert_eq!(resolved.distance_km, 0.0);
        assert_eq!(resolved.selection, Selection::Nearest);
    }

    #[test]
    fn test_nearest_from_sydney_cbd() {
        let resolved = nearest((-33.8688, 151.2093), CATALOG).unwrap();
        assert_eq!(resolved.station.id, "NSW_TP007");
        assert!(resolved.distance_km < 5.0);
    }

    #[test]
    fn test_tie_keeps_first_in_catalog_order() {
        let catalog = [
            test_station("EAST", 0.0, 1.0),
            test_station("WEST", 0.0, -1.0),
        ];
        let resolved = nearest((0.0, 0.0), &catalog).unwrap();
        assert_eq!(resolved.station.id, "EAST");
    }

    #[test]
    fn test_malformed_station_degrades_to_zero_distance() {
        let catalog = [
            test_station("GOOD", -33.0, 151.0),
            test_station("BROKEN", f64::NAN, 151.0),
        ];
        let resolved = nearest((-30.0, 151.0), &catalog).unwrap();
        assert_eq!(resolved.station.id, "BROKEN");
        assert_eq!(resolved.distance_km, 0.0);
    }

    #[test]
    fn test_nearest_empty_catalog() {
        assert!(nearest((0.0, 0.0), &[]).is_none());
    }

    #[test]
    fn test_resolve_override() {
        let resolved = resolve((-33.8688, 151.2093), CATALOG, Some("NSW_TP001")).unwrap();
        assert_eq!(resolved.station.name, "Botany Bay");
        assert_eq!(resolved.selection, Selection::Configured);
        assert!(resolved.distance_km > 5.0);

        let err = resolve((-33.8688, 151.2093), CATALOG, Some("XX_TP001")).unwrap_err();
        assert!(matches!(err, TideError::UnknownStation(id) if id == "XX_TP001"));
    }

    #[test]
    fn test_location_label() {
        let resolved = ResolvedStation {
            station: *stations::find("NSW_TP007").unwrap(),
            distance_km: 4.0,
            selection: Selection::Nearest,
        };
        assert_eq!(resolved.location_label(), "Sydney (Fort Denison) (4.0km)");
    }
}
