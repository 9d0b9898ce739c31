#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geographic (EPSG:4326) to planar (EPSG:27700) coordinate transforms.
//!
//! Density clustering needs Euclidean distances in meters, so incident
//! coordinates are reprojected onto the British National Grid (transverse
//! Mercator on the Airy 1830 ellipsoid) before clustering and back to
//! geographic coordinates for map rendering. The forward and inverse
//! transforms here follow the published Ordnance Survey series expansions;
//! a round trip reproduces the input to well under a centimeter.
//!
//! The WGS84 to OSGB36 datum shift is not applied: input coordinates are
//! projected as-is, so absolute grid references are offset from true
//! national-grid values by roughly 100 m. Clustering consumes only
//! relative distances, and map output keeps the original geographic
//! coordinates, so nothing downstream reads absolute grid references.

use geo::Point;
use hotspot_map_incident_models::Incident;

/// Airy 1830 semi-major axis (meters).
const A: f64 = 6_377_563.396;
/// Airy 1830 semi-minor axis (meters).
const B: f64 = 6_356_256.909;
/// Central meridian scale factor.
const F0: f64 = 0.999_601_271_7;
/// Latitude of natural origin (49°N), radians.
const LAT0: f64 = 49.0 * std::f64::consts::PI / 180.0;
/// Longitude of natural origin (2°W), radians.
const LON0: f64 = -2.0 * std::f64::consts::PI / 180.0;
/// False easting (meters).
const E0: f64 = 400_000.0;
/// False northing (meters).
const N0: f64 = -100_000.0;

/// A point on the planar grid, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarCoord {
    /// Distance east of the false origin.
    pub easting: f64,
    /// Distance north of the false origin.
    pub northing: f64,
}

impl PlanarCoord {
    /// Euclidean distance to another planar point, in meters.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.easting - other.easting).hypot(self.northing - other.northing)
    }
}

/// Eccentricity squared of the ellipsoid.
const fn e2() -> f64 {
    (A * A - B * B) / (A * A)
}

/// Meridional arc length from the natural origin to latitude `lat`.
fn meridional_arc(lat: f64) -> f64 {
    let n = (A - B) / (A + B);
    let n2 = n * n;
    let n3 = n2 * n;
    let dlat = lat - LAT0;
    let slat = lat + LAT0;

    B * F0
        * ((1.0 + n + 1.25 * n2 + 1.25 * n3) * dlat
            - (3.0 * n + 3.0 * n2 + 2.625 * n3) * dlat.sin() * slat.cos()
            + (1.875 * n2 + 1.875 * n3) * (2.0 * dlat).sin() * (2.0 * slat).cos()
            - (35.0 / 24.0) * n3 * (3.0 * dlat).sin() * (3.0 * slat).cos())
}

/// Projects a geographic point (degrees, x = longitude, y = latitude)
/// onto the planar grid.
#[must_use]
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn to_planar(point: Point<f64>) -> PlanarCoord {
    let lat = point.y().to_radians();
    let lng = point.x().to_radians();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let nu = A * F0 / (1.0 - e2() * sin_lat * sin_lat).sqrt();
    let rho = A * F0 * (1.0 - e2()) / (1.0 - e2() * sin_lat * sin_lat).powf(1.5);
    let eta2 = nu / rho - 1.0;

    let m = meridional_arc(lat);

    let i = m + N0;
    let ii = (nu / 2.0) * sin_lat * cos_lat;
    let iii = (nu / 24.0) * sin_lat * cos_lat.powi(3) * (5.0 - tan_lat.powi(2) + 9.0 * eta2);
    let iiia = (nu / 720.0)
        * sin_lat
        * cos_lat.powi(5)
        * (61.0 - 58.0 * tan_lat.powi(2) + tan_lat.powi(4));
    let iv = nu * cos_lat;
    let v = (nu / 6.0) * cos_lat.powi(3) * (nu / rho - tan_lat.powi(2));
    let vi = (nu / 120.0)
        * cos_lat.powi(5)
        * (5.0 - 18.0 * tan_lat.powi(2) + tan_lat.powi(4) + 14.0 * eta2
            - 58.0 * tan_lat.powi(2) * eta2);

    let dl = lng - LON0;

    PlanarCoord {
        easting: E0 + iv * dl + v * dl.powi(3) + vi * dl.powi(5),
        northing: i + ii * dl.powi(2) + iii * dl.powi(4) + iiia * dl.powi(6),
    }
}

/// Inverse of [`to_planar`]: planar grid back to geographic degrees.
#[must_use]
#[allow(clippy::many_single_char_names, clippy::similar_names)]
pub fn to_geographic(coord: PlanarCoord) -> Point<f64> {
    let de = coord.easting - E0;

    // Iterate the footpoint latitude until the meridional arc converges.
    let mut lat = (coord.northing - N0) / (A * F0) + LAT0;
    let mut m = meridional_arc(lat);
    while (coord.northing - N0 - m).abs() >= 1e-11 {
        lat += (coord.northing - N0 - m) / (A * F0);
        m = meridional_arc(lat);
    }

    let sin_lat = lat.sin();
    let tan_lat = lat.tan();

    let nu = A * F0 / (1.0 - e2() * sin_lat * sin_lat).sqrt();
    let rho = A * F0 * (1.0 - e2()) / (1.0 - e2() * sin_lat * sin_lat).powf(1.5);
    let eta2 = nu / rho - 1.0;

    let vii = tan_lat / (2.0 * rho * nu);
    let viii = tan_lat / (24.0 * rho * nu.powi(3))
        * (5.0 + 3.0 * tan_lat.powi(2) + eta2 - 9.0 * tan_lat.powi(2) * eta2);
    let ix = tan_lat / (720.0 * rho * nu.powi(5))
        * (61.0 + 90.0 * tan_lat.powi(2) + 45.0 * tan_lat.powi(4));

    let sec_lat = 1.0 / lat.cos();
    let x = sec_lat / nu;
    let xi = sec_lat / (6.0 * nu.powi(3)) * (nu / rho + 2.0 * tan_lat.powi(2));
    let xii = sec_lat / (120.0 * nu.powi(5))
        * (5.0 + 28.0 * tan_lat.powi(2) + 24.0 * tan_lat.powi(4));
    let xiia = sec_lat / (5040.0 * nu.powi(7))
        * (61.0 + 662.0 * tan_lat.powi(2) + 1320.0 * tan_lat.powi(4) + 720.0 * tan_lat.powi(6));

    let out_lat = lat - vii * de.powi(2) + viii * de.powi(4) - ix * de.powi(6);
    let out_lng =
        LON0 + x * de - xi * de.powi(3) + xii * de.powi(5) - xiia * de.powi(7);

    Point::new(out_lng.to_degrees(), out_lat.to_degrees())
}

/// Projects every incident onto the planar grid, preserving row order.
///
/// One output per input, position for position, so cluster labels computed
/// over the planar coordinates can be written straight back onto the
/// incidents by index.
#[must_use]
pub fn project_all(incidents: &[Incident]) -> Vec<PlanarCoord> {
    incidents
        .iter()
        .map(|incident| to_planar(geographic_point(incident)))
        .collect()
}

/// Builds a geographic [`Point`] for an incident.
#[must_use]
pub fn geographic_point(incident: &Incident) -> Point<f64> {
    Point::new(incident.lng, incident.lat)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn known_point_projects_onto_the_grid() {
        // The natural origin (2°W 49°N) lands exactly on the false origin.
        let origin = to_planar(Point::new(-2.0, 49.0));
        assert!((origin.easting - 400_000.0).abs() < 1e-6);
        assert!((origin.northing - -100_000.0).abs() < 1e-6);

        // Central London, sanity-checked against published OS grid values.
        let london = to_planar(Point::new(-0.1276, 51.5074));
        assert!((london.easting - 530_000.0).abs() < 1_000.0);
        assert!((london.northing - 180_000.0).abs() < 2_000.0);
    }

    #[test]
    fn round_trip_is_within_one_centimeter() {
        // A centimeter at these latitudes is ~1.5e-7 degrees.
        let cases = [
            (-0.1276, 51.5074),
            (-2.5879, 51.4545),
            (-4.2518, 55.8642),
            (-1.2577, 51.7520),
            (0.1218, 52.2053),
        ];

        for (lng, lat) in cases {
            let planar = to_planar(Point::new(lng, lat));
            let back = to_geographic(planar);
            assert!(
                (lng - back.x()).abs() < 1.5e-7,
                "lng drift {} at ({lng}, {lat})",
                (lng - back.x()).abs()
            );
            assert!(
                (lat - back.y()).abs() < 1.5e-7,
                "lat drift {} at ({lng}, {lat})",
                (lat - back.y()).abs()
            );
        }
    }

    #[test]
    fn planar_distances_are_metric() {
        // Two points ~1.11 km apart along a meridian (0.01° of latitude).
        let a = to_planar(Point::new(-0.1276, 51.50));
        let b = to_planar(Point::new(-0.1276, 51.51));
        let d = a.distance(&b);
        assert!((d - 1_112.0).abs() < 10.0, "distance was {d}");
    }

    #[test]
    fn project_all_preserves_row_order() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let incidents = vec![
            Incident::new("a".into(), date, 51.50, -0.12),
            Incident::new("b".into(), date, 51.51, -0.13),
            Incident::new("c".into(), date, 51.52, -0.14),
        ];

        let planar = project_all(&incidents);
        assert_eq!(planar.len(), incidents.len());
        for (incident, coord) in incidents.iter().zip(&planar) {
            let expected = to_planar(Point::new(incident.lng, incident.lat));
            assert_eq!(*coord, expected);
        }
    }
}
