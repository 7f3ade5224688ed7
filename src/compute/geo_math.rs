//! Distance helpers leveraging the geo crate.

use geo::{Distance, Geodesic, Haversine, Point};

/// Mean Earth radius in meters, the sphere used by the Haversine metric.
pub const MEAN_EARTH_RADIUS: f64 = 6_371_008.8;

/// Distance metrics for deciding whether two points are "near".
///
/// - **Haversine**: great-circle distance on a sphere, fast, the default
/// - **Geodesic**: ellipsoidal distance (Karney 2013), slower and slightly more accurate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Haversine,
    Geodesic,
}

/// Calculate the distance in meters between two lon/lat points.
///
/// # Examples
///
/// ```rust
/// use geo::Point;
/// use geocluster::compute::geo_math::{distance_between, DistanceMetric};
///
/// let seoul = Point::new(126.9780, 37.5665);
/// let busan = Point::new(129.0756, 35.1796);
///
/// let dist = distance_between(&seoul, &busan, DistanceMetric::Haversine);
/// assert!(dist > 320_000.0 && dist < 330_000.0);
/// ```
pub fn distance_between(point1: &Point, point2: &Point, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Haversine => Haversine.distance(*point1, *point2),
        DistanceMetric::Geodesic => Geodesic.distance(*point1, *point2),
    }
}

/// Half-widths in degrees `(lat, lon)` of a box around `center` that holds
/// every point within `distance_meters` of it.
///
/// The latitude bound follows from the meridian arc being the shortest path
/// for a given latitude difference. The longitude bound comes from the
/// haversine identity `hav(d) >= cos(lat1) * cos(lat2) * hav(dlon)` with
/// `cos(lat2)` bounded below over the reachable latitude band. When no bound
/// below a half turn exists (near the poles or for very long distances) the
/// longitude half-width is 180.
///
/// `margin` scales the distance up first so that ellipsoidal metrics, which
/// may exceed the spherical value slightly, stay inside the box.
pub fn search_half_widths(center: &Point, distance_meters: f64, margin: f64) -> (f64, f64) {
    let angular = (distance_meters * margin / MEAN_EARTH_RADIUS).max(0.0);
    if angular >= std::f64::consts::PI {
        return (180.0, 180.0);
    }

    let lat_half = angular.to_degrees();
    let lat = center.y().to_radians();
    let far_lat = (center.y().abs() + lat_half).min(90.0).to_radians();

    let denom = lat.cos() * far_lat.cos();
    let hav = (angular / 2.0).sin().powi(2);
    if denom <= f64::EPSILON || hav >= denom {
        return (lat_half, 180.0);
    }

    let lon_half = (2.0 * (hav / denom).sqrt().asin()).to_degrees();
    (lat_half, lon_half)
}
