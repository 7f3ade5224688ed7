//! Validation for point-of-interest coordinates.

use crate::error::{ClusterError, Result};
use geo::Point;
use geocluster_types::Poi;

/// Checks that a marker location can take part in distance and centroid
/// math: both coordinates finite, latitude within the poles and longitude
/// within one turn around the antimeridian (both bounds inclusive).
///
/// # Examples
///
/// ```
/// use geocluster::compute::validation::validate_location;
/// use geo::Point;
///
/// // Hallasan summit
/// assert!(validate_location(&Point::new(126.5292, 33.3617)).is_ok());
/// // Antimeridian and pole are still on the map
/// assert!(validate_location(&Point::new(-180.0, 90.0)).is_ok());
///
/// assert!(validate_location(&Point::new(f64::INFINITY, 33.0)).is_err());
/// assert!(validate_location(&Point::new(126.5, -91.0)).is_err());
/// ```
pub fn validate_location(point: &Point) -> Result<()> {
    let (lon, lat) = (point.x(), point.y());

    if !lon.is_finite() || !lat.is_finite() {
        return Err(ClusterError::InvalidInput(format!(
            "non-finite coordinate (lat {}, lon {})",
            lat, lon
        )));
    }

    if !(-90.0..=90.0).contains(&lat) {
        return Err(ClusterError::InvalidInput(format!(
            "latitude {} lies beyond a pole",
            lat
        )));
    }

    if !(-180.0..=180.0).contains(&lon) {
        return Err(ClusterError::InvalidInput(format!(
            "longitude {} lies outside [-180, 180]",
            lon
        )));
    }

    Ok(())
}

/// Validates a point of interest's location, naming it in the error.
pub fn validate_poi<P>(poi: &Poi<P>) -> Result<()> {
    validate_location(&poi.location)
        .map_err(|e| ClusterError::InvalidInput(format!("Point '{}': {}", poi.name, e)))
}

/// Keeps the points with usable coordinates and counts the rest.
///
/// Rejected points are logged and excluded; they never reach distance or
/// centroid math.
pub fn partition_valid<P>(points: &[Poi<P>]) -> (Vec<&Poi<P>>, usize) {
    let mut accepted = Vec::with_capacity(points.len());
    let mut rejected = 0;

    for poi in points {
        match validate_poi(poi) {
            Ok(()) => accepted.push(poi),
            Err(e) => {
                log::warn!("Excluding point from clustering: {}", e);
                rejected += 1;
            }
        }
    }

    (accepted, rejected)
}
