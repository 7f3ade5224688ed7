use crate::bbox::Boundary;
use serde::{Deserialize, Serialize};

/// The visible portion of the map and the camera altitude above it.
///
/// Altitude is the only input that drives clustering granularity; the
/// center and spans only decide which part of the index is queried.
///
/// # Examples
///
/// ```
/// use geocluster_types::Viewport;
///
/// let viewport = Viewport::new(37.5, 127.0, 0.5, 1.0, 30_000.0);
/// let region = viewport.region();
/// assert_eq!(region.min_lat(), 37.25);
/// assert_eq!(region.max_lon(), 127.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_latitude: f64,
    pub center_longitude: f64,
    /// Visible latitude extent in degrees
    pub latitude_span: f64,
    /// Visible longitude extent in degrees
    pub longitude_span: f64,
    /// Camera altitude in meters
    pub altitude_meters: f64,
}

impl Viewport {
    pub fn new(
        center_latitude: f64,
        center_longitude: f64,
        latitude_span: f64,
        longitude_span: f64,
        altitude_meters: f64,
    ) -> Self {
        Self {
            center_latitude,
            center_longitude,
            latitude_span,
            longitude_span,
            altitude_meters,
        }
    }

    /// The visible region: center plus or minus half of each span.
    pub fn region(&self) -> Boundary {
        let half_lat = self.latitude_span.abs() / 2.0;
        let half_lon = self.longitude_span.abs() / 2.0;
        Boundary::new(
            self.center_latitude - half_lat,
            self.center_latitude + half_lat,
            self.center_longitude - half_lon,
            self.center_longitude + half_lon,
        )
    }

    /// Same view with a different camera altitude.
    pub fn with_altitude(mut self, altitude_meters: f64) -> Self {
        self.altitude_meters = altitude_meters;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_normalizes_negative_spans() {
        let viewport = Viewport::new(10.0, 20.0, -2.0, -4.0, 1000.0);
        let region = viewport.region();
        assert_eq!(region.min_lat(), 9.0);
        assert_eq!(region.max_lat(), 11.0);
        assert_eq!(region.min_lon(), 18.0);
        assert_eq!(region.max_lon(), 22.0);
    }

    #[test]
    fn test_with_altitude_keeps_region() {
        let low = Viewport::new(10.0, 20.0, 2.0, 4.0, 1000.0);
        let high = low.with_altitude(500_000.0);
        assert_eq!(low.region(), high.region());
        assert_eq!(high.altitude_meters, 500_000.0);
    }
}
