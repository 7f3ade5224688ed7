use geo::Point;
use serde::{Deserialize, Serialize};

/// A named point of interest (a mountain, a trailhead, a hut).
///
/// The `name` is the stable identity key used when reconciling annotations
/// between clustering passes. The payload is opaque to the engine and is
/// carried through to the output unchanged.
///
/// # Examples
///
/// ```
/// use geocluster_types::Poi;
///
/// let halla = Poi::new("Hallasan", 33.3617, 126.5292, 1947u32);
/// assert_eq!(halla.lat(), 33.3617);
/// assert_eq!(halla.lon(), 126.5292);
/// assert_eq!(halla.payload, 1947);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi<P = ()> {
    /// Stable identity of the point
    pub name: String,
    /// Location, `x` = longitude and `y` = latitude
    pub location: Point<f64>,
    /// Opaque attributes passed through clustering untouched
    pub payload: P,
}

impl<P> Poi<P> {
    /// Create a point of interest from latitude/longitude in degrees.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, payload: P) -> Self {
        Self {
            name: name.into(),
            location: Point::new(longitude, latitude),
            payload,
        }
    }

    /// Latitude in degrees.
    #[inline]
    pub fn lat(&self) -> f64 {
        self.location.y()
    }

    /// Longitude in degrees.
    #[inline]
    pub fn lon(&self) -> f64 {
        self.location.x()
    }

    /// Two points refer to the same displayed entity when their names match.
    #[inline]
    pub fn same_identity(&self, other: &Poi<P>) -> bool {
        self.name == other.name
    }
}
