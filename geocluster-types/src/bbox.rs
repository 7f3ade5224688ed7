use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned latitude/longitude bounding box.
///
/// This is a wrapper around `geo::Rect` where `x` spans longitude and `y`
/// spans latitude. Containment and intersection are inclusive on every edge,
/// so a point lying exactly on a shared edge belongs to both neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl Boundary {
    /// Create a boundary from latitude and longitude limits in degrees.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster_types::Boundary;
    ///
    /// let seoul = Boundary::new(37.42, 37.70, 126.76, 127.18);
    /// assert!(seoul.width() > seoul.height());
    /// ```
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_lon, y: min_lat },
                geo::coord! { x: max_lon, y: max_lat },
            ),
        }
    }

    /// Smallest boundary holding every point, grown on each side by
    /// `ratio` of its extent per axis but never by less than `min_padding`
    /// degrees. Returns `None` for an empty iterator.
    ///
    /// The minimum padding keeps a set of identical coordinates from
    /// producing a zero-area box.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Point;
    /// use geocluster_types::Boundary;
    ///
    /// let points = [Point::new(127.0, 37.0), Point::new(128.0, 38.0)];
    /// let bounds = Boundary::around_points(points, 0.1, 1e-3).unwrap();
    /// assert!((bounds.min_lat() - 36.9).abs() < 1e-9);
    /// assert!((bounds.max_lon() - 128.1).abs() < 1e-9);
    /// ```
    pub fn around_points<I>(points: I, ratio: f64, min_padding: f64) -> Option<Self>
    where
        I: IntoIterator<Item = Point<f64>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;

        let (mut min_x, mut min_y) = (first.x(), first.y());
        let (mut max_x, mut max_y) = (min_x, min_y);
        for point in iter {
            min_x = min_x.min(point.x());
            min_y = min_y.min(point.y());
            max_x = max_x.max(point.x());
            max_y = max_y.max(point.y());
        }

        Some(Self::new(min_y, max_y, min_x, max_x).padded(ratio, min_padding))
    }

    /// Grow each side by `ratio` of the extent along its axis, or by
    /// `min_padding` degrees when that is larger.
    pub fn padded(&self, ratio: f64, min_padding: f64) -> Self {
        let pad_x = (self.width() * ratio).max(min_padding);
        let pad_y = (self.height() * ratio).max(min_padding);

        Self::new(
            self.min_lat() - pad_y,
            self.max_lat() + pad_y,
            self.min_lon() - pad_x,
            self.max_lon() + pad_x,
        )
    }

    /// Southern edge.
    pub fn min_lat(&self) -> f64 {
        self.rect.min().y
    }

    /// Northern edge.
    pub fn max_lat(&self) -> f64 {
        self.rect.max().y
    }

    /// Western edge.
    pub fn min_lon(&self) -> f64 {
        self.rect.min().x
    }

    /// Eastern edge.
    pub fn max_lon(&self) -> f64 {
        self.rect.max().x
    }

    /// Get the center point of the boundary.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_lon() + self.max_lon()) / 2.0,
            (self.min_lat() + self.max_lat()) / 2.0,
        )
    }

    /// Longitude extent in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon() - self.min_lon()
    }

    /// Latitude extent in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat() - self.min_lat()
    }

    /// True when every edge is a finite number.
    pub fn is_finite(&self) -> bool {
        self.min_lat().is_finite()
            && self.max_lat().is_finite()
            && self.min_lon().is_finite()
            && self.max_lon().is_finite()
    }

    /// Check if a point lies within this boundary, edges included.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.min_lon()
            && point.x() <= self.max_lon()
            && point.y() >= self.min_lat()
            && point.y() <= self.max_lat()
    }

    /// Check if this boundary intersects with another, touching edges included.
    pub fn intersects(&self, other: &Boundary) -> bool {
        !(self.max_lon() < other.min_lon()
            || self.min_lon() > other.max_lon()
            || self.max_lat() < other.min_lat()
            || self.min_lat() > other.max_lat())
    }

    /// Split at the lat/lon midpoint into `[NW, NE, SW, SE]`.
    ///
    /// The four quadrants exactly tile `self`; neighbours share their
    /// midline edges.
    pub fn quadrants(&self) -> [Boundary; 4] {
        let mid = self.center();
        let (mid_lon, mid_lat) = (mid.x(), mid.y());

        [
            Boundary::new(mid_lat, self.max_lat(), self.min_lon(), mid_lon),
            Boundary::new(mid_lat, self.max_lat(), mid_lon, self.max_lon()),
            Boundary::new(self.min_lat(), mid_lat, self.min_lon(), mid_lon),
            Boundary::new(self.min_lat(), mid_lat, mid_lon, self.max_lon()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let b = Boundary::new(0.0, 10.0, 0.0, 20.0);
        assert!(b.contains_point(&Point::new(0.0, 0.0)));
        assert!(b.contains_point(&Point::new(20.0, 10.0)));
        assert!(b.contains_point(&Point::new(10.0, 5.0)));
        assert!(!b.contains_point(&Point::new(20.0001, 5.0)));
        assert!(!b.contains_point(&Point::new(10.0, -0.0001)));
    }

    #[test]
    fn test_contains_rejects_nan() {
        let b = Boundary::new(0.0, 10.0, 0.0, 20.0);
        assert!(!b.contains_point(&Point::new(f64::NAN, 5.0)));
    }

    #[test]
    fn test_intersects() {
        let a = Boundary::new(0.0, 10.0, 0.0, 10.0);
        let touching = Boundary::new(10.0, 20.0, 10.0, 20.0);
        let overlapping = Boundary::new(5.0, 15.0, 5.0, 15.0);
        let apart = Boundary::new(11.0, 20.0, 0.0, 10.0);

        assert!(a.intersects(&touching));
        assert!(a.intersects(&overlapping));
        assert!(!a.intersects(&apart));
        assert!(!apart.intersects(&a));
    }

    #[test]
    fn test_quadrants_tile_parent() {
        let b = Boundary::new(0.0, 10.0, 100.0, 120.0);
        let [nw, ne, sw, se] = b.quadrants();

        assert_eq!(nw, Boundary::new(5.0, 10.0, 100.0, 110.0));
        assert_eq!(ne, Boundary::new(5.0, 10.0, 110.0, 120.0));
        assert_eq!(sw, Boundary::new(0.0, 5.0, 100.0, 110.0));
        assert_eq!(se, Boundary::new(0.0, 5.0, 110.0, 120.0));

        let area: f64 = b.quadrants().iter().map(|q| q.width() * q.height()).sum();
        assert!((area - b.width() * b.height()).abs() < 1e-9);
    }

    #[test]
    fn test_around_points_degenerate_uses_min_padding() {
        let points = vec![Point::new(127.0, 37.5); 5];
        let b = Boundary::around_points(points, 0.1, 1e-3).unwrap();

        assert!(b.width() > 0.0);
        assert!(b.height() > 0.0);
        assert!((b.width() - 2e-3).abs() < 1e-12);
        assert!(b.contains_point(&Point::new(127.0, 37.5)));
    }

    #[test]
    fn test_padded_grows_each_axis_separately() {
        let bounds = Boundary::new(10.0, 12.0, 20.0, 20.0).padded(0.25, 0.01);
        assert!((bounds.min_lat() - 9.5).abs() < 1e-12);
        assert!((bounds.max_lat() - 12.5).abs() < 1e-12);
        assert!((bounds.min_lon() - 19.99).abs() < 1e-12);
        assert!((bounds.max_lon() - 20.01).abs() < 1e-12);
    }

    #[test]
    fn test_around_points_empty() {
        assert!(Boundary::around_points(Vec::<Point>::new(), 0.1, 1e-3).is_none());
    }

    #[test]
    fn test_is_finite() {
        assert!(Boundary::new(0.0, 1.0, 0.0, 1.0).is_finite());
        assert!(!Boundary::new(0.0, f64::INFINITY, 0.0, 1.0).is_finite());
    }
}
