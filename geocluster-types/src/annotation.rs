use crate::poi::Poi;
use geo::{Centroid, MultiPoint, Point};
use serde::{Deserialize, Serialize};

/// One unit of map output: a standalone marker or a cluster badge.
///
/// A cluster always has at least two members; a group of one is emitted as
/// [`Annotation::Single`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation<P = ()> {
    /// A single point of interest drawn as its own marker
    Single(Poi<P>),
    /// Several nearby points drawn as one badge at their centroid
    Cluster {
        centroid: Point<f64>,
        members: Vec<Poi<P>>,
    },
}

impl<P> Annotation<P> {
    /// Build the annotation for a group of points.
    ///
    /// Returns `None` for an empty group, a `Single` for one member and a
    /// `Cluster` at the arithmetic-mean centroid otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster_types::{Annotation, Poi};
    ///
    /// let group = vec![
    ///     Poi::new("a", 10.0, 20.0, ()),
    ///     Poi::new("b", 12.0, 22.0, ()),
    /// ];
    /// let annotation = Annotation::from_group(group).unwrap();
    /// assert!(annotation.is_cluster());
    /// assert_eq!(annotation.coordinate().y(), 11.0);
    /// ```
    pub fn from_group(mut members: Vec<Poi<P>>) -> Option<Self> {
        match members.len() {
            0 => None,
            1 => members.pop().map(Annotation::Single),
            _ => {
                let centroid = centroid_of(&members)?;
                Some(Annotation::Cluster { centroid, members })
            }
        }
    }

    /// Where the annotation is drawn.
    pub fn coordinate(&self) -> Point<f64> {
        match self {
            Annotation::Single(poi) => poi.location,
            Annotation::Cluster { centroid, .. } => *centroid,
        }
    }

    /// Number of points represented (1 for a single marker).
    pub fn member_count(&self) -> usize {
        match self {
            Annotation::Single(_) => 1,
            Annotation::Cluster { members, .. } => members.len(),
        }
    }

    /// Iterate over the represented points.
    pub fn members(&self) -> impl Iterator<Item = &Poi<P>> {
        let slice = match self {
            Annotation::Single(poi) => std::slice::from_ref(poi),
            Annotation::Cluster { members, .. } => members.as_slice(),
        };
        slice.iter()
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, Annotation::Cluster { .. })
    }
}

/// Arithmetic mean of member coordinates, `None` when empty.
pub fn centroid_of<P>(members: &[Poi<P>]) -> Option<Point<f64>> {
    let multi: MultiPoint<f64> = members.iter().map(|poi| poi.location).collect();
    multi.centroid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_group_sizes() {
        assert!(Annotation::<()>::from_group(Vec::new()).is_none());

        let single = Annotation::from_group(vec![Poi::new("solo", 1.0, 2.0, ())]).unwrap();
        assert!(!single.is_cluster());
        assert_eq!(single.member_count(), 1);
        assert_eq!(single.coordinate(), Point::new(2.0, 1.0));

        let cluster = Annotation::from_group(vec![
            Poi::new("a", 0.0, 0.0, ()),
            Poi::new("b", 0.0, 3.0, ()),
            Poi::new("c", 3.0, 0.0, ()),
        ])
        .unwrap();
        assert!(cluster.is_cluster());
        assert_eq!(cluster.member_count(), 3);
        assert!((cluster.coordinate().x() - 1.0).abs() < 1e-12);
        assert!((cluster.coordinate().y() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_coordinates_centroid() {
        let members = vec![Poi::new("a", 5.5, 6.5, ()), Poi::new("b", 5.5, 6.5, ())];
        let centroid = centroid_of(&members).unwrap();
        assert_eq!(centroid, Point::new(6.5, 5.5));
    }

    #[test]
    fn test_members_iterates_all() {
        let cluster = Annotation::from_group(vec![
            Poi::new("a", 0.0, 0.0, ()),
            Poi::new("b", 1.0, 1.0, ()),
        ])
        .unwrap();
        let names: Vec<&str> = cluster.members().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
