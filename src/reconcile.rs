//! Minimal add/remove deltas between two annotation sets.
//!
//! Two annotations are the same displayed entity when:
//! - both are singles naming the same point, or
//! - both are clusters with equal member counts whose centroids differ by
//!   at most the tolerance (in degrees) on each axis.
//!
//! Matching never uses exact float equality; the tolerance is an explicit
//! parameter so callers and tests can see it.

use crate::config::Config;
use geo::Point;
use geocluster_types::Annotation;
use rustc_hash::{FxHashMap, FxHashSet};

/// Default centroid tolerance in degrees, roughly 11 m of latitude.
pub const DEFAULT_MATCH_TOLERANCE: f64 = 1e-4;

/// True when `a` and `b` represent the same displayed entity.
///
/// # Examples
///
/// ```
/// use geo::Point;
/// use geocluster::reconcile::annotations_match;
/// use geocluster::{Annotation, Poi};
///
/// let members = vec![Poi::new("a", 10.0, 20.0, ()), Poi::new("b", 10.0, 20.0, ())];
/// let old = Annotation::Cluster { centroid: Point::new(20.0, 10.0), members: members.clone() };
/// let new = Annotation::Cluster { centroid: Point::new(20.00001, 10.00001), members };
///
/// assert!(annotations_match(&old, &new, 1e-4));
/// assert!(!annotations_match(&old, &new, 1e-6));
/// ```
pub fn annotations_match<P>(a: &Annotation<P>, b: &Annotation<P>, tolerance: f64) -> bool {
    match (a, b) {
        (Annotation::Single(x), Annotation::Single(y)) => x.same_identity(y),
        (
            Annotation::Cluster {
                centroid: ca,
                members: ma,
            },
            Annotation::Cluster {
                centroid: cb,
                members: mb,
            },
        ) => ma.len() == mb.len() && centroids_close(ca, cb, tolerance),
        _ => false,
    }
}

fn centroids_close(a: &Point, b: &Point, tolerance: f64) -> bool {
    (a.x() - b.x()).abs() <= tolerance && (a.y() - b.y()).abs() <= tolerance
}

/// Annotations to take off the map and to put on it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDelta<P> {
    pub to_add: Vec<Annotation<P>>,
    pub to_remove: Vec<Annotation<P>>,
}

impl<P> AnnotationDelta<P> {
    /// True when nothing needs to change on screen.
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Number of additions plus removals.
    pub fn len(&self) -> usize {
        self.to_add.len() + self.to_remove.len()
    }
}

impl<P> Default for AnnotationDelta<P> {
    fn default() -> Self {
        Self {
            to_add: Vec::new(),
            to_remove: Vec::new(),
        }
    }
}

/// Lookup over one annotation set: singles by name, clusters bucketed by
/// member count.
struct MatchIndex<'a> {
    singles: FxHashSet<&'a str>,
    clusters: FxHashMap<usize, Vec<Point>>,
    tolerance: f64,
}

impl<'a> MatchIndex<'a> {
    fn new<P>(annotations: &'a [Annotation<P>], tolerance: f64) -> Self {
        let mut singles = FxHashSet::default();
        let mut clusters: FxHashMap<usize, Vec<Point>> = FxHashMap::default();

        for annotation in annotations {
            match annotation {
                Annotation::Single(poi) => {
                    singles.insert(poi.name.as_str());
                }
                Annotation::Cluster { centroid, members } => {
                    clusters.entry(members.len()).or_default().push(*centroid);
                }
            }
        }

        Self {
            singles,
            clusters,
            tolerance,
        }
    }

    fn contains<P>(&self, annotation: &Annotation<P>) -> bool {
        match annotation {
            Annotation::Single(poi) => self.singles.contains(poi.name.as_str()),
            Annotation::Cluster { centroid, members } => self
                .clusters
                .get(&members.len())
                .is_some_and(|candidates| {
                    candidates
                        .iter()
                        .any(|other| centroids_close(centroid, other, self.tolerance))
                }),
        }
    }
}

/// Computes add/remove deltas between consecutive annotation sets.
///
/// # Examples
///
/// ```
/// use geocluster::reconcile::AnnotationReconciler;
/// use geocluster::{Annotation, Poi};
///
/// let previous = vec![
///     Annotation::Single(Poi::new("Gwanaksan", 37.4449, 126.9640, ())),
///     Annotation::Single(Poi::new("Suraksan", 37.6980, 127.0800, ())),
/// ];
/// let next = vec![
///     Annotation::Single(Poi::new("Gwanaksan", 37.4449, 126.9640, ())),
///     Annotation::Single(Poi::new("Bukhansan", 37.6586, 126.9780, ())),
/// ];
///
/// let reconciler = AnnotationReconciler::new();
/// let delta = reconciler.diff(&previous, &next);
/// assert_eq!(delta.to_remove.len(), 1);
/// assert_eq!(delta.to_add.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationReconciler {
    tolerance: f64,
}

impl Default for AnnotationReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&Config> for AnnotationReconciler {
    fn from(config: &Config) -> Self {
        Self::with_tolerance(config.match_tolerance)
    }
}

impl AnnotationReconciler {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_MATCH_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Annotations of `previous` with no match in `next` are removed, those
    /// of `next` with no match in `previous` are added. Matched annotations
    /// appear in neither list.
    pub fn diff<P: Clone>(
        &self,
        previous: &[Annotation<P>],
        next: &[Annotation<P>],
    ) -> AnnotationDelta<P> {
        if next.is_empty() {
            return AnnotationDelta {
                to_add: Vec::new(),
                to_remove: previous.to_vec(),
            };
        }
        if previous.is_empty() {
            return AnnotationDelta {
                to_add: next.to_vec(),
                to_remove: Vec::new(),
            };
        }

        let next_index = MatchIndex::new(next, self.tolerance);
        let to_remove: Vec<Annotation<P>> = previous
            .iter()
            .filter(|annotation| !next_index.contains(*annotation))
            .cloned()
            .collect();

        let previous_index = MatchIndex::new(previous, self.tolerance);
        let to_add: Vec<Annotation<P>> = next
            .iter()
            .filter(|annotation| !previous_index.contains(*annotation))
            .cloned()
            .collect();

        log::debug!(
            "Reconciled {} -> {} annotations: {} to add, {} to remove",
            previous.len(),
            next.len(),
            to_add.len(),
            to_remove.len()
        );

        AnnotationDelta { to_add, to_remove }
    }

    /// Apply `delta` to `previous` the way a renderer does: take off one
    /// annotation equal to each entry of `to_remove`, then append `to_add`.
    ///
    /// Removal is by equality, not by tolerance, so a displayed neighbour
    /// that merely resembles a removed cluster stays on screen.
    pub fn apply<P: Clone + PartialEq>(
        &self,
        previous: &[Annotation<P>],
        delta: &AnnotationDelta<P>,
    ) -> Vec<Annotation<P>> {
        let mut pending: FxHashMap<usize, Vec<&Annotation<P>>> = FxHashMap::default();
        for annotation in &delta.to_remove {
            pending
                .entry(annotation.member_count())
                .or_default()
                .push(annotation);
        }

        let mut result = Vec::with_capacity(previous.len() + delta.to_add.len());
        for annotation in previous {
            let removed = pending
                .get_mut(&annotation.member_count())
                .and_then(|bucket| {
                    let pos = bucket.iter().position(|entry| *entry == annotation)?;
                    Some(bucket.swap_remove(pos))
                })
                .is_some();
            if !removed {
                result.push(annotation.clone());
            }
        }
        result.extend(delta.to_add.iter().cloned());
        result
    }

    /// Diff `displayed` against `next` and bring `displayed` up to date in
    /// place.
    ///
    /// Exactly the annotations reported in `to_remove` leave `displayed`;
    /// annotations matched in `next` keep their displayed version.
    pub fn reconcile<P: Clone>(
        &self,
        displayed: &mut Vec<Annotation<P>>,
        next: &[Annotation<P>],
    ) -> AnnotationDelta<P> {
        let delta = self.diff(displayed, next);
        if delta.is_empty() {
            return delta;
        }

        let next_index = MatchIndex::new(next, self.tolerance);
        displayed.retain(|annotation| next_index.contains(annotation));
        displayed.extend(delta.to_add.iter().cloned());
        delta
    }
}

/// [`AnnotationReconciler::diff`] with the default tolerance.
pub fn diff<P: Clone>(previous: &[Annotation<P>], next: &[Annotation<P>]) -> AnnotationDelta<P> {
    AnnotationReconciler::new().diff(previous, next)
}
