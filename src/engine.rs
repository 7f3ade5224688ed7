//! Viewport-driven clustering pipeline.
//!
//! One call runs the whole pass: validate the input, build a quadtree over
//! every valid point, derive depth and merge distance from the camera
//! altitude, query the visible region and split each raw group with
//! single-link distance clustering. Nothing is cached between calls.

use crate::compute::quadtree::{IndexSettings, SpatialIndex};
use crate::compute::split::SingleLinkSplitter;
use crate::compute::validation::partition_valid;
use crate::config::{ClusterParameters, Config};
use crate::error::Result;
use geocluster_types::{Annotation, Poi, Viewport};

/// Counters describing one clustering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClusterStats {
    /// Points handed to the engine
    pub input_points: usize,
    /// Points excluded for non-finite or out-of-range coordinates
    pub rejected_points: usize,
    /// Points the quadtree could not place
    pub dropped_points: usize,
    /// Groups returned by the quadtree query
    pub raw_groups: usize,
    pub clusters: usize,
    pub singles: usize,
}

impl ClusterStats {
    /// Total annotations produced.
    pub fn annotations(&self) -> usize {
        self.clusters + self.singles
    }
}

/// Annotations plus the counters for the pass that produced them.
#[derive(Debug, Clone)]
pub struct ClusterOutput<P> {
    pub annotations: Vec<Annotation<P>>,
    pub stats: ClusterStats,
}

/// Groups points of interest into non-overlapping map annotations.
///
/// # Examples
///
/// ```
/// use geocluster::{ClusterEngine, Poi, Viewport};
///
/// let engine = ClusterEngine::new();
/// let points = vec![
///     Poi::new("Baegundae", 37.6586, 126.9780, ()),
///     Poi::new("Insubong", 37.6598, 126.9831, ()),
///     Poi::new("Dobongsan", 37.6987, 127.0154, ()),
/// ];
///
/// let near = Viewport::new(37.68, 127.0, 0.2, 0.2, 1_000.0);
/// assert_eq!(engine.cluster(&points, &near).len(), 3);
///
/// let far = near.with_altitude(2_000_000.0);
/// assert_eq!(engine.cluster(&points, &far).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    config: Config,
}

impl ClusterEngine {
    /// Engine with the default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Engine with a validated custom configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Depth cutoff and merge distance used at `altitude` meters.
    pub fn parameters_for(&self, altitude: f64) -> ClusterParameters {
        self.config.parameters_for(altitude)
    }

    /// Cluster `points` for display in `viewport`.
    ///
    /// Annotation order is unspecified.
    pub fn cluster<P: Clone>(&self, points: &[Poi<P>], viewport: &Viewport) -> Vec<Annotation<P>> {
        self.cluster_with_report(points, viewport).annotations
    }

    /// Like [`cluster`](Self::cluster), also reporting what happened.
    pub fn cluster_with_report<P: Clone>(
        &self,
        points: &[Poi<P>],
        viewport: &Viewport,
    ) -> ClusterOutput<P> {
        let mut stats = ClusterStats {
            input_points: points.len(),
            ..ClusterStats::default()
        };

        if points.is_empty() {
            return ClusterOutput {
                annotations: Vec::new(),
                stats,
            };
        }

        let (accepted, rejected) = partition_valid(points);
        stats.rejected_points = rejected;

        let region = viewport.region();
        if !region.is_finite() {
            log::warn!("Rejecting viewport with non-finite region: {:?}", viewport);
            return ClusterOutput {
                annotations: Vec::new(),
                stats,
            };
        }
        if !viewport.altitude_meters.is_finite() {
            log::warn!(
                "Viewport altitude {} is not finite, using the lowest altitude band",
                viewport.altitude_meters
            );
        }

        let index = SpatialIndex::build(&accepted, IndexSettings::from(&self.config));
        stats.dropped_points = index.dropped();

        let params = self.parameters_for(viewport.altitude_meters);
        let splitter = SingleLinkSplitter::new(params.max_cluster_distance, self.config.distance_metric)
            .with_strategy(
                self.config.split_strategy,
                self.config.indexed_split_threshold,
            );

        let raw_groups = index.query(&region, params.max_depth);
        stats.raw_groups = raw_groups.len();

        let mut annotations = Vec::with_capacity(raw_groups.len());
        for group in &raw_groups {
            for part in splitter.split(group) {
                let members: Vec<Poi<P>> = part.into_iter().cloned().collect();
                if let Some(annotation) = Annotation::from_group(members) {
                    if annotation.is_cluster() {
                        stats.clusters += 1;
                    } else {
                        stats.singles += 1;
                    }
                    annotations.push(annotation);
                }
            }
        }

        log::debug!(
            "Clustered {} points at {} m (depth {}, distance {} m): {} raw groups, {} clusters, {} singles, {} rejected, {} dropped",
            stats.input_points,
            viewport.altitude_meters,
            params.max_depth,
            params.max_cluster_distance,
            stats.raw_groups,
            stats.clusters,
            stats.singles,
            stats.rejected_points,
            stats.dropped_points
        );

        ClusterOutput { annotations, stats }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::split::SplitStrategy;
    use crate::config::AltitudeBand;

    fn scenario_points() -> Vec<Poi> {
        vec![
            Poi::new("p1", 37.50, 127.00, ()),
            Poi::new("p2", 37.5001, 127.0001, ()),
            Poi::new("p3", 37.80, 127.50, ()),
        ]
    }

    fn covering_viewport(altitude: f64) -> Viewport {
        Viewport::new(37.65, 127.25, 1.0, 1.0, altitude)
    }

    #[test]
    fn test_empty_input() {
        let engine = ClusterEngine::new();
        let out = engine.cluster_with_report::<()>(&[], &covering_viewport(30_000.0));
        assert!(out.annotations.is_empty());
        assert_eq!(out.stats, ClusterStats::default());
    }

    #[test]
    fn test_low_altitude_keeps_far_point_single() {
        let engine = ClusterEngine::new();
        let out = engine.cluster_with_report(&scenario_points(), &covering_viewport(30_000.0));

        assert_eq!(out.stats.clusters, 1);
        assert_eq!(out.stats.singles, 1);

        let cluster = out.annotations.iter().find(|a| a.is_cluster()).unwrap();
        let mut names: Vec<&str> = cluster.members().map(|p| p.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["p1", "p2"]);
        assert!((cluster.coordinate().y() - 37.50005).abs() < 1e-9);
        assert!((cluster.coordinate().x() - 127.00005).abs() < 1e-9);
    }

    #[test]
    fn test_high_altitude_merges_everything() {
        let engine = ClusterEngine::new();
        let out = engine.cluster_with_report(&scenario_points(), &covering_viewport(600_000.0));

        assert_eq!(out.annotations.len(), 1);
        assert_eq!(out.annotations[0].member_count(), 3);
        assert_eq!(out.stats.raw_groups, 1);
    }

    #[test]
    fn test_rejected_points_are_counted_and_excluded() {
        let mut points = scenario_points();
        points.push(Poi::new("nan", f64::NAN, 127.0, ()));
        points.push(Poi::new("inf", 37.0, f64::INFINITY, ()));
        points.push(Poi::new("range", 91.0, 127.0, ()));

        let engine = ClusterEngine::new();
        let out = engine.cluster_with_report(&points, &covering_viewport(30_000.0));

        assert_eq!(out.stats.input_points, 6);
        assert_eq!(out.stats.rejected_points, 3);
        let total: usize = out.annotations.iter().map(Annotation::member_count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_all_points_rejected() {
        let points = vec![Poi::new("nan", f64::NAN, f64::NAN, ())];
        let out = ClusterEngine::new().cluster_with_report(&points, &covering_viewport(1.0));
        assert!(out.annotations.is_empty());
        assert_eq!(out.stats.rejected_points, 1);
    }

    #[test]
    fn test_non_finite_viewport_yields_nothing() {
        let viewport = Viewport::new(f64::NAN, 127.0, 1.0, 1.0, 30_000.0);
        let out = ClusterEngine::new().cluster_with_report(&scenario_points(), &viewport);
        assert!(out.annotations.is_empty());
    }

    #[test]
    fn test_non_finite_altitude_uses_lowest_band() {
        let engine = ClusterEngine::new();
        let viewport = covering_viewport(f64::NAN);
        let annotations = engine.cluster(&scenario_points(), &viewport);
        // Lowest band merges within 25 m, so p1 and p2 still merge
        assert_eq!(annotations.len(), 2);
    }

    #[test]
    fn test_viewport_limits_output() {
        let engine = ClusterEngine::new();
        let points = vec![
            Poi::new("west", 10.0, 10.0, ()),
            Poi::new("west2", 10.1, 10.1, ()),
            Poi::new("east", 50.0, 50.0, ()),
            Poi::new("east2", 50.1, 50.1, ()),
        ];
        let viewport = Viewport::new(10.0, 10.0, 2.0, 2.0, 1_000.0);
        let annotations = engine.cluster(&points, &viewport);
        let names: Vec<&str> = annotations
            .iter()
            .flat_map(|a| a.members())
            .map(|p| p.name.as_str())
            .collect();

        assert!(names.contains(&"west") && names.contains(&"west2"));
        assert!(!names.contains(&"east") && !names.contains(&"east2"));
    }

    #[test]
    fn test_payload_passes_through() {
        let engine = ClusterEngine::new();
        let points = vec![
            Poi::new("a", 37.5, 127.0, vec![1u8, 2, 3]),
            Poi::new("b", 40.0, 130.0, vec![9u8]),
        ];
        let annotations = engine.cluster(&points, &Viewport::new(38.0, 128.0, 10.0, 10.0, 100.0));
        let mut payloads: Vec<Vec<u8>> = annotations
            .iter()
            .flat_map(|a| a.members())
            .map(|p| p.payload.clone())
            .collect();
        payloads.sort();
        assert_eq!(payloads, vec![vec![1, 2, 3], vec![9]]);
    }

    #[test]
    fn test_custom_config_is_validated() {
        let bad = Config::default().with_altitude_bands(vec![
            AltitudeBand::new(0.0, 2, 100.0),
            AltitudeBand::new(10.0, 4, 100.0),
        ]);
        assert!(ClusterEngine::with_config(bad).is_err());

        let good = Config::default().with_split_strategy(SplitStrategy::Indexed);
        let engine = ClusterEngine::with_config(good).unwrap();
        assert_eq!(engine.config().split_strategy, SplitStrategy::Indexed);
    }

    #[test]
    fn test_many_identical_points() {
        let points: Vec<Poi> = (0..50)
            .map(|i| Poi::new(format!("twin{}", i), 37.5, 127.0, ()))
            .collect();
        let engine = ClusterEngine::new();
        let out = engine.cluster_with_report(&points, &covering_viewport(1_000.0));

        assert_eq!(out.annotations.len(), 1);
        assert_eq!(out.annotations[0].member_count(), 50);
        assert_eq!(out.annotations[0].coordinate().y(), 37.5);
        assert_eq!(out.stats.dropped_points, 0);
    }
}
