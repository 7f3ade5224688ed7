//! Single-link splitting of raw quadtree groups.
//!
//! A raw group is partitioned into sub-clusters: a seed point starts a
//! sub-cluster, which absorbs every unassigned point within
//! `max_distance` of any member already absorbed, until nothing more
//! joins. The result is the set of connected components of the
//! "within distance" graph, so it does not depend on input order.
//!
//! Two strategies produce identical partitions:
//!
//! - **Pairwise**: compares every member against every unassigned point,
//!   O(n²) per group. Fine for the dozens of points a raw group usually has.
//! - **Indexed**: bulk-loads the group into an R-tree and only measures
//!   points inside a conservative lat/lon envelope around each member
//!   (envelope pruning, then exact distance filtering).

use crate::compute::geo_math::{DistanceMetric, distance_between, search_half_widths};
use geocluster_types::Poi;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

/// How raw groups are split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    Pairwise,
    Indexed,
    /// Pairwise for small groups, indexed above the configured threshold
    #[default]
    Auto,
}

type IndexedCoord = GeomWithData<[f64; 2], usize>;

/// Splits raw groups into distance-coherent sub-clusters.
#[derive(Debug, Clone, Copy)]
pub struct SingleLinkSplitter {
    pub max_distance: f64,
    pub metric: DistanceMetric,
    pub strategy: SplitStrategy,
    pub indexed_threshold: usize,
}

impl SingleLinkSplitter {
    pub fn new(max_distance: f64, metric: DistanceMetric) -> Self {
        Self {
            max_distance,
            metric,
            strategy: SplitStrategy::Pairwise,
            indexed_threshold: 0,
        }
    }

    pub fn with_strategy(mut self, strategy: SplitStrategy, indexed_threshold: usize) -> Self {
        self.strategy = strategy;
        self.indexed_threshold = indexed_threshold;
        self
    }

    /// Partition `group` into sub-clusters.
    ///
    /// Members of each sub-cluster keep their order from `group`. Groups of
    /// zero or one point are returned as they are.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster::compute::geo_math::DistanceMetric;
    /// use geocluster::compute::split::SingleLinkSplitter;
    /// use geocluster_types::Poi;
    ///
    /// // A chain: a-b and b-c are close, a-c is not
    /// let points = vec![
    ///     Poi::new("a", 37.5000, 127.0, ()),
    ///     Poi::new("b", 37.5008, 127.0, ()),
    ///     Poi::new("c", 37.5016, 127.0, ()),
    ///     Poi::new("far", 37.9000, 127.0, ()),
    /// ];
    /// let group: Vec<&Poi> = points.iter().collect();
    ///
    /// let parts = SingleLinkSplitter::new(100.0, DistanceMetric::Haversine).split(&group);
    /// assert_eq!(parts.len(), 2);
    /// assert_eq!(parts[0].len(), 3);
    /// ```
    pub fn split<'a, P>(&self, group: &[&'a Poi<P>]) -> Vec<Vec<&'a Poi<P>>> {
        if group.len() <= 1 {
            return if group.is_empty() {
                Vec::new()
            } else {
                vec![group.to_vec()]
            };
        }

        let use_index = match self.strategy {
            SplitStrategy::Pairwise => false,
            SplitStrategy::Indexed => true,
            SplitStrategy::Auto => group.len() > self.indexed_threshold,
        };

        if use_index {
            self.split_indexed(group)
        } else {
            self.split_pairwise(group)
        }
    }

    fn within<P>(&self, a: &Poi<P>, b: &Poi<P>) -> bool {
        distance_between(&a.location, &b.location, self.metric) <= self.max_distance
    }

    fn split_pairwise<'a, P>(&self, group: &[&'a Poi<P>]) -> Vec<Vec<&'a Poi<P>>> {
        let mut assigned = vec![false; group.len()];
        let mut clusters = Vec::new();

        for seed in 0..group.len() {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;

            let mut members = vec![seed];
            let mut cursor = 0;
            while cursor < members.len() {
                let current = group[members[cursor]];
                cursor += 1;

                for (candidate, poi) in group.iter().copied().enumerate() {
                    if !assigned[candidate] && self.within(current, poi) {
                        assigned[candidate] = true;
                        members.push(candidate);
                    }
                }
            }

            clusters.push(collect_members(group, members));
        }

        clusters
    }

    fn split_indexed<'a, P>(&self, group: &[&'a Poi<P>]) -> Vec<Vec<&'a Poi<P>>> {
        let tree = RTree::bulk_load(
            group
                .iter()
                .enumerate()
                .map(|(idx, poi)| IndexedCoord::new([poi.lon(), poi.lat()], idx))
                .collect(),
        );
        let margin = match self.metric {
            DistanceMetric::Haversine => 1.001,
            DistanceMetric::Geodesic => 1.01,
        };

        let mut assigned = vec![false; group.len()];
        let mut clusters = Vec::new();
        let mut candidates = Vec::new();

        for seed in 0..group.len() {
            if assigned[seed] {
                continue;
            }
            assigned[seed] = true;

            let mut members = vec![seed];
            let mut cursor = 0;
            while cursor < members.len() {
                let current = group[members[cursor]];
                cursor += 1;

                let (lat_half, lon_half) =
                    search_half_widths(&current.location, self.max_distance, margin);
                let (lon, lat) = (current.lon(), current.lat());

                candidates.clear();
                if lon - lon_half < -180.0 || lon + lon_half > 180.0 {
                    // Envelope wraps the antimeridian, scan everything
                    candidates.extend(0..group.len());
                } else {
                    let envelope = AABB::from_corners(
                        [lon - lon_half, lat - lat_half],
                        [lon + lon_half, lat + lat_half],
                    );
                    candidates.extend(tree.locate_in_envelope(&envelope).map(|item| item.data));
                }

                for &candidate in &candidates {
                    if !assigned[candidate] && self.within(current, group[candidate]) {
                        assigned[candidate] = true;
                        members.push(candidate);
                    }
                }
            }

            clusters.push(collect_members(group, members));
        }

        clusters
    }
}

fn collect_members<'a, P>(group: &[&'a Poi<P>], mut members: Vec<usize>) -> Vec<&'a Poi<P>> {
    members.sort_unstable();
    members.into_iter().map(|idx| group[idx]).collect()
}
