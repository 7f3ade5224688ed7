//! Engine configuration.
//!
//! The altitude policy is data, not control flow: [`AltitudeBand`] rows map
//! camera altitude to quadtree depth and merge distance, and
//! [`Config::validate`] enforces that coarser views never split clusters
//! that finer views merged.
use crate::compute::geo_math::DistanceMetric;
use crate::compute::split::SplitStrategy;
use crate::error::{ClusterError, Result};
use serde::de::Error;

/// One row of the altitude policy table.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AltitudeBand {
    /// Lowest camera altitude in meters this band applies to
    pub min_altitude: f64,
    /// Quadtree depth at which whole subtrees are forced into one group
    pub max_depth: u32,
    /// Largest great-circle distance in meters at which two points merge
    pub max_cluster_distance: f64,
}

impl AltitudeBand {
    pub const fn new(min_altitude: f64, max_depth: u32, max_cluster_distance: f64) -> Self {
        Self {
            min_altitude,
            max_depth,
            max_cluster_distance,
        }
    }
}

/// Parameters derived from the altitude for one clustering pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParameters {
    pub max_depth: u32,
    pub max_cluster_distance: f64,
}

const DEFAULT_ALTITUDE_BANDS: [AltitudeBand; 8] = [
    AltitudeBand::new(0.0, 16, 25.0),
    AltitudeBand::new(10_000.0, 12, 50.0),
    AltitudeBand::new(25_000.0, 10, 100.0),
    AltitudeBand::new(75_000.0, 8, 1_000.0),
    AltitudeBand::new(150_000.0, 6, 5_000.0),
    AltitudeBand::new(300_000.0, 3, 20_000.0),
    AltitudeBand::new(500_000.0, 0, 60_000.0),
    AltitudeBand::new(1_500_000.0, 0, 150_000.0),
];

/// Clustering engine configuration
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Points a quadtree leaf holds before it subdivides
    #[serde(default = "Config::default_node_capacity")]
    pub node_capacity: usize,

    /// Depth past which leaves keep accepting points instead of subdividing
    #[serde(default = "Config::default_max_tree_depth")]
    pub max_tree_depth: u32,

    /// Fraction of the point extent added on each side of the root boundary
    #[serde(default = "Config::default_boundary_padding_ratio")]
    pub boundary_padding_ratio: f64,

    /// Lower bound in degrees for the root boundary padding
    #[serde(default = "Config::default_min_boundary_padding")]
    pub min_boundary_padding: f64,

    /// Centroid tolerance in degrees when matching cluster annotations
    #[serde(default = "Config::default_match_tolerance")]
    pub match_tolerance: f64,

    #[serde(default)]
    pub distance_metric: DistanceMetric,

    #[serde(default)]
    pub split_strategy: SplitStrategy,

    /// Raw group size above which `SplitStrategy::Auto` switches to the R-tree splitter
    #[serde(default = "Config::default_indexed_split_threshold")]
    pub indexed_split_threshold: usize,

    #[serde(default = "Config::default_altitude_bands")]
    pub altitude_bands: Vec<AltitudeBand>,
}

impl Config {
    const fn default_node_capacity() -> usize {
        2
    }

    const fn default_max_tree_depth() -> u32 {
        24
    }

    const fn default_boundary_padding_ratio() -> f64 {
        0.1
    }

    const fn default_min_boundary_padding() -> f64 {
        1e-3
    }

    const fn default_match_tolerance() -> f64 {
        1e-4
    }

    const fn default_indexed_split_threshold() -> usize {
        64
    }

    fn default_altitude_bands() -> Vec<AltitudeBand> {
        DEFAULT_ALTITUDE_BANDS.to_vec()
    }

    pub fn with_node_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Node capacity must be greater than zero");
        self.node_capacity = capacity;
        self
    }

    pub fn with_max_tree_depth(mut self, depth: u32) -> Self {
        if depth > 48 {
            log::warn!(
                "Max tree depth of {} approaches f64 precision for degree boxes; \
                deep nodes will have near-zero extent",
                depth
            );
        }
        self.max_tree_depth = depth;
        self
    }

    pub fn with_match_tolerance(mut self, tolerance: f64) -> Self {
        self.match_tolerance = tolerance;
        self
    }

    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    pub fn with_split_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.split_strategy = strategy;
        self
    }

    pub fn with_indexed_split_threshold(mut self, threshold: usize) -> Self {
        self.indexed_split_threshold = threshold;
        self
    }

    pub fn with_altitude_bands(mut self, bands: Vec<AltitudeBand>) -> Self {
        self.altitude_bands = bands;
        self
    }

    /// Look up depth and merge distance for a camera altitude.
    ///
    /// Uses the band with the greatest `min_altitude` not above `altitude`.
    /// Altitudes below the first band, and NaN, fall back to the first band.
    ///
    /// # Examples
    ///
    /// ```
    /// use geocluster::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.parameters_for(30_000.0).max_cluster_distance, 100.0);
    /// assert_eq!(config.parameters_for(600_000.0).max_cluster_distance, 60_000.0);
    /// ```
    pub fn parameters_for(&self, altitude: f64) -> ClusterParameters {
        let band = self
            .altitude_bands
            .iter()
            .rev()
            .find(|band| altitude >= band.min_altitude)
            .or_else(|| self.altitude_bands.first())
            .copied()
            .unwrap_or(DEFAULT_ALTITUDE_BANDS[0]);

        log::trace!(
            "Altitude {} selects band from {} (depth {}, distance {})",
            altitude,
            band.min_altitude,
            band.max_depth,
            band.max_cluster_distance
        );

        ClusterParameters {
            max_depth: band.max_depth,
            max_cluster_distance: band.max_cluster_distance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.node_capacity == 0 {
            return Err(invalid("Node capacity must be greater than zero"));
        }

        if !self.boundary_padding_ratio.is_finite() || self.boundary_padding_ratio < 0.0 {
            return Err(invalid("Boundary padding ratio must be finite and non-negative"));
        }

        if !self.min_boundary_padding.is_finite() || self.min_boundary_padding <= 0.0 {
            return Err(invalid("Minimum boundary padding must be finite and positive"));
        }

        if !self.match_tolerance.is_finite() || self.match_tolerance < 0.0 {
            return Err(invalid("Match tolerance must be finite and non-negative"));
        }

        if self.altitude_bands.is_empty() {
            return Err(invalid("Altitude policy needs at least one band"));
        }

        for band in &self.altitude_bands {
            if !band.min_altitude.is_finite() {
                return Err(invalid("Band altitude must be finite"));
            }
            if !band.max_cluster_distance.is_finite() || band.max_cluster_distance < 0.0 {
                return Err(ClusterError::InvalidConfig(format!(
                    "Band at {} m has invalid cluster distance {}",
                    band.min_altitude, band.max_cluster_distance
                )));
            }
        }

        for pair in self.altitude_bands.windows(2) {
            let (lower, higher) = (&pair[0], &pair[1]);
            if higher.min_altitude <= lower.min_altitude {
                return Err(ClusterError::InvalidConfig(format!(
                    "Band altitudes must be strictly increasing: {} then {}",
                    lower.min_altitude, higher.min_altitude
                )));
            }
            if higher.max_depth > lower.max_depth {
                return Err(ClusterError::InvalidConfig(format!(
                    "Max depth must not grow with altitude: {} at {} m, {} at {} m",
                    lower.max_depth, lower.min_altitude, higher.max_depth, higher.min_altitude
                )));
            }
            if higher.max_cluster_distance < lower.max_cluster_distance {
                return Err(ClusterError::InvalidConfig(format!(
                    "Cluster distance must not shrink with altitude: {} at {} m, {} at {} m",
                    lower.max_cluster_distance,
                    lower.min_altitude,
                    higher.max_cluster_distance,
                    higher.min_altitude
                )));
            }
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn invalid(msg: &str) -> ClusterError {
    ClusterError::InvalidConfig(msg.to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_capacity: Self::default_node_capacity(),
            max_tree_depth: Self::default_max_tree_depth(),
            boundary_padding_ratio: Self::default_boundary_padding_ratio(),
            min_boundary_padding: Self::default_min_boundary_padding(),
            match_tolerance: Self::default_match_tolerance(),
            distance_metric: DistanceMetric::default(),
            split_strategy: SplitStrategy::default(),
            indexed_split_threshold: Self::default_indexed_split_threshold(),
            altitude_bands: Self::default_altitude_bands(),
        }
    }
}
