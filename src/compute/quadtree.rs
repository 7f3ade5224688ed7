//! Per-pass quadtree over points of interest.
//!
//! The tree borrows the points it indexes and lives only for one clustering
//! pass: it is built from the full point set, queried once for the visible
//! region and dropped.
//!
//! ## Structure
//!
//! Every node owns a [`Boundary`]. A node is either a leaf holding up to
//! `node_capacity` points, or an internal node holding no points and exactly
//! four children (NW, NE, SW, SE) that tile its boundary. A leaf turns into
//! an internal node once, the first time it is asked to take a point past
//! capacity. Leaves at `max_tree_depth` never subdivide and keep accepting
//! points, which bounds the tree when many points share a coordinate.
//!
//! ## Queries
//!
//! [`SpatialIndex::query`] walks the subtrees that intersect the region:
//! a leaf emits its points as one group, an internal node at or past
//! `max_depth` emits its whole subtree as one group, and shallower internal
//! nodes recurse. The depth cutoff, not the raw tree depth, controls how
//! coarse the resulting groups are.

use crate::config::Config;
use geocluster_types::{Boundary, Poi};
use smallvec::SmallVec;

type Bucket<'a, P> = SmallVec<[&'a Poi<P>; 4]>;

/// Tree shape settings, usually taken from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexSettings {
    pub node_capacity: usize,
    pub max_tree_depth: u32,
    pub padding_ratio: f64,
    pub min_padding: f64,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for IndexSettings {
    fn from(config: &Config) -> Self {
        Self {
            node_capacity: config.node_capacity.max(1),
            max_tree_depth: config.max_tree_depth,
            padding_ratio: config.boundary_padding_ratio,
            min_padding: config.min_boundary_padding,
        }
    }
}

#[derive(Debug)]
struct QuadNode<'a, P> {
    boundary: Boundary,
    depth: u32,
    points: Bucket<'a, P>,
    children: Option<Box<[QuadNode<'a, P>; 4]>>,
}

impl<'a, P> QuadNode<'a, P> {
    fn new(boundary: Boundary, depth: u32) -> Self {
        Self {
            boundary,
            depth,
            points: SmallVec::new(),
            children: None,
        }
    }

    fn insert(&mut self, poi: &'a Poi<P>, settings: &IndexSettings, dropped: &mut usize) -> bool {
        if !self.boundary.contains_point(&poi.location) {
            return false;
        }

        if self.children.is_none() {
            if self.points.len() < settings.node_capacity || self.depth >= settings.max_tree_depth
            {
                self.points.push(poi);
                return true;
            }
            self.subdivide(settings, dropped);
        }

        match self.children.as_mut() {
            Some(children) => children
                .iter_mut()
                .any(|child| child.insert(poi, settings, dropped)),
            None => false,
        }
    }

    fn subdivide(&mut self, settings: &IndexSettings, dropped: &mut usize) {
        let depth = self.depth + 1;
        let mut children = Box::new(
            self.boundary
                .quadrants()
                .map(|quadrant| QuadNode::new(quadrant, depth)),
        );

        for poi in self.points.drain(..) {
            let placed = children
                .iter_mut()
                .any(|child| child.insert(poi, settings, dropped));
            if !placed {
                log::warn!(
                    "Dropping point '{}' at ({}, {}): no quadrant of its node contains it",
                    poi.name,
                    poi.lat(),
                    poi.lon()
                );
                *dropped += 1;
            }
        }

        self.children = Some(children);
    }

    fn query(&self, region: &Boundary, max_depth: u32, out: &mut Vec<Vec<&'a Poi<P>>>) {
        if !self.boundary.intersects(region) {
            return;
        }

        match &self.children {
            None => {
                if !self.points.is_empty() {
                    out.push(self.points.to_vec());
                }
            }
            Some(_) if self.depth >= max_depth => {
                let mut group = Vec::new();
                self.collect_into(&mut group);
                if !group.is_empty() {
                    out.push(group);
                }
            }
            Some(children) => {
                for child in children.iter() {
                    child.query(region, max_depth, out);
                }
            }
        }
    }

    fn collect_into(&self, out: &mut Vec<&'a Poi<P>>) {
        out.extend(self.points.iter().copied());
        if let Some(children) = &self.children {
            for child in children.iter() {
                child.collect_into(out);
            }
        }
    }

    fn height(&self) -> u32 {
        match &self.children {
            None => self.depth,
            Some(children) => children.iter().map(QuadNode::height).max().unwrap_or(self.depth),
        }
    }
}

/// Quadtree spatial index over borrowed points of interest.
///
/// # Examples
///
/// ```
/// use geocluster::compute::quadtree::{IndexSettings, SpatialIndex};
/// use geocluster_types::Poi;
///
/// let points = vec![
///     Poi::new("a", 37.50, 127.00, ()),
///     Poi::new("b", 37.51, 127.01, ()),
///     Poi::new("c", 37.80, 127.50, ()),
/// ];
/// let refs: Vec<&Poi> = points.iter().collect();
/// let index = SpatialIndex::build(&refs, IndexSettings::default());
///
/// let region = index.boundary().unwrap();
/// let groups = index.query(&region, 16);
/// assert_eq!(groups.iter().map(Vec::len).sum::<usize>(), 3);
///
/// // Depth 0 forces the whole tree into a single group
/// assert_eq!(index.query(&region, 0).len(), 1);
/// ```
#[derive(Debug)]
pub struct SpatialIndex<'a, P> {
    root: Option<QuadNode<'a, P>>,
    settings: IndexSettings,
    len: usize,
    dropped: usize,
}

impl<'a, P> SpatialIndex<'a, P> {
    /// Build an index over `points` inside their padded bounding box.
    ///
    /// An empty slice yields an index whose queries return no groups.
    pub fn build(points: &[&'a Poi<P>], settings: IndexSettings) -> Self {
        let root = Boundary::around_points(
            points.iter().map(|poi| poi.location),
            settings.padding_ratio,
            settings.min_padding,
        )
        .map(|boundary| QuadNode::new(boundary, 0));

        let mut index = Self {
            root,
            settings,
            len: 0,
            dropped: 0,
        };

        for &poi in points {
            if !index.insert(poi) {
                index.dropped += 1;
            }
        }

        index
    }

    /// Place a point in the deepest leaf whose boundary contains it.
    ///
    /// Returns `false` when no node can take the point; the point is then
    /// not part of the index.
    pub fn insert(&mut self, poi: &'a Poi<P>) -> bool {
        let Some(root) = self.root.as_mut() else {
            log::warn!("Cannot place point '{}' in an index without bounds", poi.name);
            return false;
        };

        let mut redistributed_drops = 0;
        let placed = root.insert(poi, &self.settings, &mut redistributed_drops);
        self.dropped += redistributed_drops;
        self.len -= redistributed_drops;

        if placed {
            self.len += 1;
        } else {
            log::warn!(
                "Point '{}' at ({}, {}) lies outside the index boundary",
                poi.name,
                poi.lat(),
                poi.lon()
            );
        }
        placed
    }

    /// Group the points under `region`, forcing every subtree rooted at
    /// `max_depth` or deeper into a single group.
    pub fn query(&self, region: &Boundary, max_depth: u32) -> Vec<Vec<&'a Poi<P>>> {
        let mut groups = Vec::new();
        if let Some(root) = &self.root {
            root.query(region, max_depth, &mut groups);
        }
        groups
    }

    /// Number of points held by the index.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Points that could not be placed while building or inserting.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Root boundary, `None` for an index built from no points.
    pub fn boundary(&self) -> Option<Boundary> {
        self.root.as_ref().map(|root| root.boundary)
    }

    /// Depth of the deepest node (0 for a lone root).
    pub fn depth(&self) -> u32 {
        self.root.as_ref().map_or(0, QuadNode::height)
    }
}
