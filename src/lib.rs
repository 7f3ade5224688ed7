//! Viewport-driven map marker clustering.
//!
//! Groups points of interest into visually non-overlapping annotations for
//! the current map view, and reconciles consecutive annotation sets into the
//! minimal add/remove delta a renderer needs.
//!
//! ## Pipeline
//! - **Quadtree**: built per pass over every valid point, padded around their extent
//! - **Altitude policy**: camera altitude selects a depth cutoff and a merge distance
//! - **Single-link split**: each raw quadtree group is split by great-circle distance
//! - **Reconciliation**: unchanged annotations are matched and left alone
//!
//! ```rust
//! use geocluster::{ClusterEngine, Poi, Viewport, reconcile};
//!
//! let engine = ClusterEngine::new();
//! let points = vec![
//!     Poi::new("p1", 37.50, 127.00, ()),
//!     Poi::new("p2", 37.5001, 127.0001, ()),
//!     Poi::new("p3", 37.80, 127.50, ()),
//! ];
//!
//! let view = Viewport::new(37.65, 127.25, 1.0, 1.0, 30_000.0);
//! let close = engine.cluster(&points, &view);
//! assert_eq!(close.len(), 2);
//!
//! let far = engine.cluster(&points, &view.with_altitude(600_000.0));
//! assert_eq!(far.len(), 1);
//!
//! let delta = reconcile::diff(&close, &far);
//! assert_eq!(delta.to_remove.len(), 2);
//! assert_eq!(delta.to_add.len(), 1);
//! ```

pub mod compute;
pub mod config;
pub mod engine;
pub mod error;
pub mod reconcile;
pub mod session;

#[cfg(feature = "geojson")]
pub mod geojson;

pub use config::{AltitudeBand, ClusterParameters, Config};
pub use engine::{ClusterEngine, ClusterOutput, ClusterStats};
pub use error::{ClusterError, Result};
pub use reconcile::{AnnotationDelta, AnnotationReconciler, annotations_match};
pub use session::ClusterSession;

pub use compute::geo_math::DistanceMetric;
pub use compute::quadtree::SpatialIndex;
pub use compute::split::SplitStrategy;
pub use compute::validation;

pub use geocluster_types::{Annotation, Boundary, Poi, Viewport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{ClusterEngine, ClusterError, ClusterSession, Config, Result};

    pub use crate::{Annotation, Boundary, Poi, Viewport};

    pub use crate::{AnnotationDelta, AnnotationReconciler};

    pub use crate::{AltitudeBand, DistanceMetric, SplitStrategy};
}
