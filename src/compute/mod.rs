//! Pure clustering algorithms.
//!
//! Nothing in this module holds state between calls:
//! - `geo_math`: great-circle distance and metric selection
//! - `validation`: coordinate checks applied at ingestion
//! - `quadtree`: the per-pass spatial index
//! - `split`: single-link splitting of raw quadtree groups

pub mod geo_math;
pub mod quadtree;
pub mod split;
pub mod validation;
