//! # geocluster-types
//!
//! Core data types for the geocluster marker-clustering engine.
//!
//! - **Points of interest**: [`Poi`], an identity-bearing coordinate with an opaque payload
//! - **Regions**: [`Boundary`], an axis-aligned lat/lon box, and [`Viewport`], the visible map camera
//! - **Output**: [`Annotation`], either a standalone marker or a cluster badge
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives. Coordinates follow the `geo` convention: `x` is
//! longitude and `y` is latitude, both in degrees.
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::{Boundary, Poi, Viewport};
//!
//! let peak = Poi::new("Bukhansan", 37.6586, 126.9770, ());
//! let viewport = Viewport::new(37.6, 127.0, 0.5, 0.5, 30_000.0);
//!
//! assert!(viewport.region().contains_point(&peak.location));
//! ```

pub mod annotation;
pub mod bbox;
pub mod poi;
pub mod viewport;

pub use annotation::Annotation;
pub use bbox::Boundary;
pub use poi::Poi;
pub use viewport::Viewport;
