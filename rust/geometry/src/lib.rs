//! voxcity Geometry
//!
//! Geometric predicates for voxelizing building meshes, built on nalgebra:
//! bounding boxes, the separating-axis triangle/box overlap test, and
//! least-squares plane fitting for orientation-based surface tagging.

pub mod bounds;
pub mod error;
pub mod orientation;
pub mod plane;
pub mod triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use bounds::Aabb;
pub use error::{Error, Result};
pub use orientation::{assign_semantics, classify_by_orientation, SemanticsSummary};
pub use plane::{fit_plane, Plane};
pub use triangle::Triangle;
