// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # voxcity Voxel
//!
//! Volumetric room segmentation of building meshes.
//!
//! ## Stages
//!
//! 1. [`VoxelGrid::from_vertices`] sizes a padded grid around the mesh
//! 2. [`rasterize`] marks cells touched by triangles and records semantics
//! 3. [`classify_regions`] floods exterior space and numbers the rooms
//! 4. [`extract_surfaces`] tags intersected cells as facade or room surface
//!
//! ```rust,ignore
//! use voxcity_voxel::{classify_regions, extract_surfaces, rasterize, Connectivity, VoxelGrid};
//!
//! let grid = VoxelGrid::from_vertices(&mesh.vertices, 2, 0.5)?;
//! let grid = rasterize(&grid, &mesh.groups);
//! let conn = Connectivity::default();
//! let mut classified = classify_regions(&grid, &conn)?;
//! extract_surfaces(&mut classified.grid, &conn);
//! ```

pub mod cell;
pub mod classify;
pub mod connectivity;
pub mod error;
pub mod grid;
pub mod rasterize;
pub mod surface;

pub use cell::{CityObjectType, RoomId, Semantics, VoxelCell, VoxelLabel};
pub use classify::{classify_regions, Classification, RegionSummary};
pub use connectivity::Connectivity;
pub use error::{Error, Result};
pub use grid::{CellIndex, LabelCounts, VoxelGrid, MAX_CELLS};
pub use rasterize::{rasterize, rasterize_with, RasterStats, RasterizeOptions, Rasterization};
pub use surface::{extract_surfaces, SurfaceSummary};
