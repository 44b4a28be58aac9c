// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # voxcity Core
//!
//! Ingestion of building meshes exported as triangle soups.
//!
//! ## Overview
//!
//! - **OBJ reading**: vertices, faces and groups from Wavefront OBJ text
//!   (number parsing with [fast-float](https://docs.rs/fast-float))
//! - **Mesh groups**: named triangle collections tagged with a [`SurfaceClass`]
//! - **Name semantics**: wall/floor/roof/window/door classification from
//!   exporter group names
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use voxcity_core::{parse_obj, assign_semantics_by_name};
//!
//! let mut mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\ng Wall\nf 1 2 3\n")?;
//! assign_semantics_by_name(&mut mesh.groups);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for mesh groups

pub mod error;
pub mod mesh;
pub mod obj;
pub mod semantics;

pub use error::{Error, Result};
pub use mesh::{BuildingMesh, Coord, MeshGroup, SurfaceClass, TriangleCoords};
pub use obj::{parse_obj, read_obj, DEFAULT_GROUP};
pub use semantics::{assign_semantics_by_name, classify_by_name};
