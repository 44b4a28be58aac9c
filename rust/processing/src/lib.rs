// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Voxelization pipeline shared by the command line tool.
//!
//! [`process_file`] reads an OBJ building mesh, tags its groups, voxelizes
//! and classifies it, then writes CityJSON and optionally an OBJ of the
//! voxel cubes. [`process_batch`] runs several jobs and keeps going when one
//! of them fails.

pub mod cityjson;
pub mod cube;
pub mod error;
pub mod obj_export;
pub mod pipeline;

pub use cityjson::{to_cityjson, CityJson};
pub use error::{Error, Result};
pub use obj_export::{write_obj_to, write_voxel_obj, ObjExportOptions};
pub use pipeline::{
    process_batch, process_file, voxelize, Job, JobOutcome, JobReport, PipelineConfig, VoxelModel,
};
