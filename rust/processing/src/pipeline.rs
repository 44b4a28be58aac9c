// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end voxelization: OBJ in, CityJSON (and optionally OBJ cubes) out.

use std::path::PathBuf;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use voxcity_core::{read_obj, BuildingMesh, Coord};
use voxcity_geometry::{assign_semantics, SemanticsSummary};
use voxcity_voxel::{
    classify_regions, extract_surfaces, rasterize_with, Connectivity, RasterStats,
    RasterizeOptions, RegionSummary, SurfaceSummary, VoxelGrid, MAX_CELLS,
};

use crate::cityjson::to_cityjson;
use crate::error::{Error, Result};
use crate::obj_export::{write_voxel_obj, ObjExportOptions};

/// Pipeline settings shared by every job of a batch.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Voxel edge length in model units.
    pub resolution: f64,
    /// Empty cells added on every side of the mesh bounds.
    pub padding: usize,
    /// Neighborhood for the flood fills and the surface extractor.
    pub connectivity: Connectivity,
    /// Count cells claimed by groups with different semantics.
    pub detect_conflicts: bool,
    /// Largest grid a single job may allocate, in cells.
    pub max_cells: usize,
    /// CityJSON metadata identifier.
    pub identifier: String,
    pub obj: ObjExportOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            resolution: 0.5,
            padding: 2,
            connectivity: Connectivity::default(),
            detect_conflicts: true,
            max_cells: MAX_CELLS,
            identifier: "voxcity".to_string(),
            obj: ObjExportOptions::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings that cannot produce a classification.
    pub fn validate(&self) -> Result<()> {
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::Config(format!(
                "resolution must be a positive number, got {}",
                self.resolution
            )));
        }
        if self.padding == 0 {
            return Err(Error::Config(
                "padding must be at least 1 cell so the grid corner lies outside the mesh".into(),
            ));
        }
        if self.max_cells == 0 {
            return Err(Error::Config("max_cells must be at least 1".into()));
        }
        Ok(())
    }
}

/// One input/output pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Optional voxel cube dump
    pub obj_output: Option<PathBuf>,
}

impl Job {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            obj_output: None,
        }
    }

    pub fn with_obj_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.obj_output = Some(path.into());
        self
    }
}

/// Classified grid plus the statistics of each stage.
#[derive(Debug, Clone)]
pub struct VoxelModel {
    pub grid: VoxelGrid,
    pub raster: RasterStats,
    pub regions: RegionSummary,
    pub surfaces: SurfaceSummary,
}

/// Per-job statistics, printed by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub groups: usize,
    pub triangles: usize,
    pub groups_named: usize,
    pub groups_by_orientation: usize,
    pub groups_untagged: usize,
    pub grid_shape: [usize; 3],
    pub intersected_cells: usize,
    pub exterior_cells: usize,
    pub interior_cells: usize,
    pub rooms: usize,
    pub facade_cells: usize,
    pub room_surface_cells: usize,
    pub unresolved_surface_cells: usize,
    pub semantic_conflicts: usize,
    pub elapsed_ms: u64,
}

/// Outcome of one job in a batch.
#[derive(Debug)]
pub struct JobOutcome {
    pub job: Job,
    pub result: Result<JobReport>,
}

/// Rasterize, classify and annotate a mesh whose groups are already tagged.
pub fn voxelize(mesh: &BuildingMesh, config: &PipelineConfig) -> Result<VoxelModel> {
    config.validate()?;
    if mesh.triangle_count() == 0 {
        return Err(voxcity_voxel::Error::EmptyMesh("mesh has no triangles".into()).into());
    }

    let vertices: Vec<Coord> = if mesh.vertices.is_empty() {
        mesh.groups.iter().flat_map(|g| g.points().copied()).collect()
    } else {
        mesh.vertices.clone()
    };

    let grid = VoxelGrid::from_vertices_with_limit(
        &vertices,
        config.padding,
        config.resolution,
        config.max_cells,
    )?;
    let [sx, sy, sz] = grid.shape();
    tracing::info!(
        size_x = sx,
        size_y = sy,
        size_z = sz,
        cells = grid.len(),
        resolution = config.resolution,
        "Created voxel grid"
    );

    let raster = rasterize_with(
        &grid,
        &mesh.groups,
        &RasterizeOptions {
            detect_conflicts: config.detect_conflicts,
        },
    );
    let mut classified = classify_regions(&raster.grid, &config.connectivity)?;
    let surfaces = extract_surfaces(&mut classified.grid, &config.connectivity);

    Ok(VoxelModel {
        grid: classified.grid,
        raster: raster.stats,
        regions: classified.summary,
        surfaces,
    })
}

/// Run the full pipeline for one job.
pub fn process_file(job: &Job, config: &PipelineConfig) -> Result<JobReport> {
    let start = Instant::now();
    tracing::info!(input = %job.input.display(), "Reading mesh");

    let mut mesh = read_obj(&job.input)?;
    if mesh.triangle_count() == 0 {
        return Err(voxcity_core::Error::EmptyMesh(job.input.display().to_string()).into());
    }
    let semantics: SemanticsSummary = assign_semantics(&mut mesh);
    tracing::info!(
        input = %job.input.display(),
        groups = mesh.groups.len(),
        triangles = mesh.triangle_count(),
        named = semantics.by_name,
        by_orientation = semantics.by_orientation,
        untagged = semantics.unresolved,
        "Tagged mesh groups"
    );

    let model = voxelize(&mesh, config)?;

    to_cityjson(&model.grid, &config.identifier).write(&job.output)?;
    tracing::info!(
        input = %job.input.display(),
        output = %job.output.display(),
        "Wrote CityJSON"
    );

    if let Some(obj_path) = &job.obj_output {
        let cubes = write_voxel_obj(&model.grid, obj_path, &config.obj)?;
        tracing::info!(
            input = %job.input.display(),
            output = %obj_path.display(),
            cubes,
            "Wrote voxel OBJ"
        );
    }

    let report = JobReport {
        input: job.input.clone(),
        output: job.output.clone(),
        groups: mesh.groups.len(),
        triangles: mesh.triangle_count(),
        groups_named: semantics.by_name,
        groups_by_orientation: semantics.by_orientation,
        groups_untagged: semantics.unresolved,
        grid_shape: model.grid.shape(),
        intersected_cells: model.regions.intersected_cells,
        exterior_cells: model.regions.exterior_cells,
        interior_cells: model.regions.interior_cells,
        rooms: model.regions.room_count(),
        facade_cells: model.surfaces.facade,
        room_surface_cells: model.surfaces.room_bounding,
        unresolved_surface_cells: model.surfaces.unresolved,
        semantic_conflicts: model.raster.conflicts,
        elapsed_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        input = %job.input.display(),
        rooms = report.rooms,
        elapsed_ms = report.elapsed_ms,
        "Job complete"
    );
    Ok(report)
}

/// Run every job; a failing job is reported and does not stop the others.
///
/// Outcomes are returned in input order.
pub fn process_batch(jobs: &[Job], config: &PipelineConfig) -> Vec<JobOutcome> {
    jobs.par_iter()
        .map(|job| {
            let span = tracing::info_span!("job", input = %job.input.display());
            let result = span.in_scope(|| process_file(job, config));
            if let Err(e) = &result {
                tracing::error!(input = %job.input.display(), error = %e, "Job failed");
            }
            JobOutcome {
                job: job.clone(),
                result,
            }
        })
        .collect()
}
