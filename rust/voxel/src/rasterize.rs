// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh-to-grid rasterization
//!
//! Every cell is tested against the triangles of every mesh group, groups in
//! order. A cell is marked intersected by the first triangle whose bounds
//! overlap the cell and which passes the separating-axis test; the owning
//! group's semantics are copied onto the cell.
//!
//! Slabs of constant x are independent and processed in parallel with rayon.
//! Each worker writes only its own slab, so the result equals a sequential
//! x-major scan.

use crate::cell::{Semantics, VoxelLabel};
use crate::grid::VoxelGrid;
use rayon::prelude::*;
use voxcity_core::MeshGroup;
use voxcity_geometry::{Aabb, Triangle};

/// Rasterization switches
#[derive(Debug, Clone, Copy)]
pub struct RasterizeOptions {
    /// Count cells where a later group with different semantics also
    /// intersects. Costs an extra scan of later groups for every hit.
    pub detect_conflicts: bool,
}

impl Default for RasterizeOptions {
    fn default() -> Self {
        Self {
            detect_conflicts: true,
        }
    }
}

/// Counters gathered while rasterizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    pub groups: usize,
    pub triangles: usize,
    pub intersected: usize,
    /// Cells whose recorded semantics depend on group order
    pub conflicts: usize,
}

/// Rasterized grid with its counters
#[derive(Debug, Clone)]
pub struct Rasterization {
    pub grid: VoxelGrid,
    pub stats: RasterStats,
}

struct PreparedGroup {
    semantics: Semantics,
    bounds: Aabb,
    triangles: Vec<(Triangle, Aabb)>,
}

impl PreparedGroup {
    fn new(group: &MeshGroup) -> Option<Self> {
        let triangles: Vec<(Triangle, Aabb)> = group
            .triangles
            .iter()
            .map(|coords| {
                let tri = Triangle::from_coords(coords);
                let bounds = tri.aabb();
                (tri, bounds)
            })
            .collect();

        let (_, first) = triangles.first()?;
        let mut bounds = *first;
        for (_, b) in &triangles[1..] {
            bounds.expand(&b.min);
            bounds.expand(&b.max);
        }

        Some(Self {
            semantics: Semantics::from(group.class),
            bounds,
            triangles,
        })
    }

    fn intersects(&self, cell: &Aabb) -> bool {
        self.bounds.overlaps(cell)
            && self
                .triangles
                .iter()
                .any(|(tri, bounds)| bounds.overlaps(cell) && tri.intersects_aabb(cell))
    }
}

/// Rasterize with default options
pub fn rasterize(grid: &VoxelGrid, groups: &[MeshGroup]) -> VoxelGrid {
    rasterize_with(grid, groups, &RasterizeOptions::default()).grid
}

/// Rasterize mesh groups into a fresh grid with the layout of `grid`
///
/// Labels already present in `grid` are ignored.
pub fn rasterize_with(
    grid: &VoxelGrid,
    groups: &[MeshGroup],
    options: &RasterizeOptions,
) -> Rasterization {
    let prepared: Vec<PreparedGroup> = groups.iter().filter_map(PreparedGroup::new).collect();
    let triangles = prepared.iter().map(|g| g.triangles.len()).sum();

    tracing::info!(
        cells = grid.len(),
        groups = prepared.len(),
        triangles,
        "Rasterizing mesh"
    );

    let mut out = grid.empty_like();
    let [_, sy, sz] = out.shape();
    let slab = sy * sz;

    let (intersected, conflicts) = if slab == 0 {
        (0, 0)
    } else {
        out.cells_mut()
            .par_chunks_mut(slab)
            .enumerate()
            .map(|(x, cells)| {
                let mut hits = 0usize;
                let mut conflicts = 0usize;
                for (i, cell) in cells.iter_mut().enumerate() {
                    let bounds = grid.cell_bounds([x, i / sz, i % sz]);
                    let Some(first) = prepared.iter().position(|g| g.intersects(&bounds)) else {
                        continue;
                    };
                    let semantics = prepared[first].semantics;
                    cell.label = VoxelLabel::Intersected;
                    cell.semantics = semantics;
                    hits += 1;

                    if options.detect_conflicts
                        && prepared[first + 1..]
                            .iter()
                            .any(|g| g.semantics != semantics && g.intersects(&bounds))
                    {
                        conflicts += 1;
                    }
                }
                (hits, conflicts)
            })
            .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1))
    };

    if conflicts > 0 {
        tracing::warn!(
            conflicts,
            "Cells touched by groups with different semantics; the first group wins"
        );
    }
    tracing::debug!(intersected, "Rasterization complete");

    Rasterization {
        grid: out,
        stats: RasterStats {
            groups: prepared.len(),
            triangles,
            intersected,
            conflicts,
        },
    }
}
