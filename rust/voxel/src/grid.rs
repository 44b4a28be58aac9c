// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dense voxel grid
//!
//! Cells are stored in a flat vector, x-major then y then z:
//! `index = (x * size_y + y) * size_z + z`. The grid covers the mesh
//! bounding box plus `offset` padding cells on every side, so cell `(0, 0, 0)`
//! always lies in the margin.

use crate::cell::{RoomId, VoxelCell, VoxelLabel};
use crate::connectivity::Connectivity;
use crate::error::{Error, Result};
use nalgebra::Point3;
use smallvec::SmallVec;
use voxcity_core::Coord;
use voxcity_geometry::Aabb;

/// Integer cell coordinate
pub type CellIndex = [usize; 3];

/// Neighbor list sized for the 26-neighborhood
pub type NeighborList = SmallVec<[usize; 26]>;

/// Default cell budget for a single grid (about 1.5 GiB of cells)
pub const MAX_CELLS: usize = 1 << 27;

/// Cell count of a padded grid, rejecting overflow and oversized grids
fn checked_len(extent: [usize; 3], offset: usize, max_cells: usize) -> Result<usize> {
    let too_large = || Error::GridTooLarge {
        shape: extent.map(|n| n as f64 + 2.0 * offset as f64),
        max_cells,
    };
    let pad = offset.checked_mul(2).ok_or_else(too_large)?;
    let mut len = 1usize;
    for n in extent {
        let side = n.checked_add(pad).ok_or_else(too_large)?;
        len = len.checked_mul(side).ok_or_else(too_large)?;
    }
    if len > max_cells {
        return Err(too_large());
    }
    Ok(len)
}

/// Number of cells per label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelCounts {
    pub unlabeled: usize,
    pub intersected: usize,
    pub exterior: usize,
    pub interior: usize,
}

impl LabelCounts {
    pub fn total(&self) -> usize {
        self.unlabeled + self.intersected + self.exterior + self.interior
    }
}

/// Axis-aligned voxel grid with an explicit world mapping
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    cells: Vec<VoxelCell>,
    /// Cells covering the mesh bounding box, per axis
    extent: [usize; 3],
    /// Padding cells on each side
    offset: usize,
    resolution: f64,
    /// World position of the mesh bounding-box minimum
    origin: Point3<f64>,
}

impl VoxelGrid {
    /// Create an all-unlabeled grid with explicit extents
    ///
    /// Grids above [`MAX_CELLS`] are rejected; see [`VoxelGrid::new_with_limit`].
    pub fn new(
        extent: [usize; 3],
        offset: usize,
        resolution: f64,
        origin: Point3<f64>,
    ) -> Result<Self> {
        Self::new_with_limit(extent, offset, resolution, origin, MAX_CELLS)
    }

    /// Create an all-unlabeled grid holding at most `max_cells` cells
    pub fn new_with_limit(
        extent: [usize; 3],
        offset: usize,
        resolution: f64,
        origin: Point3<f64>,
        max_cells: usize,
    ) -> Result<Self> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(Error::InvalidResolution(resolution));
        }
        if !origin.coords.iter().all(|c| c.is_finite()) {
            return Err(Error::InvalidOrigin([origin.x, origin.y, origin.z]));
        }
        let len = checked_len(extent, offset, max_cells)?;
        Ok(Self {
            cells: vec![VoxelCell::default(); len],
            extent,
            offset,
            resolution,
            origin,
        })
    }

    /// Size a grid around a vertex set
    ///
    /// Each axis gets `ceil((max - min) / resolution)` cells, at least one,
    /// plus `padding` cells on both sides.
    pub fn from_vertices(vertices: &[Coord], padding: usize, resolution: f64) -> Result<Self> {
        Self::from_vertices_with_limit(vertices, padding, resolution, MAX_CELLS)
    }

    /// [`VoxelGrid::from_vertices`] with an explicit cell budget
    pub fn from_vertices_with_limit(
        vertices: &[Coord],
        padding: usize,
        resolution: f64,
        max_cells: usize,
    ) -> Result<Self> {
        if vertices.is_empty() {
            return Err(Error::EmptyMesh("no vertices to bound".into()));
        }
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(Error::InvalidResolution(resolution));
        }

        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for (index, v) in vertices.iter().enumerate() {
            if !v.iter().all(|c| c.is_finite()) {
                return Err(Error::NonFiniteCoordinate { index });
            }
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }

        let cells_per_axis: [f64; 3] =
            std::array::from_fn(|axis| ((max[axis] - min[axis]) / resolution).ceil().max(1.0));
        // must hold before casting: `as usize` saturates
        if cells_per_axis.iter().any(|&n| !(n <= max_cells as f64)) {
            return Err(Error::GridTooLarge {
                shape: cells_per_axis.map(|n| n + 2.0 * padding as f64),
                max_cells,
            });
        }
        let extent = cells_per_axis.map(|n| n as usize);

        tracing::debug!(
            extent = ?extent,
            padding,
            resolution,
            "Sized voxel grid around {} vertices",
            vertices.len()
        );

        Self::new_with_limit(
            extent,
            padding,
            resolution,
            Point3::new(min[0], min[1], min[2]),
            max_cells,
        )
    }

    /// Fresh all-unlabeled grid with the same layout
    pub fn empty_like(&self) -> Self {
        Self {
            cells: vec![VoxelCell::default(); self.cells.len()],
            extent: self.extent,
            offset: self.offset,
            resolution: self.resolution,
            origin: self.origin,
        }
    }

    /// Cells covering the mesh bounding box, without padding
    #[inline]
    pub fn extent(&self) -> [usize; 3] {
        self.extent
    }

    /// Total cells per axis, padding included
    #[inline]
    pub fn shape(&self) -> [usize; 3] {
        self.extent.map(|n| n + 2 * self.offset)
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// World position of the corner of cell `(0, 0, 0)`
    #[inline]
    pub fn offset_origin(&self) -> Point3<f64> {
        let pad = self.offset as f64 * self.resolution;
        Point3::new(self.origin.x - pad, self.origin.y - pad, self.origin.z - pad)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index of a cell
    ///
    /// # Panics
    /// If any coordinate is outside the grid shape.
    #[inline]
    pub fn flat_index(&self, [x, y, z]: CellIndex) -> usize {
        let [sx, sy, sz] = self.shape();
        assert!(
            x < sx && y < sy && z < sz,
            "voxel index ({x}, {y}, {z}) out of bounds for grid {sx}x{sy}x{sz}"
        );
        (x * sy + y) * sz + z
    }

    /// Cell coordinate of a flat index
    ///
    /// # Panics
    /// If `index >= len()`.
    #[inline]
    pub fn cell_index(&self, index: usize) -> CellIndex {
        assert!(
            index < self.cells.len(),
            "flat voxel index {index} out of bounds for {} cells",
            self.cells.len()
        );
        let [_, sy, sz] = self.shape();
        [index / (sy * sz), (index / sz) % sy, index % sz]
    }

    /// # Panics
    /// If the index is out of bounds.
    #[inline]
    pub fn get(&self, index: CellIndex) -> &VoxelCell {
        &self.cells[self.flat_index(index)]
    }

    /// # Panics
    /// If the index is out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: CellIndex) -> &mut VoxelCell {
        let i = self.flat_index(index);
        &mut self.cells[i]
    }

    /// Cells in storage order
    #[inline]
    pub fn cells(&self) -> &[VoxelCell] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [VoxelCell] {
        &mut self.cells
    }

    /// Cells with their coordinates, x-major then y then z
    pub fn iter(&self) -> impl Iterator<Item = (CellIndex, &VoxelCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.cell_index(i), cell))
    }

    /// World coordinate of a cell center
    pub fn index_to_world_center(&self, [x, y, z]: CellIndex) -> Point3<f64> {
        let o = self.offset_origin();
        let r = self.resolution;
        Point3::new(
            o.x + x as f64 * r + r / 2.0,
            o.y + y as f64 * r + r / 2.0,
            o.z + z as f64 * r + r / 2.0,
        )
    }

    /// Axis-aligned bounds of a cell
    pub fn cell_bounds(&self, index: CellIndex) -> Aabb {
        Aabb::from_center(self.index_to_world_center(index), self.resolution / 2.0)
    }

    /// Cell containing a world point, `None` outside the grid
    pub fn world_to_index(&self, point: &Point3<f64>) -> Option<CellIndex> {
        let o = self.offset_origin();
        let shape = self.shape();
        let mut out = [0usize; 3];
        for axis in 0..3 {
            let t = ((point[axis] - o[axis]) / self.resolution).floor();
            if !t.is_finite() || t < 0.0 || t >= shape[axis] as f64 {
                return None;
            }
            out[axis] = t as usize;
        }
        Some(out)
    }

    /// Flat index of the neighbor at `offset`, `None` if it leaves the grid
    #[inline]
    pub fn neighbor(&self, [x, y, z]: CellIndex, offset: [i32; 3]) -> Option<usize> {
        let shape = self.shape();
        let step = |c: usize, d: i32, n: usize| -> Option<usize> {
            let v = c.checked_add_signed(d as isize)?;
            (v < n).then_some(v)
        };
        let nx = step(x, offset[0], shape[0])?;
        let ny = step(y, offset[1], shape[1])?;
        let nz = step(z, offset[2], shape[2])?;
        Some((nx * shape[1] + ny) * shape[2] + nz)
    }

    /// Flat indices of the in-bounds neighbors of a cell, in connectivity order
    pub fn neighbors(&self, index: CellIndex, connectivity: &Connectivity) -> NeighborList {
        connectivity
            .offsets()
            .iter()
            .filter_map(|&o| self.neighbor(index, o))
            .collect()
    }

    pub fn label_counts(&self) -> LabelCounts {
        let mut counts = LabelCounts::default();
        for cell in &self.cells {
            match cell.label {
                VoxelLabel::Unlabeled => counts.unlabeled += 1,
                VoxelLabel::Intersected => counts.intersected += 1,
                VoxelLabel::Exterior => counts.exterior += 1,
                VoxelLabel::Interior => counts.interior += 1,
            }
        }
        counts
    }

    /// Distinct room ids carried by interior cells, ascending
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self
            .cells
            .iter()
            .filter(|c| c.label == VoxelLabel::Interior)
            .filter_map(|c| c.room_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
