// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exterior / interior region labeling
//!
//! Two passes over a rasterized grid:
//!
//! 1. **Exterior**: breadth-first flood from the seed cell `(0, 0, 0)`
//!    through non-intersected cells.
//! 2. **Rooms**: cells still unlabeled are grouped into connected components
//!    in x-major, y, z scan order. Each component becomes `Interior` with its
//!    own room id, counted from 0 in discovery order.
//!
//! Only the intersected set of the input grid is read, so classifying an
//! already classified grid gives the same result.

use crate::cell::{RoomId, VoxelLabel};
use crate::connectivity::Connectivity;
use crate::error::{Error, Result};
use crate::grid::VoxelGrid;
use std::collections::VecDeque;

/// Result of region labeling
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionSummary {
    pub intersected_cells: usize,
    pub exterior_cells: usize,
    pub interior_cells: usize,
    /// Cell count per room, indexed by room id
    pub room_sizes: Vec<usize>,
}

impl RegionSummary {
    #[inline]
    pub fn room_count(&self) -> usize {
        self.room_sizes.len()
    }
}

/// Classified grid with its summary
#[derive(Debug, Clone)]
pub struct Classification {
    pub grid: VoxelGrid,
    pub summary: RegionSummary,
}

/// Label every non-intersected cell as exterior or as part of a room
///
/// Returns a new grid; `grid` is left untouched. Fails when the grid is
/// empty or when the seed cell is intersected, since exterior space could
/// not be identified.
pub fn classify_regions(grid: &VoxelGrid, connectivity: &Connectivity) -> Result<Classification> {
    if grid.is_empty() {
        return Err(Error::EmptyGrid);
    }
    let seed = grid.flat_index([0, 0, 0]);
    if grid.cells()[seed].is_intersected() {
        return Err(Error::SeedIntersected {
            padding: grid.offset(),
        });
    }
    if grid.offset() == 0 {
        tracing::warn!("Grid has no padding; the seed cell may not be exterior");
    }

    // Keep intersected cells with their semantics, reset everything else
    let mut out = grid.clone();
    let mut intersected_cells = 0;
    for cell in out.cells_mut() {
        if cell.is_intersected() {
            intersected_cells += 1;
        } else {
            *cell = Default::default();
        }
    }

    let exterior_cells = flood_exterior(&mut out, seed, connectivity);

    let mut room_sizes = Vec::new();
    let mut stack = Vec::new();
    for start in 0..out.len() {
        if out.cells()[start].label != VoxelLabel::Unlabeled {
            continue;
        }
        let room = room_sizes.len() as RoomId;
        let size = flood_room(&mut out, start, room, connectivity, &mut stack);
        tracing::trace!(room, size, "Labeled room");
        room_sizes.push(size);
    }

    let summary = RegionSummary {
        intersected_cells,
        exterior_cells,
        interior_cells: room_sizes.iter().sum(),
        room_sizes,
    };

    tracing::info!(
        exterior = summary.exterior_cells,
        interior = summary.interior_cells,
        intersected = summary.intersected_cells,
        rooms = summary.room_count(),
        "Classified regions"
    );

    Ok(Classification { grid: out, summary })
}

/// Breadth-first exterior flood, returns the number of exterior cells
fn flood_exterior(grid: &mut VoxelGrid, seed: usize, connectivity: &Connectivity) -> usize {
    let mut queue = VecDeque::new();
    grid.cells_mut()[seed].label = VoxelLabel::Exterior;
    queue.push_back(seed);
    let mut count = 1;

    while let Some(current) = queue.pop_front() {
        let index = grid.cell_index(current);
        for next in grid.neighbors(index, connectivity) {
            let cell = &mut grid.cells_mut()[next];
            if cell.label == VoxelLabel::Unlabeled {
                cell.label = VoxelLabel::Exterior;
                queue.push_back(next);
                count += 1;
            }
        }
    }
    count
}

/// Depth-first room flood over unlabeled cells, returns the room size
fn flood_room(
    grid: &mut VoxelGrid,
    start: usize,
    room: RoomId,
    connectivity: &Connectivity,
    stack: &mut Vec<usize>,
) -> usize {
    stack.clear();
    mark_interior(grid, start, room);
    stack.push(start);
    let mut count = 1;

    while let Some(current) = stack.pop() {
        let index = grid.cell_index(current);
        for next in grid.neighbors(index, connectivity) {
            if grid.cells()[next].label == VoxelLabel::Unlabeled {
                mark_interior(grid, next, room);
                stack.push(next);
                count += 1;
            }
        }
    }
    count
}

#[inline]
fn mark_interior(grid: &mut VoxelGrid, index: usize, room: RoomId) {
    let cell = &mut grid.cells_mut()[index];
    cell.label = VoxelLabel::Interior;
    cell.room_id = Some(room);
}
