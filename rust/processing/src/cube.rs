// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Voxel cube geometry shared by the exporters

use voxcity_geometry::Point3;
use voxcity_voxel::{CellIndex, VoxelGrid};

/// Quad faces of a cube over [`cube_corners`], counter-clockwise seen from
/// outside: bottom, top, front (-y), back (+y), right (+x), left (-x).
pub const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 2, 3, 1],
    [4, 5, 7, 6],
    [0, 1, 5, 4],
    [2, 6, 7, 3],
    [1, 3, 7, 5],
    [0, 4, 6, 2],
];

/// Corners of a cell, x varying fastest, then y, then z
#[inline]
pub fn cube_corners(grid: &VoxelGrid, index: CellIndex) -> [Point3<f64>; 8] {
    grid.cell_bounds(index).corners()
}
