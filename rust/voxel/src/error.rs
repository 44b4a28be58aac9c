// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for voxel operations.

/// Result type alias for voxel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or classifying a voxel grid.
///
/// Out-of-range cell access is not represented here: indexing a grid outside
/// its shape is a programming error and panics.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The mesh supplied no vertices or no triangles.
    #[error("empty mesh: {0}")]
    EmptyMesh(String),

    /// Voxel edge length must be a positive finite number.
    #[error("invalid resolution {0}: must be a positive finite number")]
    InvalidResolution(f64),

    /// A vertex coordinate was NaN or infinite.
    #[error("vertex {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// The grid origin was NaN or infinite.
    #[error("grid origin {0:?} has a non-finite coordinate")]
    InvalidOrigin([f64; 3]),

    /// The padded grid would exceed the cell budget or overflow `usize`.
    #[error(
        "voxel grid of {shape:?} cells exceeds the limit of {max_cells} cells; \
         use a coarser resolution or less padding"
    )]
    GridTooLarge { shape: [f64; 3], max_cells: usize },

    /// The grid holds no cells.
    #[error("voxel grid has no cells")]
    EmptyGrid,

    /// The exterior seed cell is occupied by the mesh, so exterior space
    /// cannot be found.
    #[error(
        "seed cell (0, 0, 0) is intersected by the mesh; increase the padding \
         (currently {padding} cells) so the grid has a free margin"
    )]
    SeedIntersected { padding: usize },

    /// A connectivity definition was rejected.
    #[error("invalid connectivity: {0}")]
    InvalidConnectivity(String),
}
