// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Surface extraction from a classified grid
//!
//! Each intersected cell looks at its neighbors:
//!
//! - any exterior neighbor: facade (`BuildingPart`), no room
//! - otherwise the first interior neighbor in connectivity order: room
//!   surface (`BuildingRoom`) carrying that neighbor's room id
//! - otherwise: room surface with no resolved room
//!
//! A one-voxel wall between outside and a room is therefore facade.

use crate::cell::{CityObjectType, VoxelLabel};
use crate::connectivity::Connectivity;
use crate::grid::VoxelGrid;

/// Number of intersected cells per outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceSummary {
    pub facade: usize,
    pub room_bounding: usize,
    pub unresolved: usize,
}

impl SurfaceSummary {
    pub fn total(&self) -> usize {
        self.facade + self.room_bounding + self.unresolved
    }
}

/// Annotate intersected cells with their city object type and room, in place
pub fn extract_surfaces(grid: &mut VoxelGrid, connectivity: &Connectivity) -> SurfaceSummary {
    let mut summary = SurfaceSummary::default();

    for i in 0..grid.len() {
        if !grid.cells()[i].is_intersected() {
            continue;
        }

        let index = grid.cell_index(i);
        let mut exterior = false;
        let mut room = None;
        for n in grid.neighbors(index, connectivity) {
            let neighbor = &grid.cells()[n];
            match neighbor.label {
                VoxelLabel::Exterior => {
                    exterior = true;
                    break;
                }
                VoxelLabel::Interior if room.is_none() => room = neighbor.room_id,
                _ => {}
            }
        }

        let cell = &mut grid.cells_mut()[i];
        if exterior {
            cell.city_object_type = CityObjectType::BuildingPart;
            cell.room_id = None;
            summary.facade += 1;
        } else {
            cell.city_object_type = CityObjectType::BuildingRoom;
            cell.room_id = room;
            if room.is_some() {
                summary.room_bounding += 1;
            } else {
                summary.unresolved += 1;
            }
        }
    }

    tracing::info!(
        facade = summary.facade,
        room_bounding = summary.room_bounding,
        unresolved = summary.unresolved,
        "Extracted surfaces"
    );
    summary
}
