// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ export of voxel cubes for quick visual inspection.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use voxcity_voxel::{CellIndex, VoxelGrid, VoxelLabel};

use crate::cityjson::object_key;
use crate::cube::{cube_corners, CUBE_FACES};
use crate::error::{Error, Result};

/// Options for [`write_voxel_obj`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjExportOptions {
    /// Also emit interior cells, grouped as `interior-<room>`
    pub include_interior: bool,
}

/// Cells to export, grouped by OBJ group name
fn collect_groups(grid: &VoxelGrid, options: &ObjExportOptions) -> BTreeMap<String, Vec<CellIndex>> {
    let mut groups: BTreeMap<String, Vec<CellIndex>> = BTreeMap::new();
    for (index, cell) in grid.iter() {
        let name = match cell.label {
            VoxelLabel::Intersected => object_key(cell).0,
            VoxelLabel::Interior if options.include_interior => match cell.room_id {
                Some(id) => format!("interior-{id}"),
                None => "interior".to_string(),
            },
            _ => continue,
        };
        groups.entry(name).or_default().push(index);
    }
    groups
}

/// Write cubes for the selected cells to any writer, returns the cube count
pub fn write_obj_to<W: Write>(
    grid: &VoxelGrid,
    options: &ObjExportOptions,
    out: &mut W,
) -> std::io::Result<usize> {
    let groups = collect_groups(grid, options);
    writeln!(out, "# voxcity voxel export")?;
    writeln!(out, "# resolution {}", grid.resolution())?;

    let mut next_vertex = 1usize;
    let mut cubes = 0usize;
    for (name, cells) in &groups {
        writeln!(out, "g {name}")?;
        for &index in cells {
            for p in cube_corners(grid, index) {
                writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
            }
            for face in CUBE_FACES {
                let [a, b, c, d] = face.map(|i| next_vertex + i);
                writeln!(out, "f {a} {b} {c} {d}")?;
            }
            next_vertex += 8;
            cubes += 1;
        }
    }
    Ok(cubes)
}

/// Write the voxel cubes of `grid` to an OBJ file
pub fn write_voxel_obj(grid: &VoxelGrid, path: &Path, options: &ObjExportOptions) -> Result<usize> {
    let file = File::create(path).map_err(|e| Error::write(path, e))?;
    let mut writer = BufWriter::new(file);
    let cubes = write_obj_to(grid, options, &mut writer).map_err(|e| Error::write(path, e))?;
    writer.flush().map_err(|e| Error::write(path, e))?;

    tracing::debug!(cubes, path = %path.display(), "Wrote voxel OBJ");
    Ok(cubes)
}
