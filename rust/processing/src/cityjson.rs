// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CityJSON export of a classified voxel grid.
//!
//! Every intersected cell becomes one solid of a `CompositeSolid`. Cells are
//! grouped into city objects by their surface classification: one
//! `BuildingRoom` per room id, a `BuildingPart` for the facade, and a
//! `BuildingRoom` collecting room surfaces whose room is unknown. All of them
//! are children of a single `Building`.
//!
//! Vertices are quantized to integers with the document transform
//! (`scale = 0.001`, `translate` = grid corner) and shared between cells.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use voxcity_voxel::{CityObjectType, RoomId, Semantics, VoxelCell, VoxelGrid, VoxelLabel};

use crate::cube::{cube_corners, CUBE_FACES};
use crate::error::{Error, Result};

/// Vertex quantization step in model units
pub const VERTEX_SCALE: f64 = 0.001;

/// Key of the parent building object
pub const BUILDING_KEY: &str = "building";
/// Key of the facade object
pub const FACADE_KEY: &str = "building-part";
/// Key of the object holding room surfaces without a room
pub const UNRESOLVED_ROOM_KEY: &str = "room-unresolved";
/// Key of intersected cells that never went through surface extraction
pub const UNCLASSIFIED_KEY: &str = "unclassified";

/// Solid -> shell -> surface -> ring -> vertex index
pub type SolidBoundary = Vec<Vec<Vec<Vec<usize>>>>;

/// Solid -> shell -> surface semantic index
pub type SolidSemantics = Vec<Vec<Option<usize>>>;

/// Top-level CityJSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityJson {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub transform: Transform,
    pub metadata: Metadata,
    #[serde(rename = "CityObjects")]
    pub city_objects: BTreeMap<String, CityObject>,
    pub vertices: Vec<[i64; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transform {
    pub scale: [f64; 3],
    pub translate: [f64; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub identifier: String,
    /// `[minx, miny, minz, maxx, maxy, maxz]` of the exported cells
    #[serde(
        rename = "geographicalExtent",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub geographical_extent: Option<[f64; 6]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityObject {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub geometry: Vec<Geometry>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub parents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attributes: Option<RoomAttributes>,
}

/// Attributes attached to room objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomAttributes {
    pub room_id: RoomId,
    /// Interior cells of the room
    pub voxel_count: usize,
    /// Interior cell count times the cell volume
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub lod: String,
    pub boundaries: Vec<SolidBoundary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub semantics: Option<GeometrySemantics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometrySemantics {
    pub surfaces: Vec<SemanticSurface>,
    pub values: Vec<SolidSemantics>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticSurface {
    #[serde(rename = "type")]
    pub kind: String,
}

/// City object key and CityJSON type for an intersected cell
pub fn object_key(cell: &VoxelCell) -> (String, CityObjectType) {
    match (cell.city_object_type, cell.room_id) {
        (CityObjectType::BuildingRoom, Some(id)) => {
            (format!("room-{id}"), CityObjectType::BuildingRoom)
        }
        (CityObjectType::BuildingRoom, None) => {
            (UNRESOLVED_ROOM_KEY.to_string(), CityObjectType::BuildingRoom)
        }
        (CityObjectType::BuildingPart, _) => (FACADE_KEY.to_string(), CityObjectType::BuildingPart),
        _ => (UNCLASSIFIED_KEY.to_string(), CityObjectType::BuildingPart),
    }
}

/// Accumulates the solids and semantics of one city object
struct ObjectBuilder {
    kind: CityObjectType,
    room_id: Option<RoomId>,
    solids: Vec<SolidBoundary>,
    values: Vec<SolidSemantics>,
    surfaces: Vec<Semantics>,
}

impl ObjectBuilder {
    fn new(kind: CityObjectType, room_id: Option<RoomId>) -> Self {
        Self {
            kind,
            room_id,
            solids: Vec::new(),
            values: Vec::new(),
            surfaces: Vec::new(),
        }
    }

    fn push(&mut self, cube: [usize; 8], semantics: Semantics) {
        let shell: Vec<Vec<Vec<usize>>> = CUBE_FACES
            .iter()
            .map(|face| vec![face.iter().map(|&i| cube[i]).collect()])
            .collect();
        self.solids.push(vec![shell]);

        let value = if semantics.is_unknown() {
            None
        } else {
            Some(match self.surfaces.iter().position(|s| *s == semantics) {
                Some(i) => i,
                None => {
                    self.surfaces.push(semantics);
                    self.surfaces.len() - 1
                }
            })
        };
        self.values.push(vec![vec![value; CUBE_FACES.len()]]);
    }

    fn finish(self, room_sizes: &FxHashMap<RoomId, usize>, cell_volume: f64) -> CityObject {
        let surfaces = self
            .surfaces
            .iter()
            .filter_map(|s| s.cityjson_name())
            .map(|name| SemanticSurface {
                kind: name.to_string(),
            })
            .collect();

        let attributes = self.room_id.map(|room_id| {
            let voxel_count = room_sizes.get(&room_id).copied().unwrap_or(0);
            RoomAttributes {
                room_id,
                voxel_count,
                volume: voxel_count as f64 * cell_volume,
            }
        });

        CityObject {
            kind: self.kind.as_str().to_string(),
            geometry: vec![Geometry {
                kind: "CompositeSolid".to_string(),
                lod: "3".to_string(),
                boundaries: self.solids,
                semantics: Some(GeometrySemantics {
                    surfaces,
                    values: self.values,
                }),
            }],
            children: Vec::new(),
            parents: vec![BUILDING_KEY.to_string()],
            attributes,
        }
    }
}

/// Build the CityJSON document for the intersected cells of `grid`.
pub fn to_cityjson(grid: &VoxelGrid, identifier: &str) -> CityJson {
    let translate = grid.offset_origin();
    let quantize = |p: &voxcity_geometry::Point3<f64>| -> [i64; 3] {
        std::array::from_fn(|axis| ((p[axis] - translate[axis]) / VERTEX_SCALE).round() as i64)
    };

    let mut vertices: Vec<[i64; 3]> = Vec::new();
    let mut vertex_index: FxHashMap<[i64; 3], usize> = FxHashMap::default();
    let mut builders: BTreeMap<String, ObjectBuilder> = BTreeMap::new();
    let mut room_sizes: FxHashMap<RoomId, usize> = FxHashMap::default();
    let mut extent: Option<[f64; 6]> = None;

    for (index, cell) in grid.iter() {
        match cell.label {
            VoxelLabel::Interior => {
                if let Some(id) = cell.room_id {
                    *room_sizes.entry(id).or_insert(0) += 1;
                }
                continue;
            }
            VoxelLabel::Intersected => {}
            _ => continue,
        }

        let corners = cube_corners(grid, index);
        let cube: [usize; 8] = corners.map(|p| {
            let q = quantize(&p);
            *vertex_index.entry(q).or_insert_with(|| {
                vertices.push(q);
                vertices.len() - 1
            })
        });

        let (lo, hi) = (corners[0], corners[7]);
        extent = Some(match extent {
            None => [lo.x, lo.y, lo.z, hi.x, hi.y, hi.z],
            Some(e) => [
                e[0].min(lo.x),
                e[1].min(lo.y),
                e[2].min(lo.z),
                e[3].max(hi.x),
                e[4].max(hi.y),
                e[5].max(hi.z),
            ],
        });

        let (key, kind) = object_key(cell);
        let room_id = match kind {
            CityObjectType::BuildingRoom => cell.room_id,
            _ => None,
        };
        builders
            .entry(key)
            .or_insert_with(|| ObjectBuilder::new(kind, room_id))
            .push(cube, cell.semantics);
    }

    let r = grid.resolution();
    let cell_volume = r * r * r;
    let mut city_objects: BTreeMap<String, CityObject> = builders
        .into_iter()
        .map(|(key, builder)| (key, builder.finish(&room_sizes, cell_volume)))
        .collect();

    let children: Vec<String> = city_objects.keys().cloned().collect();
    city_objects.insert(
        BUILDING_KEY.to_string(),
        CityObject {
            kind: CityObjectType::Building.as_str().to_string(),
            geometry: Vec::new(),
            children,
            parents: Vec::new(),
            attributes: None,
        },
    );

    tracing::debug!(
        objects = city_objects.len(),
        vertices = vertices.len(),
        "Built CityJSON document"
    );

    CityJson {
        kind: "CityJSON".to_string(),
        version: "2.0".to_string(),
        transform: Transform {
            scale: [VERTEX_SCALE; 3],
            translate: [translate.x, translate.y, translate.z],
        },
        metadata: Metadata {
            identifier: identifier.to_string(),
            geographical_extent: extent,
        },
        city_objects,
        vertices,
    }
}

impl CityJson {
    /// Serialize to a pretty-printed JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| Error::write(path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| Error::write(path, e))?;
        Ok(())
    }

    /// World coordinate of a stored vertex
    pub fn world_vertex(&self, index: usize) -> Option<[f64; 3]> {
        let v = self.vertices.get(index)?;
        let t = &self.transform;
        Some(std::array::from_fn(|axis| {
            v[axis] as f64 * t.scale[axis] + t.translate[axis]
        }))
    }
}
