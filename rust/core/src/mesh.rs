// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh group data structures
//!
//! A building mesh is a soup of triangles partitioned into named groups.
//! Each group carries one [`SurfaceClass`] describing which physical part of
//! the building it models.

use std::fmt;

/// A 3D point as read from the input file
pub type Coord = [f64; 3];

/// Triangle as three corner coordinates
pub type TriangleCoords = [Coord; 3];

/// Physical role of a mesh group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceClass {
    Wall,
    InteriorWall,
    Floor,
    Roof,
    Window,
    Door,
    #[default]
    Other,
}

impl SurfaceClass {
    /// Lowercase name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceClass::Wall => "wall",
            SurfaceClass::InteriorWall => "interior_wall",
            SurfaceClass::Floor => "floor",
            SurfaceClass::Roof => "roof",
            SurfaceClass::Window => "window",
            SurfaceClass::Door => "door",
            SurfaceClass::Other => "other",
        }
    }
}

impl fmt::Display for SurfaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named group of triangles sharing one surface class
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshGroup {
    pub name: String,
    pub class: SurfaceClass,
    pub triangles: Vec<TriangleCoords>,
}

impl MeshGroup {
    /// Create a group with class [`SurfaceClass::Other`]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: SurfaceClass::Other,
            triangles: Vec::new(),
        }
    }

    /// Create a group with an explicit class and triangles
    pub fn with_triangles(
        name: impl Into<String>,
        class: SurfaceClass,
        triangles: Vec<TriangleCoords>,
    ) -> Self {
        Self {
            name: name.into(),
            class,
            triangles,
        }
    }

    /// Number of triangles in the group
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Iterate over every corner of every triangle
    pub fn points(&self) -> impl Iterator<Item = &Coord> {
        self.triangles.iter().flat_map(|t| t.iter())
    }
}

/// Parsed building mesh: ordered groups plus the flat vertex list
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildingMesh {
    /// Groups in order of first appearance in the source file
    pub groups: Vec<MeshGroup>,
    /// All vertices declared in the source file
    pub vertices: Vec<Coord>,
}

impl BuildingMesh {
    /// Total triangle count across all groups
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(MeshGroup::triangle_count).sum()
    }

    /// True when no group holds a triangle
    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }

    /// Axis-aligned bounds (min, max) of the vertex list
    pub fn bounds(&self) -> Option<(Coord, Coord)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            for axis in 0..3 {
                min[axis] = min[axis].min(v[axis]);
                max[axis] = max[axis].max(v[axis]);
            }
        }
        Some((min, max))
    }

    /// Find a group by name
    pub fn group(&self, name: &str) -> Option<&MeshGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}
