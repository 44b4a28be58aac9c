// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-voxel record and its enumerations

use std::fmt;
use voxcity_core::SurfaceClass;

/// Opaque identifier of an interior connected component
pub type RoomId = u32;

/// Occupancy label of a voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoxelLabel {
    #[default]
    Unlabeled,
    /// Touched by at least one mesh triangle
    Intersected,
    /// Free space connected to the grid margin
    Exterior,
    /// Free space enclosed by the mesh
    Interior,
}

impl VoxelLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoxelLabel::Unlabeled => "unlabeled",
            VoxelLabel::Intersected => "intersected",
            VoxelLabel::Exterior => "exterior",
            VoxelLabel::Interior => "interior",
        }
    }
}

impl fmt::Display for VoxelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CityJSON object type a surface voxel belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CityObjectType {
    #[default]
    Unknown,
    Building,
    /// Envelope voxel facing exterior space
    BuildingPart,
    /// Voxel bounding a room
    BuildingRoom,
}

impl CityObjectType {
    /// CityJSON type name
    pub fn as_str(&self) -> &'static str {
        match self {
            CityObjectType::Unknown => "Unknown",
            CityObjectType::Building => "Building",
            CityObjectType::BuildingPart => "BuildingPart",
            CityObjectType::BuildingRoom => "BuildingRoom",
        }
    }
}

impl fmt::Display for CityObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CityJSON semantic surface type carried by intersected voxels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum Semantics {
    #[default]
    Unknown,
    RoofSurface,
    GroundSurface,
    WallSurface,
    ClosureSurface,
    OuterCeilingSurface,
    OuterFloorSurface,
    Window,
    Door,
    InteriorWallSurface,
    CeilingSurface,
    FloorSurface,
}

impl Semantics {
    /// CityJSON semantic surface name, `None` for [`Semantics::Unknown`]
    pub fn cityjson_name(&self) -> Option<&'static str> {
        Some(match self {
            Semantics::Unknown => return None,
            Semantics::RoofSurface => "RoofSurface",
            Semantics::GroundSurface => "GroundSurface",
            Semantics::WallSurface => "WallSurface",
            Semantics::ClosureSurface => "ClosureSurface",
            Semantics::OuterCeilingSurface => "OuterCeilingSurface",
            Semantics::OuterFloorSurface => "OuterFloorSurface",
            Semantics::Window => "Window",
            Semantics::Door => "Door",
            Semantics::InteriorWallSurface => "InteriorWallSurface",
            Semantics::CeilingSurface => "CeilingSurface",
            Semantics::FloorSurface => "FloorSurface",
        })
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        *self == Semantics::Unknown
    }
}

impl From<SurfaceClass> for Semantics {
    fn from(class: SurfaceClass) -> Self {
        match class {
            SurfaceClass::Wall => Semantics::WallSurface,
            SurfaceClass::InteriorWall => Semantics::InteriorWallSurface,
            SurfaceClass::Floor => Semantics::FloorSurface,
            SurfaceClass::Roof => Semantics::RoofSurface,
            SurfaceClass::Window => Semantics::Window,
            SurfaceClass::Door => Semantics::Door,
            SurfaceClass::Other => Semantics::Unknown,
        }
    }
}

/// State of one voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoxelCell {
    pub label: VoxelLabel,
    /// Component id for interior voxels, or the bounded room for surface voxels
    pub room_id: Option<RoomId>,
    pub city_object_type: CityObjectType,
    pub semantics: Semantics,
}

impl VoxelCell {
    #[inline]
    pub fn is_intersected(&self) -> bool {
        self.label == VoxelLabel::Intersected
    }
}
