// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orientation-based surface classification
//!
//! Used as a fallback for groups whose names give no hint. A group whose
//! fitted plane is vertical is a wall; a horizontal group is a floor when it
//! sits in the lower half of the building and a roof otherwise.

use crate::plane::fit_plane;
use nalgebra::Point3;
use voxcity_core::{assign_semantics_by_name, BuildingMesh, MeshGroup, SurfaceClass};

/// Tolerance on the normal's components when testing for vertical planes
pub const VERTICAL_TOLERANCE: f64 = 0.1;

/// Tolerance on `1 - |n_z|` when testing for horizontal planes
pub const HORIZONTAL_TOLERANCE: f64 = 0.1;

/// How many groups each rule classified
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemanticsSummary {
    pub by_name: usize,
    pub by_orientation: usize,
    pub unresolved: usize,
}

/// Average Z over all triangle corners of a group
pub fn average_height(group: &MeshGroup) -> Option<f64> {
    let mut count = 0usize;
    let total: f64 = group
        .points()
        .map(|p| {
            count += 1;
            p[2]
        })
        .sum();
    (count > 0).then(|| total / count as f64)
}

/// Classify a group from the orientation of its best-fit plane
///
/// `height_range` is the (min, max) Z of the whole building and decides
/// floor versus roof for horizontal groups.
pub fn classify_by_orientation(group: &MeshGroup, height_range: (f64, f64)) -> SurfaceClass {
    let points: Vec<Point3<f64>> = group
        .points()
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();

    let Ok(plane) = fit_plane(&points) else {
        return SurfaceClass::Other;
    };

    if plane.is_vertical(VERTICAL_TOLERANCE) {
        return SurfaceClass::Wall;
    }

    if plane.is_horizontal(HORIZONTAL_TOLERANCE) {
        let Some(height) = average_height(group) else {
            return SurfaceClass::Other;
        };
        let (zmin, zmax) = height_range;
        let mid = (zmin + zmax) * 0.5;
        return if height <= mid {
            SurfaceClass::Floor
        } else {
            SurfaceClass::Roof
        };
    }

    SurfaceClass::Other
}

/// Tag every group of a mesh: names first, then orientation for the rest
pub fn assign_semantics(mesh: &mut BuildingMesh) -> SemanticsSummary {
    let total = mesh.groups.len();
    let unnamed = assign_semantics_by_name(&mut mesh.groups);

    let height_range = mesh
        .bounds()
        .map(|(min, max)| (min[2], max[2]))
        .unwrap_or((0.0, 0.0));

    let mut by_orientation = 0;
    for group in mesh
        .groups
        .iter_mut()
        .filter(|g| g.class == SurfaceClass::Other)
    {
        let class = classify_by_orientation(group, height_range);
        if class != SurfaceClass::Other {
            group.class = class;
            by_orientation += 1;
        }
    }

    SemanticsSummary {
        by_name: total - unnamed,
        by_orientation,
        unresolved: unnamed - by_orientation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(name: &str, corners: [[f64; 3]; 4]) -> MeshGroup {
        let [a, b, c, d] = corners;
        MeshGroup::with_triangles(name, SurfaceClass::Other, vec![[a, b, c], [a, c, d]])
    }

    #[test]
    fn test_vertical_group_is_wall() {
        let g = quad(
            "Generic Model 1",
            [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 0.0, 3.0], [0.0, 0.0, 3.0]],
        );
        assert_eq!(classify_by_orientation(&g, (0.0, 3.0)), SurfaceClass::Wall);
    }

    #[test]
    fn test_horizontal_group_by_height() {
        let low = quad(
            "slab",
            [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 4.0, 0.0], [0.0, 4.0, 0.0]],
        );
        let high = quad(
            "cover",
            [[0.0, 0.0, 3.0], [4.0, 0.0, 3.0], [4.0, 4.0, 3.0], [0.0, 4.0, 3.0]],
        );
        assert_eq!(classify_by_orientation(&low, (0.0, 3.0)), SurfaceClass::Floor);
        assert_eq!(classify_by_orientation(&high, (0.0, 3.0)), SurfaceClass::Roof);
    }

    #[test]
    fn test_slanted_group_stays_other() {
        let g = quad(
            "ramp",
            [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 4.0, 4.0], [0.0, 4.0, 4.0]],
        );
        assert_eq!(classify_by_orientation(&g, (0.0, 4.0)), SurfaceClass::Other);
    }

    #[test]
    fn test_assign_semantics_prefers_names() {
        let mut mesh = BuildingMesh {
            groups: vec![
                // Named as a roof although it is vertical: the name wins
                quad(
                    "Basic Roof",
                    [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 0.0, 3.0], [0.0, 0.0, 3.0]],
                ),
                quad(
                    "Object_17",
                    [[0.0, 4.0, 0.0], [4.0, 4.0, 0.0], [4.0, 4.0, 3.0], [0.0, 4.0, 3.0]],
                ),
                quad(
                    "Object_18",
                    [[0.0, 0.0, 0.0], [4.0, 0.0, 0.0], [4.0, 4.0, 3.0], [0.0, 4.0, 3.0]],
                ),
            ],
            vertices: vec![[0.0, 0.0, 0.0], [4.0, 4.0, 3.0]],
        };
        let summary = assign_semantics(&mut mesh);
        assert_eq!(mesh.groups[0].class, SurfaceClass::Roof);
        assert_eq!(mesh.groups[1].class, SurfaceClass::Wall);
        assert_eq!(mesh.groups[2].class, SurfaceClass::Other);
        assert_eq!(
            summary,
            SemanticsSummary {
                by_name: 1,
                by_orientation: 1,
                unresolved: 1
            }
        );
    }

    #[test]
    fn test_average_height() {
        let g = quad(
            "x",
            [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 3.0], [0.0, 1.0, 3.0]],
        );
        // corners: (1,1,3) + (1,3,3) = 12 over 6
        assert!((average_height(&g).unwrap() - 2.0).abs() < 1e-12);
        assert!(average_height(&MeshGroup::new("empty")).is_none());
    }
}
