// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Name-based surface classification
//!
//! BIM exporters name OBJ groups after the element type
//! (`Basic Wall:Interior - 138mm Partition`, `Floor:Generic 300mm`, ...).
//! Rules are checked in order and matched case-insensitively.

use crate::mesh::{MeshGroup, SurfaceClass};

/// Ordered substring rules; the first hit wins
const NAME_RULES: &[(&str, SurfaceClass)] = &[
    ("wall:interior", SurfaceClass::InteriorWall),
    ("floor", SurfaceClass::Floor),
    ("footing", SurfaceClass::Floor),
    ("roof", SurfaceClass::Roof),
    ("wall", SurfaceClass::Wall),
    ("window", SurfaceClass::Window),
    ("door", SurfaceClass::Door),
];

/// Classify a group from its name alone
pub fn classify_by_name(name: &str) -> SurfaceClass {
    let lower = name.to_lowercase();
    NAME_RULES
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, class)| *class)
        .unwrap_or(SurfaceClass::Other)
}

/// Assign a class to every group from its name
///
/// Returns the number of groups that stayed [`SurfaceClass::Other`].
pub fn assign_semantics_by_name(groups: &mut [MeshGroup]) -> usize {
    let mut unresolved = 0;
    for group in groups.iter_mut() {
        group.class = classify_by_name(&group.name);
        if group.class == SurfaceClass::Other {
            unresolved += 1;
        }
    }
    unresolved
}
