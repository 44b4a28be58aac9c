// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wavefront OBJ reader for building meshes
//!
//! Only the directives that carry geometry and grouping are interpreted:
//!
//! - `v x y z` declares a vertex (extra components such as `w` or colors are ignored)
//! - `f a b c ...` declares a face; tokens may be `i`, `i/t`, `i/t/n` or `i//n`
//!   and negative indices count back from the latest vertex
//! - `g name` / `o name` start (or resume) a named group
//!
//! Faces with more than three corners are fan-triangulated. Faces that appear
//! before any group directive land in the group named [`DEFAULT_GROUP`].

use crate::error::{Error, Result};
use crate::mesh::{BuildingMesh, Coord, MeshGroup};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::path::Path;

/// Group name used for faces declared before any `g`/`o` line
pub const DEFAULT_GROUP: &str = "default";

/// Read and parse an OBJ file from disk
pub fn read_obj(path: impl AsRef<Path>) -> Result<BuildingMesh> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&content)
}

/// Parse OBJ content into ordered mesh groups
///
/// Groups keep the order in which their name first appears. A name that
/// shows up again later appends to the existing group.
pub fn parse_obj(content: &str) -> Result<BuildingMesh> {
    let mut builder = GroupBuilder::default();
    let mut vertices: Vec<Coord> = Vec::new();

    for (line_idx, raw_line) in content.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = match raw_line.find('#') {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let mut coord = [0.0f64; 3];
                let mut found = 0;
                for token in tokens.take(3) {
                    coord[found] = parse_f64(token, line_no)?;
                    found += 1;
                }
                if found < 3 {
                    return Err(Error::IncompleteVertex { line: line_no, found });
                }
                vertices.push(coord);
            }
            "f" => {
                let mut corners: SmallVec<[usize; 4]> = SmallVec::new();
                for token in tokens {
                    corners.push(resolve_index(token, vertices.len(), line_no)?);
                }
                if corners.len() < 3 {
                    return Err(Error::DegenerateFace {
                        line: line_no,
                        found: corners.len(),
                    });
                }
                let group = builder.current();
                // Fan triangulation around the first corner
                for i in 1..corners.len() - 1 {
                    group.triangles.push([
                        vertices[corners[0]],
                        vertices[corners[i]],
                        vertices[corners[i + 1]],
                    ]);
                }
            }
            "g" | "o" => {
                let name = tokens.collect::<Vec<_>>().join(" ");
                let name = if name.is_empty() {
                    DEFAULT_GROUP.to_string()
                } else {
                    name
                };
                builder.select(name);
            }
            _ => {}
        }
    }

    Ok(BuildingMesh {
        groups: builder.finish(),
        vertices,
    })
}

#[inline]
fn parse_f64(token: &str, line: usize) -> Result<f64> {
    fast_float::parse::<f64, _>(token).map_err(|_| Error::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

/// Resolve a face token (`i`, `i/t`, `i/t/n`, `i//n`) to a zero-based vertex index
fn resolve_index(token: &str, count: usize, line: usize) -> Result<usize> {
    let index_str = token.split('/').next().unwrap_or(token);
    let index: i64 = index_str.parse().map_err(|_| Error::InvalidNumber {
        line,
        token: token.to_string(),
    })?;

    let resolved = if index > 0 {
        index - 1
    } else {
        count as i64 + index
    };

    if index == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(Error::IndexOutOfRange { line, index, count });
    }
    Ok(resolved as usize)
}

/// Collects triangles per group name while preserving first-appearance order
#[derive(Default)]
struct GroupBuilder {
    groups: Vec<MeshGroup>,
    by_name: FxHashMap<String, usize>,
    current: Option<usize>,
}

impl GroupBuilder {
    fn select(&mut self, name: String) {
        let idx = match self.by_name.get(&name) {
            Some(&idx) => idx,
            None => {
                let idx = self.groups.len();
                self.groups.push(MeshGroup::new(name.clone()));
                self.by_name.insert(name, idx);
                idx
            }
        };
        self.current = Some(idx);
    }

    fn current(&mut self) -> &mut MeshGroup {
        if self.current.is_none() {
            self.select(DEFAULT_GROUP.to_string());
        }
        let idx = self.current.unwrap_or_default();
        &mut self.groups[idx]
    }

    fn finish(self) -> Vec<MeshGroup> {
        // Groups that only ever received a name carry no geometry
        self.groups
            .into_iter()
            .filter(|g| !g.triangles.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE_FACE: &str = "\
# a single quad split into two triangles
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
g Floor:Slab
f 1 2 3 4
";

    #[test]
    fn test_parse_quad_is_fan_triangulated() {
        let mesh = parse_obj(CUBE_FACE).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.groups.len(), 1);
        let group = &mesh.groups[0];
        assert_eq!(group.name, "Floor:Slab");
        assert_eq!(group.triangles.len(), 2);
        assert_eq!(group.triangles[0], [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        assert_eq!(group.triangles[1], [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_face_tokens_with_texture_and_normal_indices() {
        let content = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\ng a\nf 1/1/1 2//1 3/2\n";
        let mesh = parse_obj(content).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_negative_indices_are_relative() {
        let content = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj(content).unwrap();
        assert_eq!(mesh.groups[0].name, DEFAULT_GROUP);
        assert_eq!(mesh.groups[0].triangles[0][2], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_repeated_group_names_are_merged_in_first_order() {
        let content = "\
v 0 0 0
v 1 0 0
v 0 1 0
g b
f 1 2 3
g a
f 1 2 3
g b
f 3 2 1
";
        let mesh = parse_obj(content).unwrap();
        let names: Vec<_> = mesh.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(mesh.groups[0].triangles.len(), 2);
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let content = "v 0 0 0\nv 1 0 0\nv 0 1 0\ng empty\ng full\nf 1 2 3\n";
        let mesh = parse_obj(content).unwrap();
        assert_eq!(mesh.groups.len(), 1);
        assert_eq!(mesh.groups[0].name, "full");
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let content = "v 0 0 0\nv 1 0 0\nf 1 2 3\n";
        match parse_obj(content) {
            Err(Error::IndexOutOfRange { line, index, count }) => {
                assert_eq!(line, 3);
                assert_eq!(index, 3);
                assert_eq!(count, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_coordinate() {
        let err = parse_obj("v 0 abc 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidNumber { line: 1, .. }));
    }

    #[test]
    fn test_degenerate_face() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").unwrap_err();
        assert!(matches!(err, Error::DegenerateFace { line: 3, found: 2 }));
    }

    #[test]
    fn test_incomplete_vertex() {
        let err = parse_obj("v 1.0 2.0\n").unwrap_err();
        assert!(matches!(err, Error::IncompleteVertex { line: 1, found: 2 }));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_obj(dir.path().join("missing.obj")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_read_obj_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");
        std::fs::write(&path, CUBE_FACE).unwrap();
        let mesh = read_obj(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }
}
