// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Region classification and surface extraction on hand-built grids

use nalgebra::Point3;
use voxcity_core::{MeshGroup, SurfaceClass};
use voxcity_voxel::{
    classify_regions, extract_surfaces, rasterize, CityObjectType, Connectivity, VoxelGrid,
    VoxelLabel,
};

fn grid(extent: [usize; 3], offset: usize) -> VoxelGrid {
    VoxelGrid::new(extent, offset, 1.0, Point3::origin()).unwrap()
}

/// Mark every cell of the inclusive box `lo..=hi` as intersected
fn fill_block(grid: &mut VoxelGrid, lo: [usize; 3], hi: [usize; 3]) {
    for x in lo[0]..=hi[0] {
        for y in lo[1]..=hi[1] {
            for z in lo[2]..=hi[2] {
                grid.get_mut([x, y, z]).label = VoxelLabel::Intersected;
            }
        }
    }
}

fn hollow(grid: &mut VoxelGrid, cell: [usize; 3]) {
    grid.get_mut(cell).label = VoxelLabel::Unlabeled;
}

/// Closure checks that characterize exterior reachability and room components:
/// nothing is left unlabeled, the seed is exterior, and no two free neighbors
/// disagree on label or room.
fn assert_consistent(grid: &VoxelGrid, conn: &Connectivity) {
    assert_eq!(grid.get([0, 0, 0]).label, VoxelLabel::Exterior);
    for (index, cell) in grid.iter() {
        assert_ne!(cell.label, VoxelLabel::Unlabeled, "unlabeled cell {index:?}");
        if cell.label == VoxelLabel::Intersected {
            continue;
        }
        assert_eq!(
            cell.room_id.is_some(),
            cell.label == VoxelLabel::Interior,
            "room id mismatch at {index:?}"
        );
        for n in grid.neighbors(index, conn) {
            let other = &grid.cells()[n];
            if other.label == VoxelLabel::Intersected {
                continue;
            }
            assert_eq!(other.label, cell.label, "free neighbors differ at {index:?}");
            assert_eq!(other.room_id, cell.room_id, "room leaks at {index:?}");
        }
    }
}

/// Reference labeling built without the classifier: a breadth-first search
/// from the corner over free cells, then union-find over what is left.
struct Reference {
    exterior: Vec<bool>,
    /// Union-find root per free non-exterior cell
    room_root: Vec<Option<usize>>,
    rooms: usize,
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn reference_labels(blocked: &[bool], shape: [usize; 3], offsets: &[[i32; 3]]) -> Reference {
    let [sx, sy, sz] = shape;
    let index = |x: usize, y: usize, z: usize| (x * sy + y) * sz + z;
    let adjacent = |i: usize| {
        let (x, y, z) = (i / (sy * sz), (i / sz) % sy, i % sz);
        offsets.iter().filter_map(move |o| {
            let nx = x as i64 + o[0] as i64;
            let ny = y as i64 + o[1] as i64;
            let nz = z as i64 + o[2] as i64;
            let inside = (0..sx as i64).contains(&nx)
                && (0..sy as i64).contains(&ny)
                && (0..sz as i64).contains(&nz);
            inside.then(|| index(nx as usize, ny as usize, nz as usize))
        })
    };

    let len = sx * sy * sz;
    let mut exterior = vec![false; len];
    let mut queue = std::collections::VecDeque::from([0usize]);
    exterior[0] = true;
    while let Some(i) = queue.pop_front() {
        for n in adjacent(i) {
            if !blocked[n] && !exterior[n] {
                exterior[n] = true;
                queue.push_back(n);
            }
        }
    }

    let enclosed = |i: usize| !blocked[i] && !exterior[i];
    let mut parent: Vec<usize> = (0..len).collect();
    for i in (0..len).filter(|&i| enclosed(i)) {
        for n in adjacent(i).filter(|&n| enclosed(n)) {
            let (a, b) = (find(&mut parent, i), find(&mut parent, n));
            if a != b {
                parent[a] = b;
            }
        }
    }
    let room_root: Vec<Option<usize>> = (0..len)
        .map(|i| enclosed(i).then(|| find(&mut parent, i)))
        .collect();
    let mut roots: Vec<usize> = room_root.iter().flatten().copied().collect();
    roots.sort_unstable();
    roots.dedup();

    Reference {
        exterior,
        room_root,
        rooms: roots.len(),
    }
}

/// Compare a classification of `input` cell for cell against the reference
fn assert_matches_reference(input: &VoxelGrid, classified: &VoxelGrid, conn: &Connectivity) {
    let blocked: Vec<bool> = input
        .cells()
        .iter()
        .map(|c| c.label == VoxelLabel::Intersected)
        .collect();
    let reference = reference_labels(&blocked, input.shape(), conn.offsets());

    let mut room_of_root = std::collections::HashMap::new();
    for (i, cell) in classified.cells().iter().enumerate() {
        assert_eq!(
            cell.label == VoxelLabel::Exterior,
            reference.exterior[i],
            "exterior mismatch at {:?}",
            classified.cell_index(i)
        );
        assert_eq!(cell.label == VoxelLabel::Intersected, blocked[i]);
        if let Some(root) = reference.room_root[i] {
            let room = cell.room_id.expect("enclosed cell without a room");
            // one room per reference component, and no room spans two
            assert_eq!(*room_of_root.entry(root).or_insert(room), room);
        }
    }
    let distinct: std::collections::HashSet<_> = room_of_root.values().collect();
    assert_eq!(distinct.len(), reference.rooms);
    assert_eq!(classified.room_ids().len(), reference.rooms);
}

#[test]
fn test_no_intersections_all_exterior() {
    let g = VoxelGrid::new([3, 3, 3], 0, 1.0, Point3::origin()).unwrap();
    let result = classify_regions(&g, &Connectivity::default()).unwrap();

    assert_eq!(result.summary.exterior_cells, 27);
    assert_eq!(result.summary.room_count(), 0);
    assert!(result
        .grid
        .cells()
        .iter()
        .all(|c| c.label == VoxelLabel::Exterior));
}

#[test]
fn test_single_enclosed_cell() {
    let mut g = grid([3, 3, 3], 1);
    fill_block(&mut g, [1, 1, 1], [3, 3, 3]);
    hollow(&mut g, [2, 2, 2]);

    let conn = Connectivity::default();
    let mut result = classify_regions(&g, &conn).unwrap();
    let center = result.grid.get([2, 2, 2]);
    assert_eq!(center.label, VoxelLabel::Interior);
    assert_eq!(center.room_id, Some(0));
    assert_eq!(result.summary.room_sizes, vec![1]);
    assert_eq!(result.summary.exterior_cells, 125 - 27);
    assert_consistent(&result.grid, &conn);

    // every shell cell of a one-voxel shell also touches the outside
    let surfaces = extract_surfaces(&mut result.grid, &conn);
    assert_eq!(surfaces.facade, 26);
    assert_eq!(surfaces.room_bounding, 0);
}

#[test]
fn test_thick_shell_surfaces() {
    let mut g = grid([5, 5, 5], 1);
    fill_block(&mut g, [1, 1, 1], [5, 5, 5]);
    hollow(&mut g, [3, 3, 3]);

    let conn = Connectivity::eighteen();
    let mut result = classify_regions(&g, &conn).unwrap();
    assert_eq!(result.summary.room_count(), 1);
    assert_eq!(result.summary.intersected_cells, 124);

    let surfaces = extract_surfaces(&mut result.grid, &conn);
    // outer layer faces the outside
    assert_eq!(surfaces.facade, 125 - 27);
    // face and edge neighbors of the hollow cell
    assert_eq!(surfaces.room_bounding, 18);
    // inner corners reach neither region under 18-connectivity
    assert_eq!(surfaces.unresolved, 8);

    let face = result.grid.get([2, 3, 3]);
    assert_eq!(face.city_object_type, CityObjectType::BuildingRoom);
    assert_eq!(face.room_id, Some(0));
    let corner = result.grid.get([2, 2, 2]);
    assert_eq!(corner.city_object_type, CityObjectType::BuildingRoom);
    assert_eq!(corner.room_id, None);
    let outer = result.grid.get([1, 3, 3]);
    assert_eq!(outer.city_object_type, CityObjectType::BuildingPart);

    // 26-connectivity reaches the inner corners too
    let conn26 = Connectivity::twenty_six();
    let mut result26 = classify_regions(&g, &conn26).unwrap();
    let surfaces26 = extract_surfaces(&mut result26.grid, &conn26);
    assert_eq!(surfaces26.room_bounding, 26);
    assert_eq!(surfaces26.unresolved, 0);
}

#[test]
fn test_two_enclosures_get_two_rooms() {
    let mut g = grid([7, 3, 3], 1);
    fill_block(&mut g, [1, 1, 1], [3, 3, 3]);
    fill_block(&mut g, [5, 1, 1], [7, 3, 3]);
    hollow(&mut g, [2, 2, 2]);
    hollow(&mut g, [6, 2, 2]);

    let conn = Connectivity::default();
    let result = classify_regions(&g, &conn).unwrap();
    assert_eq!(result.summary.room_count(), 2);
    assert_eq!(result.grid.room_ids(), vec![0, 1]);
    // discovery order follows the x-major scan
    assert_eq!(result.grid.get([2, 2, 2]).room_id, Some(0));
    assert_eq!(result.grid.get([6, 2, 2]).room_id, Some(1));
    // the gap between the enclosures is outside
    assert_eq!(result.grid.get([4, 2, 2]).label, VoxelLabel::Exterior);
    assert_consistent(&result.grid, &conn);
}

#[test]
fn test_triangle_outside_grid_marks_nothing() {
    let g = grid([3, 3, 3], 1);
    let far = MeshGroup::with_triangles(
        "far",
        SurfaceClass::Wall,
        vec![[[50.0, 50.0, 50.0], [51.0, 50.0, 50.0], [50.0, 51.0, 50.0]]],
    );
    let out = rasterize(&g, &[far]);
    assert_eq!(out.label_counts().intersected, 0);
}

#[test]
fn test_classification_is_idempotent() {
    let mut g = grid([5, 5, 5], 1);
    fill_block(&mut g, [1, 1, 1], [5, 5, 5]);
    hollow(&mut g, [2, 2, 2]);
    hollow(&mut g, [4, 4, 4]);

    let conn = Connectivity::six();
    let first = classify_regions(&g, &conn).unwrap();
    let second = classify_regions(&first.grid, &conn).unwrap();
    assert_eq!(first.grid, second.grid);
    assert_eq!(first.summary, second.summary);
    assert_eq!(first.summary.room_count(), 2);
}

#[test]
fn test_random_occupancy_partitions_grid() {
    let mut g = grid([8, 8, 8], 1);
    // deterministic pseudo-random fill of the core region
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    for x in 1..9 {
        for y in 1..9 {
            for z in 1..9 {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                if (state >> 33) % 100 < 45 {
                    g.get_mut([x, y, z]).label = VoxelLabel::Intersected;
                }
            }
        }
    }

    for conn in [
        Connectivity::six(),
        Connectivity::eighteen(),
        Connectivity::twenty_six(),
    ] {
        let result = classify_regions(&g, &conn).unwrap();
        let counts = result.grid.label_counts();
        assert_eq!(counts.unlabeled, 0);
        assert_eq!(
            counts.intersected + counts.exterior + counts.interior,
            result.grid.len()
        );
        assert_eq!(counts.interior, result.summary.interior_cells);
        assert_eq!(result.grid.room_ids().len(), result.summary.room_count());
        assert_consistent(&result.grid, &conn);
        assert_matches_reference(&g, &result.grid, &conn);
    }
}

#[test]
fn test_pockets_match_reference_for_every_connectivity() {
    let mut g = grid([9, 5, 5], 1);
    fill_block(&mut g, [1, 1, 1], [9, 5, 5]);
    // pocket joined to its neighbor only across an edge
    hollow(&mut g, [2, 2, 2]);
    hollow(&mut g, [3, 3, 2]);
    // pocket joined only across a corner
    hollow(&mut g, [5, 2, 2]);
    hollow(&mut g, [6, 3, 3]);
    // two-cell pocket sharing a face
    hollow(&mut g, [8, 3, 3]);
    hollow(&mut g, [8, 4, 3]);
    // channel to the outside, clear of every pocket
    hollow(&mut g, [9, 1, 1]);
    hollow(&mut g, [8, 1, 1]);

    let expected_rooms = [
        (Connectivity::six(), 5),
        (Connectivity::eighteen(), 4),
        (Connectivity::twenty_six(), 3),
    ];
    for (conn, rooms) in expected_rooms {
        let result = classify_regions(&g, &conn).unwrap();
        assert_eq!(result.summary.room_count(), rooms);
        assert_eq!(result.grid.get([8, 1, 1]).label, VoxelLabel::Exterior);
        assert_matches_reference(&g, &result.grid, &conn);
    }
}

#[test]
fn test_closed_box_mesh_yields_one_room() {
    let groups = box_mesh(4.0);
    let vertices: Vec<[f64; 3]> = groups
        .iter()
        .flat_map(|g| g.points().copied())
        .collect();

    let g = VoxelGrid::from_vertices(&vertices, 2, 1.0).unwrap();
    assert_eq!(g.shape(), [8, 8, 8]);

    let raster = rasterize(&g, &groups);
    let conn = Connectivity::default();
    let mut result = classify_regions(&raster, &conn).unwrap();
    assert_eq!(result.summary.room_sizes, vec![8]);

    let surfaces = extract_surfaces(&mut result.grid, &conn);
    assert!(surfaces.facade > 0);
    assert!(surfaces.room_bounding > 0);
    assert_consistent(&result.grid, &conn);
}

/// Closed axis-aligned cube `[0, size]^3` as walls, floor and roof
fn box_mesh(size: f64) -> Vec<MeshGroup> {
    let s = size;
    let quad = |a: [f64; 3], b: [f64; 3], c: [f64; 3], d: [f64; 3]| [[a, b, c], [a, c, d]];

    let floor = quad([0.0, 0.0, 0.0], [0.0, s, 0.0], [s, s, 0.0], [s, 0.0, 0.0]);
    let roof = quad([0.0, 0.0, s], [s, 0.0, s], [s, s, s], [0.0, s, s]);
    let walls = [
        quad([0.0, 0.0, 0.0], [s, 0.0, 0.0], [s, 0.0, s], [0.0, 0.0, s]),
        quad([s, 0.0, 0.0], [s, s, 0.0], [s, s, s], [s, 0.0, s]),
        quad([s, s, 0.0], [0.0, s, 0.0], [0.0, s, s], [s, s, s]),
        quad([0.0, s, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, s], [0.0, s, s]),
    ];

    vec![
        MeshGroup::with_triangles("Wall", SurfaceClass::Wall, walls.concat()),
        MeshGroup::with_triangles("Floor", SurfaceClass::Floor, floor.to_vec()),
        MeshGroup::with_triangles("Roof", SurfaceClass::Roof, roof.to_vec()),
    ]
}
