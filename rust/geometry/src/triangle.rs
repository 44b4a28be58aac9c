// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangles and the triangle/box overlap test
//!
//! The overlap test is the classic separating-axis formulation: a triangle
//! and a box are disjoint iff one of 13 candidate axes separates them.
//!
//! - 3 box face normals (the coordinate axes)
//! - 1 triangle normal
//! - 9 cross products of a triangle edge with a coordinate axis
//!
//! Intervals are compared as closed intervals, so a triangle that only
//! touches a box face, edge or corner counts as intersecting it.

use crate::bounds::Aabb;
use nalgebra::{Point3, Vector3};
use voxcity_core::TriangleCoords;

/// Triangle definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Build from raw coordinates as produced by the OBJ reader
    pub fn from_coords(coords: &TriangleCoords) -> Self {
        let [a, b, c] = coords;
        Self::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        )
    }

    /// Unnormalized normal (edge1 x edge2)
    #[inline]
    pub fn raw_normal(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit normal, `None` for degenerate triangles
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.raw_normal().try_normalize(f64::EPSILON)
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        self.raw_normal().norm() * 0.5
    }

    /// Bounding box of the three corners
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            self.v0.inf(&self.v1).inf(&self.v2),
            self.v0.sup(&self.v1).sup(&self.v2),
        )
    }

    /// Exact (up to floating point) triangle/box overlap test
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let center = aabb.center();
        let h = aabb.half_extents();

        // Move the box to the origin
        let v0 = self.v0 - center;
        let v1 = self.v1 - center;
        let v2 = self.v2 - center;

        // Box face normals: compare the triangle's extent per axis
        for axis in 0..3 {
            let lo = v0[axis].min(v1[axis]).min(v2[axis]);
            let hi = v0[axis].max(v1[axis]).max(v2[axis]);
            if lo > h[axis] || hi < -h[axis] {
                return false;
            }
        }

        let edges = [v1 - v0, v2 - v1, v0 - v2];

        // Edge x axis cross products
        for edge in &edges {
            for axis in 0..3 {
                let mut unit = Vector3::zeros();
                unit[axis] = 1.0;
                let a = edge.cross(&unit);
                if separates(&a, &v0, &v1, &v2, &h) {
                    return false;
                }
            }
        }

        // Triangle plane against the box
        let n = edges[0].cross(&edges[1]);
        let r = h.x * n.x.abs() + h.y * n.y.abs() + h.z * n.z.abs();
        let s = n.dot(&v0);
        s.abs() <= r
    }
}

/// Project the triangle and the origin-centered box onto `axis` and report
/// whether the projections are disjoint
#[inline]
fn separates(
    axis: &Vector3<f64>,
    v0: &Vector3<f64>,
    v1: &Vector3<f64>,
    v2: &Vector3<f64>,
    h: &Vector3<f64>,
) -> bool {
    let p0 = axis.dot(v0);
    let p1 = axis.dot(v1);
    let p2 = axis.dot(v2);
    let r = h.x * axis.x.abs() + h.y * axis.y.abs() + h.z * axis.z.abs();
    let lo = p0.min(p1).min(p2);
    let hi = p0.max(p1).max(p2);
    lo > r || hi < -r
}
