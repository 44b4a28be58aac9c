// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Least-squares plane fitting

use crate::error::{Error, Result};
use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};

/// Relative eigenvalue threshold below which a point set counts as collinear
const COLLINEAR_EPSILON: f64 = 1e-12;

/// Plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Point on the plane (the centroid for fitted planes)
    pub point: Point3<f64>,
    /// Normal vector (normalized)
    pub normal: Vector3<f64>,
}

impl Plane {
    /// Create a new plane
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    /// Calculate signed distance from point to plane
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        (point - self.point).dot(&self.normal)
    }

    /// Plane contains the vertical direction, i.e. the normal has almost no Z part
    pub fn is_vertical(&self, tolerance: f64) -> bool {
        self.normal.z.abs() < tolerance
            && (self.normal.x.abs() > tolerance || self.normal.y.abs() > tolerance)
    }

    /// Normal points (up or down) within `tolerance` of the Z axis
    pub fn is_horizontal(&self, tolerance: f64) -> bool {
        self.normal.z.abs() > 1.0 - tolerance
    }
}

/// Fit a plane minimizing the squared orthogonal distances to `points`
///
/// The normal is the eigenvector of the covariance matrix with the smallest
/// eigenvalue. Fails for fewer than three points or a collinear set.
pub fn fit_plane(points: &[Point3<f64>]) -> Result<Plane> {
    if points.len() < 3 {
        return Err(Error::InsufficientPoints(points.len()));
    }

    let n = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords)
        / n;

    let mut covariance = Matrix3::zeros();
    for p in points {
        let d = p.coords - centroid;
        covariance += d * d.transpose();
    }

    let eigen = SymmetricEigen::new(covariance);
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    let largest = eigen.eigenvalues[order[2]];
    let middle = eigen.eigenvalues[order[1]];
    if largest <= 0.0 || middle <= largest * COLLINEAR_EPSILON {
        return Err(Error::DegeneratePoints(
            "points are coincident or collinear".to_string(),
        ));
    }

    let normal: Vector3<f64> = eigen.eigenvectors.column(order[0]).into_owned();
    Ok(Plane::new(Point3::from(centroid), normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fit_horizontal_plane() {
        let pts = vec![
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(4.0, 0.0, 2.0),
            Point3::new(4.0, 3.0, 2.0),
            Point3::new(0.0, 3.0, 2.0),
        ];
        let plane = fit_plane(&pts).unwrap();
        assert_relative_eq!(plane.normal.z.abs(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(plane.point.z, 2.0, epsilon = 1e-9);
        assert!(plane.is_horizontal(0.1));
        assert!(!plane.is_vertical(0.1));
    }

    #[test]
    fn test_fit_vertical_plane() {
        let pts = vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(5.0, 1.0, 0.0),
            Point3::new(5.0, 1.0, 3.0),
            Point3::new(0.0, 1.0, 3.0),
        ];
        let plane = fit_plane(&pts).unwrap();
        assert_relative_eq!(plane.normal.y.abs(), 1.0, epsilon = 1e-9);
        assert!(plane.is_vertical(0.1));
        assert_relative_eq!(plane.signed_distance(&Point3::new(2.0, 1.0, 7.0)), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_noisy_plane() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.01),
            Point3::new(1.0, 0.0, -0.01),
            Point3::new(1.0, 1.0, 0.01),
            Point3::new(0.0, 1.0, -0.01),
            Point3::new(0.5, 0.5, 0.0),
        ];
        let plane = fit_plane(&pts).unwrap();
        assert!(plane.normal.z.abs() > 0.99);
    }

    #[test]
    fn test_too_few_points() {
        let pts = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(fit_plane(&pts), Err(Error::InsufficientPoints(2))));
    }

    #[test]
    fn test_collinear_points() {
        let pts = vec![
            Point3::origin(),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        assert!(matches!(fit_plane(&pts), Err(Error::DegeneratePoints(_))));
    }
}
