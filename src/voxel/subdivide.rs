// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Adaptive midpoint subdivision of triangles into surface samples.
//!
//! A face is split into 4 by connecting its edge midpoints, repeatedly,
//! until no edge is longer than one voxel (`1 / resolution`). After `d`
//! rounds the vertices of all sub-triangles (every original corner and every
//! midpoint introduced on the way) are exactly the barycentric lattice
//!
//! ```text
//! (k*a + i*b + j*c) / n,   n = 2^d,   i + j + k = n
//! ```
//!
//! so the samples are written straight into a buffer of known size instead
//! of growing a triangle list round by round.
//!
//! Point count per face is `(n + 1)(n + 2) / 2`, roughly `2 * 4^d`: each
//! doubling of the resolution quadruples the output for large faces. Use
//! [`projected_point_count`] to bound memory before subdividing.

use crate::geometry::Face;
use crate::utils::math::longest_edge;
use log::{debug, trace};
use nalgebra::Point3;
use rayon::prelude::*;

/// Number of midpoint rounds needed for an edge of `longest_edge` to shrink
/// to at most one voxel width at `resolution`.
///
/// This is the smallest `d >= 0` with `longest_edge / 2^d <= 1 / resolution`.
/// Zero-length and non-finite edges need no subdivision.
pub fn subdivision_depth(longest_edge: f64, resolution: usize) -> u32 {
    // Edge length measured in voxel widths
    let ratio = longest_edge * resolution as f64;
    if !ratio.is_finite() || ratio <= 1.0 {
        return 0;
    }

    let mut depth = ratio.log2().ceil() as u32;
    // log2 may round either way near powers of two
    while ratio / 2f64.powi(depth as i32) > 1.0 {
        depth += 1;
    }
    while depth > 0 && ratio / 2f64.powi(depth as i32 - 1) <= 1.0 {
        depth -= 1;
    }
    depth
}

/// Sample count produced by one face subdivided `depth` times.
///
/// Saturates at `usize::MAX` instead of overflowing.
pub fn lattice_point_count(depth: u32) -> usize {
    let Some(n) = 1usize.checked_shl(depth) else {
        return usize::MAX;
    };
    (n + 1)
        .checked_mul(n + 2)
        .map_or(usize::MAX, |count| count / 2)
}

/// Subdivision depth for one face of a mesh
pub fn face_depth(vertices: &[Point3<f64>], face: &Face, resolution: usize) -> u32 {
    let [a, b, c] = face.map(|i| vertices[i]);
    subdivision_depth(longest_edge(&a, &b, &c), resolution)
}

/// Exact number of points [`subdivide`] will return for this mesh
pub fn projected_point_count(vertices: &[Point3<f64>], faces: &[Face], resolution: usize) -> usize {
    faces
        .iter()
        .map(|face| lattice_point_count(face_depth(vertices, face, resolution)))
        .fold(0usize, usize::saturating_add)
}

/// Append the depth-`depth` lattice of triangle `(a, b, c)` to `points`.
///
/// Corners carry weights of exactly 0 and 1, so original vertices come out
/// bit-identical.
fn push_lattice(
    points: &mut Vec<Point3<f64>>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    depth: u32,
) {
    let n = 1usize << depth;
    let inv = 1.0 / n as f64;

    for i in 0..=n {
        for j in 0..=(n - i) {
            let wb = i as f64 * inv;
            let wc = j as f64 * inv;
            let wa = (n - i - j) as f64 * inv;
            points.push(Point3::from(a.coords * wa + b.coords * wb + c.coords * wc));
        }
    }
}

/// Sample a single triangle densely enough for `resolution`
pub fn subdivide_face(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    resolution: usize,
) -> Vec<Point3<f64>> {
    let depth = subdivision_depth(longest_edge(a, b, c), resolution);
    let mut points = Vec::with_capacity(lattice_point_count(depth));
    push_lattice(&mut points, a, b, c, depth);
    points
}

/// Subdivide every face of an unbatched mesh and flatten the samples.
///
/// Faces are emitted in order. Corners shared between faces appear once per
/// face; duplicates are harmless to rasterization. Face indices must be in
/// range, and callers should check [`projected_point_count`] first on
/// untrusted input.
pub fn subdivide(vertices: &[Point3<f64>], faces: &[Face], resolution: usize) -> Vec<Point3<f64>> {
    let depths: Vec<u32> = faces
        .iter()
        .map(|face| face_depth(vertices, face, resolution))
        .collect();
    let total = depths
        .iter()
        .map(|&d| lattice_point_count(d))
        .fold(0usize, usize::saturating_add);

    debug!(
        "Subdividing {} faces at resolution {}: max depth {}, {} points",
        faces.len(),
        resolution,
        depths.iter().copied().max().unwrap_or(0),
        total
    );

    let mut points = Vec::with_capacity(total);
    for (face, &depth) in faces.iter().zip(&depths) {
        let [a, b, c] = face.map(|i| vertices[i]);
        trace!("Face {:?}: depth {}", face, depth);
        push_lattice(&mut points, &a, &b, &c, depth);
    }
    points
}

/// Parallel variant of [`subdivide`]; output order is identical.
pub fn subdivide_par(vertices: &[Point3<f64>], faces: &[Face], resolution: usize) -> Vec<Point3<f64>> {
    debug!(
        "Subdividing {} faces at resolution {} in parallel",
        faces.len(),
        resolution
    );

    faces
        .par_iter()
        .flat_map_iter(|face| {
            let [a, b, c] = face.map(|i| vertices[i]);
            subdivide_face(&a, &b, &c, resolution)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn right_triangle() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    /// Plain recursive midpoint subdivision, collecting every vertex
    fn recursive_midpoints(
        a: Point3<f64>,
        b: Point3<f64>,
        c: Point3<f64>,
        depth: u32,
        out: &mut Vec<Point3<f64>>,
    ) {
        out.extend([a, b, c]);
        if depth == 0 {
            return;
        }
        let ab = nalgebra::center(&a, &b);
        let bc = nalgebra::center(&b, &c);
        let ca = nalgebra::center(&c, &a);
        recursive_midpoints(a, ab, ca, depth - 1, out);
        recursive_midpoints(ab, b, bc, depth - 1, out);
        recursive_midpoints(ca, bc, c, depth - 1, out);
        recursive_midpoints(ab, bc, ca, depth - 1, out);
    }

    fn quantized(points: &[Point3<f64>]) -> Vec<[i64; 3]> {
        let mut keys: Vec<[i64; 3]> = points
            .iter()
            .map(|p| [p.x, p.y, p.z].map(|c| (c * 1e9).round() as i64))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }

    #[test]
    fn test_depth() {
        assert_eq!(subdivision_depth(0.0, 16), 0);
        assert_eq!(subdivision_depth(0.25, 4), 0);
        assert_eq!(subdivision_depth(0.5, 4), 1);
        assert_eq!(subdivision_depth(1.0, 4), 2);
        assert_eq!(subdivision_depth(1.0, 5), 3);
        assert_eq!(subdivision_depth(std::f64::consts::SQRT_2, 3), 3);
        assert_eq!(subdivision_depth(f64::NAN, 3), 0);
    }

    #[test]
    fn test_depth_bounds_edge_length() {
        for resolution in 1..40 {
            for k in 1..50 {
                let edge = k as f64 * 0.037;
                let depth = subdivision_depth(edge, resolution);
                let width = 1.0 / resolution as f64;
                assert!(edge / 2f64.powi(depth as i32) <= width * (1.0 + 1e-12));
                if depth > 0 {
                    assert!(edge / 2f64.powi(depth as i32 - 1) > width);
                }
            }
        }
    }

    #[test]
    fn test_depth_is_monotonic_in_resolution() {
        for resolution in 1..64 {
            assert!(subdivision_depth(1.3, resolution) <= subdivision_depth(1.3, resolution * 2));
        }
    }

    #[test]
    fn test_lattice_point_count() {
        assert_eq!(lattice_point_count(0), 3);
        assert_eq!(lattice_point_count(1), 6);
        assert_eq!(lattice_point_count(2), 15);
        assert_eq!(lattice_point_count(3), 45);
        assert_eq!(lattice_point_count(200), usize::MAX);
    }

    #[test]
    fn test_small_face_keeps_original_vertices() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(0.0, 0.5, 0.0),
        ];
        let points = subdivide(&vertices, &[[0, 1, 2]], 1);
        assert_eq!(points.len(), 3);
        for v in &vertices {
            assert!(points.contains(v));
        }

        // The hypotenuse of the unit right triangle exceeds one voxel
        let vertices = right_triangle();
        let points = subdivide(&vertices, &[[0, 1, 2]], 1);
        assert_eq!(points.len(), 6);
        for v in &vertices {
            assert!(points.contains(v));
        }
    }

    #[test]
    fn test_matches_recursive_midpoint_subdivision() {
        let vertices = vec![
            Point3::new(0.1, 0.2, 0.3),
            Point3::new(0.9, 0.4, 0.1),
            Point3::new(0.3, 0.8, 0.7),
        ];
        let resolution = 10;
        let depth = face_depth(&vertices, &[0, 1, 2], resolution);
        assert!(depth > 1);

        let mut expected = Vec::new();
        recursive_midpoints(vertices[0], vertices[1], vertices[2], depth, &mut expected);

        let points = subdivide(&vertices, &[[0, 1, 2]], resolution);
        assert_eq!(quantized(&points), quantized(&expected));
        assert_eq!(quantized(&points).len(), points.len());
    }

    #[test]
    fn test_sub_triangle_edges_within_voxel_width() {
        let vertices = right_triangle();
        let resolution = 7;
        let depth = face_depth(&vertices, &[0, 1, 2], resolution);
        let n = 1u32 << depth;
        // Longest sub-triangle edge is the scaled hypotenuse
        let sub_edge = std::f64::consts::SQRT_2 / n as f64;
        assert!(sub_edge <= 1.0 / resolution as f64);
    }

    #[test]
    fn test_degenerate_faces_terminate() {
        let p = Point3::new(0.5, 0.5, 0.5);
        let vertices = vec![p, p, p, Point3::new(1.0, 0.5, 0.5)];

        // Zero-area point triangle
        let points = subdivide(&vertices, &[[0, 1, 2]], 1024);
        assert_eq!(points, vec![p, p, p]);

        // Zero-area sliver along a line still subdivides its long edge
        let points = subdivide(&vertices, &[[0, 1, 3]], 4);
        assert_eq!(points.len(), projected_point_count(&vertices, &[[0, 1, 3]], 4));
        assert!(points.iter().all(|q| q.y == 0.5 && q.z == 0.5));
    }

    #[test]
    fn test_projected_count_matches_output() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.1),
        ];
        let faces = [[0, 1, 2], [0, 1, 3], [0, 2, 3]];
        for resolution in [1, 2, 5, 16] {
            let points = subdivide(&vertices, &faces, resolution);
            assert_eq!(points.len(), projected_point_count(&vertices, &faces, resolution));
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let vertices = right_triangle();
        let faces = [[0, 1, 2], [2, 1, 0]];
        assert_eq!(
            subdivide(&vertices, &faces, 9),
            subdivide_par(&vertices, &faces, 9)
        );
    }

    #[test]
    fn test_midpoints_are_exact() {
        let points = subdivide_face(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(0.5, 0.0, 0.0),
            &Point3::new(0.0, 0.5, 0.0),
            2,
        );
        assert_eq!(points.len(), 6);
        let mid = points
            .iter()
            .find(|p| p.x > 0.0 && p.y > 0.0)
            .copied()
            .unwrap();
        assert_relative_eq!(mid.x, 0.25);
        assert_relative_eq!(mid.y, 0.25);
    }
}
