// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Primitive mesh generation

use super::TriangleMesh;
use nalgebra::Point3;
use std::f64::consts::PI;

/// Axis-aligned cube from the origin to `(size, size, size)` with shared corners
pub fn cube(size: f64) -> TriangleMesh {
    let s = size;
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(s, 0.0, 0.0),
        Point3::new(s, s, 0.0),
        Point3::new(0.0, s, 0.0),
        Point3::new(0.0, 0.0, s),
        Point3::new(s, 0.0, s),
        Point3::new(s, s, s),
        Point3::new(0.0, s, s),
    ];
    let faces = vec![
        [0, 2, 1], [0, 3, 2], // bottom
        [4, 5, 6], [4, 6, 7], // top
        [0, 1, 5], [0, 5, 4], // front
        [2, 3, 7], [2, 7, 6], // back
        [0, 4, 7], [0, 7, 3], // left
        [1, 2, 6], [1, 6, 5], // right
    ];
    TriangleMesh::new(vertices, faces)
}

/// Latitude/longitude sphere centered at the origin
pub fn uv_sphere(radius: f64, segments: usize) -> TriangleMesh {
    let stacks = segments.max(2);
    let slices = segments.max(3);
    let mut mesh = TriangleMesh::with_capacity((stacks + 1) * (slices + 1), 2 * stacks * slices);

    for i in 0..=stacks {
        let phi = PI * i as f64 / stacks as f64;
        let y = radius * phi.cos();
        let r = radius * phi.sin();

        for j in 0..=slices {
            let theta = 2.0 * PI * j as f64 / slices as f64;
            mesh.add_vertex(Point3::new(r * theta.cos(), y, r * theta.sin()));
        }
    }

    for i in 0..stacks {
        for j in 0..slices {
            let first = i * (slices + 1) + j;
            let second = first + slices + 1;

            mesh.add_face([first, second, first + 1]);
            mesh.add_face([second, second + 1, first + 1]);
        }
    }

    mesh
}
