// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::Point3;

/// Length of the longest edge of a triangle
pub fn longest_edge(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    let e0 = (p1 - p0).norm();
    let e1 = (p2 - p1).norm();
    let e2 = (p0 - p2).norm();
    e0.max(e1).max(e2)
}

/// Check that every coordinate of a point is finite
pub fn is_finite_point(p: &Point3<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
}
