// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion stages: normalize, subdivide, rasterize

pub mod grid;
pub mod normalize;
pub mod rasterize;
pub mod subdivide;

pub use grid::{cell_count, DenseGrid, SparseGrid, VoxelGrid, VoxelIndex};
pub use normalize::{normalize, normalize_item, NormalizationParams};
pub use rasterize::{rasterize, rasterize_with_policy, BoundaryPolicy, Rasterizer};
pub use subdivide::{
    lattice_point_count, projected_point_count, subdivide, subdivide_face, subdivide_par,
    subdivision_depth,
};
