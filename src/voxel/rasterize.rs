// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Point cloud to occupancy grid rasterization

use super::grid::{DenseGrid, SparseGrid, VoxelGrid, VoxelIndex};
use crate::error::{Result, VoxelError};
use crate::utils::math::is_finite_point;
use log::{debug, log_enabled, warn, Level};
use nalgebra::Point3;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// What to do with normalized points outside `[0, 1]^3`.
///
/// Points exactly on the upper face (`1.0`) are inside the cube and always
/// land in the last voxel, whatever the policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryPolicy {
    /// Snap to the nearest boundary voxel
    #[default]
    Clamp,
    /// Skip the point
    Discard,
    /// Fail with [`VoxelError::PointOutOfRange`]
    Reject,
}

impl std::str::FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clamp" => Ok(Self::Clamp),
            "discard" => Ok(Self::Discard),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown boundary policy: {}", other)),
        }
    }
}

#[inline]
fn in_unit_cube(p: &Point3<f64>) -> bool {
    p.iter().all(|&c| (0.0..=1.0).contains(&c))
}

/// `floor(c * resolution)` clamped into `[0, resolution - 1]`
#[inline]
fn axis_index(c: f64, resolution: usize) -> usize {
    let scaled = (c * resolution as f64).floor();
    if scaled <= 0.0 {
        0
    } else {
        (scaled as usize).min(resolution - 1)
    }
}

/// Maps normalized points to voxels at a fixed resolution
#[derive(Debug, Clone, Copy)]
pub struct Rasterizer {
    resolution: usize,
    policy: BoundaryPolicy,
    parallel: bool,
}

impl Rasterizer {
    pub fn new(resolution: usize) -> Result<Self> {
        if resolution == 0 {
            return Err(VoxelError::InvalidResolution(resolution));
        }
        Ok(Self {
            resolution,
            policy: BoundaryPolicy::default(),
            parallel: false,
        })
    }

    pub fn with_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Map points to indices on the rayon pool
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Voxel containing `p`, or `None` if the policy discards it.
    ///
    /// Non-finite points fail under every policy.
    pub fn voxel_index(&self, p: &Point3<f64>) -> Result<Option<VoxelIndex>> {
        if !is_finite_point(p) {
            return Err(VoxelError::NonFinitePoint {
                x: p.x,
                y: p.y,
                z: p.z,
            });
        }
        if !in_unit_cube(p) {
            match self.policy {
                BoundaryPolicy::Clamp => {}
                BoundaryPolicy::Discard => return Ok(None),
                BoundaryPolicy::Reject => {
                    return Err(VoxelError::PointOutOfRange {
                        x: p.x,
                        y: p.y,
                        z: p.z,
                    })
                }
            }
        }
        let r = self.resolution;
        Ok(Some([
            axis_index(p.x, r),
            axis_index(p.y, r),
            axis_index(p.z, r),
        ]))
    }

    fn map_points<T: Send>(
        &self,
        points: &[Point3<f64>],
        map: impl Fn(VoxelIndex) -> T + Sync + Send,
    ) -> Result<Vec<T>> {
        let index = |p: &Point3<f64>| self.voxel_index(p).map(|v| v.map(&map)).transpose();
        if self.parallel {
            points.par_iter().filter_map(index).collect()
        } else {
            points.iter().filter_map(index).collect()
        }
    }

    /// Rasterize a point cloud into a dense or sparse grid.
    ///
    /// Sparse output never materializes `resolution^3` cells, so it works at
    /// resolutions where [`DenseGrid::new`] fails.
    pub fn rasterize(&self, points: &[Point3<f64>], return_sparse: bool) -> Result<VoxelGrid> {
        if self.policy == BoundaryPolicy::Clamp && log_enabled!(Level::Warn) {
            let outside = points.iter().filter(|p| !in_unit_cube(p)).count();
            if outside > 0 {
                warn!(
                    "{} of {} points lie outside the unit cube and were clamped",
                    outside,
                    points.len()
                );
            }
        }

        let grid = if return_sparse {
            let indices = self.map_points(points, |index| index)?;
            VoxelGrid::Sparse(SparseGrid::from_indices(self.resolution, indices))
        } else {
            let mut dense = DenseGrid::new(self.resolution)?;
            let linear = self.map_points(points, |index| dense.linear_index(index))?;
            for i in linear {
                dense.set_linear(i);
            }
            VoxelGrid::Dense(dense)
        };

        debug!(
            "Rasterized {} points into {} occupied voxels at resolution {}",
            points.len(),
            grid.occupied_count(),
            self.resolution
        );
        Ok(grid)
    }
}

/// Rasterize with the default clamping policy
pub fn rasterize(points: &[Point3<f64>], resolution: usize, return_sparse: bool) -> Result<VoxelGrid> {
    Rasterizer::new(resolution)?.rasterize(points, return_sparse)
}

/// Rasterize with an explicit policy for out-of-range points
pub fn rasterize_with_policy(
    points: &[Point3<f64>],
    resolution: usize,
    return_sparse: bool,
    policy: BoundaryPolicy,
) -> Result<VoxelGrid> {
    Rasterizer::new(resolution)?
        .with_policy(policy)
        .rasterize(points, return_sparse)
}
