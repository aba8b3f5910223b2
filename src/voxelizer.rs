// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch conversion of meshes into voxel grids

use crate::config::ConversionConfig;
use crate::error::{Result, VoxelError};
use crate::geometry::{validate_batch, Face, MeshBatch, TriangleMesh};
use crate::voxel::{
    normalize_item, projected_point_count, subdivide, subdivide_par, NormalizationParams,
    Rasterizer, VoxelGrid,
};
use log::debug;
use nalgebra::Point3;
use rayon::prelude::*;

/// Runs normalize → subdivide → rasterize for every item of a batch.
///
/// Items are independent: each one only reads its own vertices and the
/// shared face list, so the result for an item does not depend on the rest
/// of the batch or on processing order.
pub struct Voxelizer {
    config: ConversionConfig,
}

impl Voxelizer {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// Voxelizer with default options at `resolution`
    pub fn with_resolution(resolution: usize) -> Self {
        Self::new(ConversionConfig::new(resolution))
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Convert every item of `batch`, returning one grid per item in order
    pub fn convert(&self, batch: &MeshBatch) -> Result<Vec<VoxelGrid>> {
        self.convert_parts(&batch.vertices, &batch.faces)
    }

    /// Convert a single mesh
    pub fn convert_mesh(&self, mesh: &TriangleMesh) -> Result<VoxelGrid> {
        let vertices = std::slice::from_ref(&mesh.vertices);
        let (rasterizer, normalized) = self.prepare(vertices, &mesh.faces)?;
        self.convert_item(0, &normalized[0], &mesh.faces, &rasterizer)
    }

    /// Convert borrowed batch data
    pub fn convert_parts(&self, vertices: &[Vec<Point3<f64>>], faces: &[Face]) -> Result<Vec<VoxelGrid>> {
        let (rasterizer, normalized) = self.prepare(vertices, faces)?;

        debug!(
            "Converting batch of {} meshes ({} faces) at resolution {}",
            vertices.len(),
            faces.len(),
            self.config.resolution
        );

        let convert_item = |(item, points): (usize, &Vec<Point3<f64>>)| {
            self.convert_item(item, points, faces, &rasterizer)
        };

        if self.config.parallel {
            normalized.par_iter().enumerate().map(convert_item).collect()
        } else {
            normalized.iter().enumerate().map(convert_item).collect()
        }
    }

    /// Validate inputs and normalize the whole batch once
    fn prepare(
        &self,
        vertices: &[Vec<Point3<f64>>],
        faces: &[Face],
    ) -> Result<(Rasterizer, Vec<Vec<Point3<f64>>>)> {
        let config = &self.config;
        let rasterizer = Rasterizer::new(config.resolution)?
            .with_policy(config.boundary_policy)
            .with_parallel(config.parallel);
        validate_batch(vertices, faces)?;

        let params = NormalizationParams::resolve(
            vertices,
            config.origin.as_deref(),
            config.scale.as_deref(),
        )?;

        let normalized = vertices
            .iter()
            .zip(&params)
            .map(|(points, p)| normalize_item(points, p))
            .collect();
        Ok((rasterizer, normalized))
    }

    fn convert_item(
        &self,
        item: usize,
        points: &[Point3<f64>],
        faces: &[Face],
        rasterizer: &Rasterizer,
    ) -> Result<VoxelGrid> {
        let resolution = self.config.resolution;

        if let Some(max) = self.config.max_points {
            let projected = projected_point_count(points, faces, resolution);
            if projected > max {
                return Err(VoxelError::TooManyPoints {
                    item,
                    projected,
                    max,
                });
            }
        }

        let samples = if self.config.parallel {
            subdivide_par(points, faces, resolution)
        } else {
            subdivide(points, faces, resolution)
        };

        let grid = rasterizer.rasterize(&samples, self.config.return_sparse)?;
        debug!(
            "Item {}: {} samples, {} occupied voxels",
            item,
            samples.len(),
            grid.occupied_count()
        );
        Ok(grid)
    }
}

impl Default for Voxelizer {
    fn default() -> Self {
        Self::new(ConversionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::BoundaryPolicy;

    fn triangle_batch() -> MeshBatch {
        MeshBatch::new(
            vec![vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ]],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn test_convert_triangle() {
        let voxelizer = Voxelizer::new(
            ConversionConfig::new(3)
                .with_origin(vec![Point3::origin()])
                .with_scale(vec![1.0])
                .sparse(true),
        );
        let grids = voxelizer.convert(&triangle_batch()).unwrap();
        assert_eq!(grids.len(), 1);
        assert_eq!(
            grids[0].occupied_indices(),
            vec![[0, 0, 0], [0, 0, 1], [0, 0, 2], [1, 0, 0], [1, 0, 1], [2, 0, 0]]
        );
    }

    #[test]
    fn test_empty_batch() {
        let grids = Voxelizer::with_resolution(4)
            .convert(&MeshBatch::default())
            .unwrap();
        assert!(grids.is_empty());
    }

    #[test]
    fn test_point_budget() {
        let voxelizer = Voxelizer::new(ConversionConfig::new(64).with_max_points(Some(100)));
        let result = voxelizer.convert(&triangle_batch());
        assert!(matches!(
            result,
            Err(VoxelError::TooManyPoints { item: 0, max: 100, .. })
        ));

        let unlimited = Voxelizer::new(ConversionConfig::new(64).with_max_points(None));
        assert!(unlimited.convert(&triangle_batch()).is_ok());
    }

    #[test]
    fn test_invalid_resolution() {
        let result = Voxelizer::with_resolution(0).convert(&triangle_batch());
        assert_eq!(result, Err(VoxelError::InvalidResolution(0)));
    }

    #[test]
    fn test_reject_policy_with_tight_origin() {
        let voxelizer = Voxelizer::new(
            ConversionConfig::new(4)
                .with_origin(vec![Point3::new(0.5, 0.0, 0.0)])
                .with_scale(vec![1.0])
                .with_policy(BoundaryPolicy::Reject),
        );
        assert!(matches!(
            voxelizer.convert(&triangle_batch()),
            Err(VoxelError::PointOutOfRange { .. })
        ));
    }

    #[test]
    fn test_convert_mesh_matches_batch() {
        let voxelizer = Voxelizer::with_resolution(8);
        let batch = triangle_batch();
        let mesh = batch.item(0).unwrap();
        assert_eq!(
            voxelizer.convert_mesh(&mesh).unwrap(),
            voxelizer.convert(&batch).unwrap()[0]
        );
    }
}
