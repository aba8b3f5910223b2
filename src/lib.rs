// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! meshvox
//!
//! Converts batches of triangle meshes into binary surface voxel grids.
//! Each mesh is normalized into the unit cube, its faces are subdivided until
//! no edge spans more than one voxel, and the resulting samples are
//! rasterized into a dense or sparse occupancy grid. Only the surface shell
//! is voxelized; interiors are left empty.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod utils;
pub mod voxel;
pub mod voxelizer;

pub use config::ConversionConfig;
pub use error::{Result, VoxelError};
pub use geometry::{Face, MeshBatch, TriangleMesh};
pub use voxel::{BoundaryPolicy, DenseGrid, SparseGrid, VoxelGrid, VoxelIndex};
pub use voxelizer::Voxelizer;

use nalgebra::Point3;

/// Convert a batch of meshes sharing `faces` into one voxel grid per item.
///
/// `origin` and `scale` carry one value per batch item; when omitted each
/// item is fitted into the unit cube by its own bounding box.
///
/// # Examples
///
/// ```
/// use meshvox::convert_mesh_to_voxelgrid;
/// use nalgebra::Point3;
///
/// let vertices = vec![vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
/// ]];
/// let grids = convert_mesh_to_voxelgrid(
///     &vertices,
///     &[[0, 1, 2]],
///     3,
///     Some(&[Point3::origin()]),
///     Some(&[1.0]),
///     false,
/// )?;
///
/// let dense = grids[0].to_dense()?;
/// assert!(dense.get([0, 0, 2]));
/// assert!(dense.get([2, 0, 0]));
/// assert!(!dense.get([2, 0, 1]));
/// # Ok::<(), meshvox::VoxelError>(())
/// ```
pub fn convert_mesh_to_voxelgrid(
    vertices: &[Vec<Point3<f64>>],
    faces: &[Face],
    resolution: usize,
    origin: Option<&[Point3<f64>]>,
    scale: Option<&[f64]>,
    return_sparse: bool,
) -> Result<Vec<VoxelGrid>> {
    let config = ConversionConfig {
        resolution,
        origin: origin.map(<[_]>::to_vec),
        scale: scale.map(<[_]>::to_vec),
        return_sparse,
        ..ConversionConfig::default()
    };
    Voxelizer::new(config).convert_parts(vertices, faces)
}
