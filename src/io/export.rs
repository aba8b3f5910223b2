// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON persistence for voxel grids

use crate::voxel::{cell_count, VoxelGrid};
use anyhow::{ensure, Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write a grid as JSON
pub fn export_grid_json(grid: &VoxelGrid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, grid).context("Failed to serialize voxel grid")?;
    writer.flush()?;
    Ok(())
}

/// Read a grid written by [`export_grid_json`]
pub fn import_grid_json(path: impl AsRef<Path>) -> Result<VoxelGrid> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
    let grid: VoxelGrid = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse voxel grid: {:?}", path))?;
    check_grid(&grid).with_context(|| format!("Malformed voxel grid: {:?}", path))?;
    Ok(grid)
}

/// Deserialization bypasses the grid constructors, so re-check their invariants
fn check_grid(grid: &VoxelGrid) -> Result<()> {
    match grid {
        VoxelGrid::Dense(dense) => {
            let r = dense.resolution();
            let expected = cell_count(r)
                .with_context(|| format!("resolution {} cannot be stored densely", r))?;
            ensure!(
                dense.cells().len() == expected,
                "expected {} cells, found {}",
                expected,
                dense.cells().len()
            );
            ensure!(dense.cells().iter().all(|&c| c <= 1), "cells must be 0 or 1");
        }
        VoxelGrid::Sparse(sparse) => {
            let r = sparse.resolution();
            let indices = sparse.indices();
            ensure!(
                indices.iter().all(|i| i.iter().all(|&c| c < r)),
                "index outside resolution {}",
                r
            );
            ensure!(
                indices.windows(2).all(|w| w[0] < w[1]),
                "indices must be sorted and distinct"
            );
        }
    }
    Ok(())
}
