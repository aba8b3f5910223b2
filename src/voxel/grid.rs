// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Binary occupancy grids

use crate::error::{Result, VoxelError};
use serde::{Deserialize, Serialize};

/// Integer voxel coordinate `[x, y, z]`
pub type VoxelIndex = [usize; 3];

/// Cubic occupancy array of side `resolution`.
///
/// Cells hold 0 or 1 and are laid out `[x][y][z]` with `z` varying fastest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenseGrid {
    resolution: usize,
    cells: Vec<u8>,
}

impl DenseGrid {
    /// All-empty grid.
    ///
    /// Fails with [`VoxelError::InvalidResolution`] when `resolution` is zero
    /// or `resolution^3` cells cannot be addressed.
    pub fn new(resolution: usize) -> Result<Self> {
        let cells = cell_count(resolution).ok_or(VoxelError::InvalidResolution(resolution))?;
        Ok(Self {
            resolution,
            cells: vec![0; cells],
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Flat cell storage in `[x][y][z]` order
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    #[inline]
    pub fn linear_index(&self, [x, y, z]: VoxelIndex) -> usize {
        (x * self.resolution + y) * self.resolution + z
    }

    #[inline]
    fn unravel(&self, linear: usize) -> VoxelIndex {
        let r = self.resolution;
        [linear / (r * r), (linear / r) % r, linear % r]
    }

    /// Mark a voxel occupied. Repeated calls have no further effect.
    #[inline]
    pub fn set(&mut self, index: VoxelIndex) {
        let i = self.linear_index(index);
        self.cells[i] = 1;
    }

    pub(crate) fn set_linear(&mut self, linear: usize) {
        self.cells[linear] = 1;
    }

    /// Occupancy of a voxel; out-of-range coordinates read as empty
    pub fn get(&self, index: VoxelIndex) -> bool {
        if index.iter().any(|&c| c >= self.resolution) {
            return false;
        }
        self.cells[self.linear_index(index)] != 0
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Occupied coordinates in lexicographic order
    pub fn occupied(&self) -> impl Iterator<Item = VoxelIndex> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0)
            .map(|(i, _)| self.unravel(i))
    }

    pub fn to_sparse(&self) -> SparseGrid {
        SparseGrid {
            resolution: self.resolution,
            indices: self.occupied().collect(),
        }
    }
}

/// Occupied voxel coordinates only; every listed cell is 1, all others 0.
///
/// Indices are distinct and sorted lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SparseGrid {
    resolution: usize,
    indices: Vec<VoxelIndex>,
}

impl SparseGrid {
    /// Build from arbitrary coordinates; sorts and removes duplicates.
    ///
    /// Coordinates must be below `resolution` on every axis.
    pub fn from_indices(resolution: usize, mut indices: Vec<VoxelIndex>) -> Self {
        debug_assert!(indices.iter().all(|i| i.iter().all(|&c| c < resolution)));
        indices.sort_unstable();
        indices.dedup();
        Self {
            resolution,
            indices,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn indices(&self) -> &[VoxelIndex] {
        &self.indices
    }

    pub fn get(&self, index: VoxelIndex) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn occupied_count(&self) -> usize {
        self.indices.len()
    }

    /// Expand into a dense grid; fails when the resolution is too large to
    /// allocate densely
    pub fn to_dense(&self) -> Result<DenseGrid> {
        let mut dense = DenseGrid::new(self.resolution)?;
        for &index in &self.indices {
            dense.set(index);
        }
        Ok(dense)
    }
}

/// `resolution^3`, or `None` for zero or a cell count no `Vec` can hold
pub fn cell_count(resolution: usize) -> Option<usize> {
    if resolution == 0 {
        return None;
    }
    resolution
        .checked_mul(resolution)
        .and_then(|sq| sq.checked_mul(resolution))
        .filter(|&cells| cells <= isize::MAX as usize)
}

/// Result of voxelizing one batch item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VoxelGrid {
    Dense(DenseGrid),
    Sparse(SparseGrid),
}

impl VoxelGrid {
    pub fn resolution(&self) -> usize {
        match self {
            VoxelGrid::Dense(g) => g.resolution(),
            VoxelGrid::Sparse(g) => g.resolution(),
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, VoxelGrid::Sparse(_))
    }

    pub fn get(&self, index: VoxelIndex) -> bool {
        match self {
            VoxelGrid::Dense(g) => g.get(index),
            VoxelGrid::Sparse(g) => g.get(index),
        }
    }

    pub fn occupied_count(&self) -> usize {
        match self {
            VoxelGrid::Dense(g) => g.occupied_count(),
            VoxelGrid::Sparse(g) => g.occupied_count(),
        }
    }

    /// Occupied coordinates in lexicographic order
    pub fn occupied_indices(&self) -> Vec<VoxelIndex> {
        match self {
            VoxelGrid::Dense(g) => g.occupied().collect(),
            VoxelGrid::Sparse(g) => g.indices().to_vec(),
        }
    }

    pub fn to_dense(&self) -> Result<DenseGrid> {
        match self {
            VoxelGrid::Dense(g) => Ok(g.clone()),
            VoxelGrid::Sparse(g) => g.to_dense(),
        }
    }

    pub fn to_sparse(&self) -> SparseGrid {
        match self {
            VoxelGrid::Dense(g) => g.to_sparse(),
            VoxelGrid::Sparse(g) => g.clone(),
        }
    }
}

impl From<DenseGrid> for VoxelGrid {
    fn from(grid: DenseGrid) -> Self {
        VoxelGrid::Dense(grid)
    }
}

impl From<SparseGrid> for VoxelGrid {
    fn from(grid: SparseGrid) -> Self {
        VoxelGrid::Sparse(grid)
    }
}
