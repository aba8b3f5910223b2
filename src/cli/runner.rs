// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! File-level conversion runner

use crate::config::ConversionConfig;
use crate::io;
use crate::voxel::VoxelGrid;
use crate::voxelizer::Voxelizer;
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Result of converting one mesh file
pub struct RunResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub grid: VoxelGrid,
    pub vertex_count: usize,
    pub face_count: usize,
    pub duration: Duration,
}

/// Converts STL files and writes their grids as JSON
pub struct Runner {
    voxelizer: Voxelizer,
    output_dir: PathBuf,
}

impl Runner {
    pub fn new(config: ConversionConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            voxelizer: Voxelizer::new(config),
            output_dir: output_dir.into(),
        }
    }

    /// `<output_dir>/<input stem>.json`
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mesh".to_string());
        self.output_dir.join(format!("{}.json", stem))
    }

    /// Fail if two inputs would be written to the same output file,
    /// e.g. `a/mesh.stl` and `b/mesh.stl`
    pub fn check_outputs(&self, inputs: &[PathBuf]) -> Result<()> {
        let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::with_capacity(inputs.len());
        for input in inputs {
            let output = self.output_path(input);
            if let Some(previous) = seen.insert(output.clone(), input) {
                bail!(
                    "{:?} and {:?} would both be written to {:?}; rename one of them",
                    previous,
                    input,
                    output
                );
            }
        }
        Ok(())
    }

    /// Voxelize one STL file on its own
    pub fn run_file(&self, input: &Path) -> Result<RunResult> {
        let start = Instant::now();

        let mesh = io::import_stl(input)?;
        let grid = self
            .voxelizer
            .convert_mesh(&mesh)
            .with_context(|| format!("Failed to voxelize {:?}", input))?;

        let output = self.output_path(input);
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {:?}", self.output_dir))?;
        io::export_grid_json(&grid, &output)?;

        Ok(RunResult {
            input: input.to_path_buf(),
            output,
            grid,
            vertex_count: mesh.vertex_count(),
            face_count: mesh.face_count(),
            duration: start.elapsed(),
        })
    }

    /// Voxelize files sharing one topology as a single batch.
    ///
    /// The reported duration is the batch total split evenly across items.
    pub fn run_batch(&self, inputs: &[PathBuf]) -> Result<Vec<RunResult>> {
        self.check_outputs(inputs)?;
        let start = Instant::now();

        let batch = io::import_stl_batch(inputs)?;
        let grids = self
            .voxelizer
            .convert(&batch)
            .context("Failed to voxelize batch")?;

        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create {:?}", self.output_dir))?;

        let per_item = start.elapsed() / inputs.len().max(1) as u32;
        inputs
            .iter()
            .zip(grids)
            .map(|(input, grid)| {
                let output = self.output_path(input);
                io::export_grid_json(&grid, &output)?;
                Ok(RunResult {
                    input: input.clone(),
                    output,
                    grid,
                    vertex_count: batch.vertex_count(),
                    face_count: batch.face_count(),
                    duration: per_item,
                })
            })
            .collect()
    }
}

fn is_stl(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("stl"))
}

/// Expand files and directories into a sorted list of STL files
pub fn discover_meshes(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut meshes = Vec::new();

    for path in paths {
        if path.is_file() && is_stl(path) {
            meshes.push(path.clone());
        } else if path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let entry_path = entry.path();
                if entry_path.is_file() && is_stl(entry_path) {
                    meshes.push(entry_path.to_path_buf());
                }
            }
        }
    }

    meshes.sort();
    meshes
}
