// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Conversion configuration

use crate::voxel::BoundaryPolicy;
use anyhow::{Context, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolution used when none is configured
pub const DEFAULT_RESOLUTION: usize = 32;

/// Default per-item sample point budget (about 800 MB of points)
pub const DEFAULT_MAX_POINTS: usize = 1 << 25;

/// Config file picked up by [`ConversionConfig::load`]
pub const CONFIG_FILE: &str = "meshvox.toml";

/// Options for one conversion call.
///
/// `origin` and `scale` hold one value per batch item; when absent they are
/// derived from each item's vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Grid side length in voxels
    pub resolution: usize,
    /// Per-item origin of the grid in mesh coordinates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Vec<Point3<f64>>>,
    /// Per-item isotropic scale
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vec<f64>>,
    /// Emit occupied indices instead of a dense array
    pub return_sparse: bool,
    /// Handling of normalized points outside the unit cube
    pub boundary_policy: BoundaryPolicy,
    /// Upper bound on sample points per item; `None` disables the check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<usize>,
    /// Use the rayon pool across items and faces
    pub parallel: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            origin: None,
            scale: None,
            return_sparse: false,
            boundary_policy: BoundaryPolicy::Clamp,
            max_points: Some(DEFAULT_MAX_POINTS),
            parallel: true,
        }
    }
}

impl ConversionConfig {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    pub fn with_origin(mut self, origin: Vec<Point3<f64>>) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_scale(mut self, scale: Vec<f64>) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn sparse(mut self, return_sparse: bool) -> Self {
        self.return_sparse = return_sparse;
        self
    }

    pub fn with_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary_policy = policy;
        self
    }

    pub fn with_max_points(mut self, max_points: Option<usize>) -> Self {
        self.max_points = max_points;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: ConversionConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `meshvox.toml` from the working directory if present, then apply
    /// environment variable overrides
    pub fn load() -> Result<Self> {
        let mut config = if PathBuf::from(CONFIG_FILE).exists() {
            Self::from_file(CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `MESHVOX_*` overrides read through `var`
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(resolution) = var("MESHVOX_RESOLUTION") {
            self.resolution = resolution
                .parse()
                .with_context(|| format!("Invalid MESHVOX_RESOLUTION: {}", resolution))?;
        }

        if let Some(sparse) = var("MESHVOX_SPARSE") {
            self.return_sparse = sparse.parse().unwrap_or(false);
        }

        if let Some(max_points) = var("MESHVOX_MAX_POINTS") {
            let max: usize = max_points
                .parse()
                .with_context(|| format!("Invalid MESHVOX_MAX_POINTS: {}", max_points))?;
            // 0 lifts the limit
            self.max_points = (max > 0).then_some(max);
        }

        if let Some(parallel) = var("MESHVOX_PARALLEL") {
            self.parallel = parallel.parse().unwrap_or(true);
        }

        if let Some(policy) = var("MESHVOX_POLICY") {
            self.boundary_policy = policy
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid MESHVOX_POLICY")?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), content)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }
}
