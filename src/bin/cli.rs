// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! meshvox CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use meshvox::cli::{discover_meshes, Reporter, RunResult, Runner};
use meshvox::{io, BoundaryPolicy, ConversionConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "meshvox")]
#[command(about = "Convert triangle meshes into surface voxel grids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Voxelize STL files (or directories of them) into JSON grids
    Voxelize {
        /// Input STL files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Grid resolution (voxels per side)
        #[arg(short, long)]
        resolution: Option<usize>,

        /// Output directory
        #[arg(short, long, default_value = "voxels")]
        output: PathBuf,

        /// Write occupied indices instead of dense grids
        #[arg(long)]
        sparse: bool,

        /// Configuration file (defaults to meshvox.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Handling of points outside the unit cube (clamp, discard, reject)
        #[arg(long)]
        policy: Option<BoundaryPolicy>,

        /// Per-mesh sample point limit, 0 for unlimited
        #[arg(long)]
        max_points: Option<usize>,

        /// Treat all inputs as one batch with shared topology
        #[arg(long)]
        batch: bool,

        /// Disable multithreading
        #[arg(long)]
        sequential: bool,
    },

    /// Show resolution and occupancy of a saved grid
    Info {
        /// Grid JSON file
        grid: PathBuf,
    },

    /// Write the default configuration as TOML
    InitConfig {
        /// Destination file
        #[arg(default_value = "meshvox.toml")]
        path: PathBuf,
    },

    /// Show version information
    Version,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Voxelize {
            inputs,
            resolution,
            output,
            sparse,
            config,
            policy,
            max_points,
            batch,
            sequential,
        } => {
            let mut conversion = match config {
                Some(path) => ConversionConfig::from_file(path)?,
                None => ConversionConfig::load()?,
            };
            if let Some(resolution) = resolution {
                conversion.resolution = resolution;
            }
            if sparse {
                conversion.return_sparse = true;
            }
            if let Some(policy) = policy {
                conversion.boundary_policy = policy;
            }
            if let Some(max) = max_points {
                conversion.max_points = (max > 0).then_some(max);
            }
            if sequential {
                conversion.parallel = false;
            }
            voxelize_command(&inputs, &output, conversion, batch, cli.verbose)?;
        }
        Commands::Info { grid } => {
            info_command(&grid)?;
        }
        Commands::InitConfig { path } => {
            ConversionConfig::default().save(&path)?;
            Reporter::success(&format!("Wrote default configuration to {}", path.display()));
        }
        Commands::Version => {
            println!("meshvox v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn voxelize_command(
    inputs: &[PathBuf],
    output: &Path,
    config: ConversionConfig,
    batch: bool,
    verbose: bool,
) -> Result<()> {
    let meshes = discover_meshes(inputs);
    if meshes.is_empty() {
        Reporter::report_error("No STL files found in the given inputs");
        std::process::exit(1);
    }

    if verbose {
        Reporter::report_info(&format!(
            "Voxelizing {} mesh(es) at resolution {}",
            meshes.len(),
            config.resolution
        ));
    }

    let runner = Runner::new(config, output);
    runner.check_outputs(&meshes)?;
    let start = Instant::now();

    if batch {
        let results = runner.run_batch(&meshes)?;
        report_results(&results, verbose);
        Reporter::report_summary(results.len(), 0, start.elapsed());
        return Ok(());
    }

    let progress = ProgressBar::new(meshes.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let mut results = Vec::with_capacity(meshes.len());
    let mut failed = 0;
    for mesh in &meshes {
        progress.set_message(format!("Voxelizing {}", mesh.display()));
        match runner.run_file(mesh) {
            Ok(result) => results.push(result),
            Err(e) => {
                failed += 1;
                progress.suspend(|| Reporter::report_error(&format!("{}: {:#}", mesh.display(), e)));
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    report_results(&results, verbose);
    Reporter::report_summary(results.len(), failed, start.elapsed());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn report_results(results: &[RunResult], verbose: bool) {
    for result in results {
        if verbose {
            Reporter::report_conversion(result);
        } else {
            println!(
                "Voxelized {} -> {}",
                result.input.display(),
                result.output.display()
            );
        }
    }
}

fn info_command(path: &Path) -> Result<()> {
    if !path.exists() {
        Reporter::report_error(&format!("Grid file not found: {}", path.display()));
        std::process::exit(1);
    }
    let grid = io::import_grid_json(path)?;
    Reporter::report_grid(&path.display().to_string(), &grid);
    Ok(())
}
