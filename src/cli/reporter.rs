// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use super::runner::RunResult;
use crate::voxel::VoxelGrid;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report one converted file
    pub fn report_conversion(result: &RunResult) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Voxelized:".bold(), result.input.display().to_string().cyan());
        println!("{}", "━".repeat(80).bright_black());
        println!(
            "  {} {}",
            "Vertices:".bright_black(),
            result.vertex_count.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Faces:".bright_black(),
            result.face_count.to_string().cyan()
        );
        Self::print_grid(&result.grid);
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(result.duration).yellow()
        );
        println!(
            "  {} {}",
            "Output:".bright_black(),
            result.output.display().to_string().cyan()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report a saved grid
    pub fn report_grid(name: &str, grid: &VoxelGrid) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "Grid:".bold(), name.cyan());
        println!("{}", "━".repeat(80).bright_black());
        Self::print_grid(grid);
        println!("{}", "━".repeat(80).bright_black());
    }

    fn print_grid(grid: &VoxelGrid) {
        let r = grid.resolution();
        let occupied = grid.occupied_count();
        // Sparse grids may have more cells than usize can count
        let total = (r as f64).powi(3);
        println!(
            "  {} {}³ ({})",
            "Resolution:".bright_black(),
            r.to_string().cyan(),
            if grid.is_sparse() { "sparse" } else { "dense" }
        );
        println!(
            "  {} {} {}",
            "Occupied:".bright_black(),
            occupied.to_string().green(),
            format!("({:.2}%)", Self::occupancy(occupied, total) * 100.0).bright_black()
        );
    }

    /// Print batch summary
    pub fn report_summary(converted: usize, failed: usize, elapsed: Duration) {
        println!("\n{}", "═".repeat(80).bright_black());
        println!("{}", "Conversion Summary".bold());
        println!("{}", "═".repeat(80).bright_black());
        println!(
            "  {} {}",
            "Converted:".bright_black(),
            converted.to_string().green()
        );
        println!(
            "  {} {}",
            "Failed:".bright_black(),
            if failed > 0 {
                failed.to_string().red()
            } else {
                failed.to_string().green()
            }
        );
        println!(
            "  {} {}",
            "Total time:".bright_black(),
            Self::format_duration(elapsed).yellow()
        );
        println!("{}", "═".repeat(80).bright_black());
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn occupancy(occupied: usize, total: f64) -> f64 {
        if total == 0.0 {
            0.0
        } else {
            occupied as f64 / total
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
