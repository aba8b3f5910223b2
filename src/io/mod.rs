// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mesh import and grid persistence

mod export;
mod importer;

pub use export::{export_grid_json, import_grid_json};
pub use importer::{import_stl, import_stl_batch, read_stl};
