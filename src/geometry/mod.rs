// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation and bounds

mod bbox;
mod mesh;
pub mod primitives;

pub use bbox::BoundingBox;
pub use mesh::{validate_batch, Face, MeshBatch, TriangleMesh};
