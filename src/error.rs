// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for mesh voxelization

use thiserror::Error;

/// Errors raised by the conversion pipeline.
///
/// Every variant describes an invalid argument: the computation is
/// deterministic, so the same input always fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VoxelError {
    /// Resolution was zero, or too large for a dense grid.
    #[error("Invalid resolution {0}: must be positive and its cube must fit in memory")]
    InvalidResolution(usize),

    /// A face references a vertex that does not exist.
    #[error("Face {face} references vertex {index}, but only {vertex_count} vertices exist")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    /// A supplied or derived scale was not a positive finite number.
    #[error("Scale for batch item {item} must be positive and finite, got {scale}")]
    InvalidScale { item: usize, scale: f64 },

    /// A caller-supplied origin had a NaN or infinite coordinate.
    #[error("Origin for batch item {item} has a non-finite coordinate")]
    NonFiniteOrigin { item: usize },

    /// A vertex had a NaN or infinite coordinate.
    #[error("Vertex {vertex} of batch item {item} has a non-finite coordinate")]
    NonFiniteVertex { item: usize, vertex: usize },

    /// A batch item had no vertices.
    #[error("Batch item {item} has no vertices")]
    EmptyItem { item: usize },

    /// Batch items disagree on vertex count.
    #[error("Batch item {item} has {actual} vertices, expected {expected}")]
    VertexCountMismatch {
        item: usize,
        expected: usize,
        actual: usize,
    },

    /// Per-item parameters do not match the batch size.
    #[error("Expected {expected} {what} values (one per batch item), got {actual}")]
    ParamCountMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Subdivision would exceed the configured point budget.
    #[error("Batch item {item} would produce {projected} sample points, exceeding the limit of {max}")]
    TooManyPoints {
        item: usize,
        projected: usize,
        max: usize,
    },

    /// A normalized point fell outside the unit cube under the reject policy.
    #[error("Normalized point ({x}, {y}, {z}) lies outside the unit cube")]
    PointOutOfRange { x: f64, y: f64, z: f64 },

    /// A point reached the rasterizer with a NaN or infinite coordinate.
    #[error("Point ({x}, {y}, {z}) has a non-finite coordinate")]
    NonFinitePoint { x: f64, y: f64, z: f64 },
}

/// Result type for voxelization operations.
pub type Result<T> = std::result::Result<T, VoxelError>;
