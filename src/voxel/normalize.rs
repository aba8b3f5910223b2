// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mapping raw vertices into the unit cube

use crate::error::{Result, VoxelError};
use crate::geometry::BoundingBox;
use crate::utils::math::is_finite_point;
use log::warn;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Per-item offset and isotropic scale.
///
/// A vertex `v` normalizes to `(v - origin) / scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParams {
    pub origin: Point3<f64>,
    pub scale: f64,
}

impl NormalizationParams {
    pub fn new(origin: Point3<f64>, scale: f64) -> Self {
        Self { origin, scale }
    }

    /// Derive origin and scale from the item's own extent.
    ///
    /// `origin` is the per-axis minimum; `scale` is the largest side of the
    /// bounding box. An item whose vertices all coincide gets scale 1; an
    /// extent too large to represent is a [`VoxelError::InvalidScale`].
    pub fn from_vertices(vertices: &[Point3<f64>]) -> Result<Self> {
        let bbox = BoundingBox::from_points(vertices);
        let scale = derive_scale(0, &bbox, &bbox.min)?;
        Ok(Self::new(bbox.min, scale))
    }

    /// Map one vertex into normalized coordinates
    #[inline]
    pub fn apply(&self, vertex: &Point3<f64>) -> Point3<f64> {
        Point3::from((vertex - self.origin) / self.scale)
    }

    /// Resolve optional per-item overrides into concrete params.
    ///
    /// Missing origins default to the item minimum. Missing scales default to
    /// the largest per-axis distance from the origin to the item maximum.
    pub fn resolve(
        vertices: &[Vec<Point3<f64>>],
        origin: Option<&[Point3<f64>]>,
        scale: Option<&[f64]>,
    ) -> Result<Vec<Self>> {
        let batch_size = vertices.len();

        if let Some(origin) = origin {
            check_count("origin", batch_size, origin.len())?;
            if let Some(item) = origin.iter().position(|o| !is_finite_point(o)) {
                return Err(VoxelError::NonFiniteOrigin { item });
            }
        }
        if let Some(scale) = scale {
            check_count("scale", batch_size, scale.len())?;
            for (item, &s) in scale.iter().enumerate() {
                if !(s.is_finite() && s > 0.0) {
                    return Err(VoxelError::InvalidScale { item, scale: s });
                }
            }
        }

        vertices
            .iter()
            .enumerate()
            .map(|(item, points)| {
                let bbox = BoundingBox::from_points(points);
                let origin = origin.map_or(bbox.min, |o| o[item]);
                let scale = match scale {
                    Some(s) => s[item],
                    None => derive_scale(item, &bbox, &origin)?,
                };
                Ok(Self::new(origin, scale))
            })
            .collect()
    }
}

fn check_count(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(VoxelError::ParamCountMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

fn derive_scale(item: usize, bbox: &BoundingBox, origin: &Point3<f64>) -> Result<f64> {
    let scale = (bbox.max - origin).max();
    if !scale.is_finite() {
        // Extent overflowed f64
        return Err(VoxelError::InvalidScale { item, scale });
    }
    if scale > 0.0 {
        Ok(scale)
    } else {
        warn!(
            "Batch item {} has no extent past its origin (derived scale {}), using scale 1",
            item, scale
        );
        Ok(1.0)
    }
}

/// Normalize a single item with resolved params
pub fn normalize_item(vertices: &[Point3<f64>], params: &NormalizationParams) -> Vec<Point3<f64>> {
    vertices.iter().map(|v| params.apply(v)).collect()
}

/// Normalize every item of a batch into the unit cube.
///
/// `resolution` is only validated here; it does not affect the mapping.
pub fn normalize(
    vertices: &[Vec<Point3<f64>>],
    resolution: usize,
    origin: Option<&[Point3<f64>]>,
    scale: Option<&[f64]>,
) -> Result<Vec<Vec<Point3<f64>>>> {
    if resolution == 0 {
        return Err(VoxelError::InvalidResolution(resolution));
    }
    for (item, points) in vertices.iter().enumerate() {
        if points.is_empty() {
            return Err(VoxelError::EmptyItem { item });
        }
        if let Some(vertex) = points.iter().position(|v| !is_finite_point(v)) {
            return Err(VoxelError::NonFiniteVertex { item, vertex });
        }
    }

    let params = NormalizationParams::resolve(vertices, origin, scale)?;
    Ok(vertices
        .iter()
        .zip(&params)
        .map(|(points, p)| normalize_item(points, p))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn item() -> Vec<Point3<f64>> {
        vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(5.0, 3.0, 4.0),
            Point3::new(2.0, 2.0, 5.0),
        ]
    }

    #[test]
    fn test_default_params() {
        let params = NormalizationParams::from_vertices(&item()).unwrap();
        assert_eq!(params.origin, Point3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(params.scale, 4.0);
    }

    #[test]
    fn test_normalize_into_unit_cube() {
        let normalized = normalize(&[item()], 8, None, None).unwrap();
        let points = &normalized[0];

        assert_eq!(points[0], Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(points[1].x, 1.0);
        assert_relative_eq!(points[1].y, 0.25);
        assert_relative_eq!(points[2].z, 0.5);
        for p in points {
            assert!(p.iter().all(|&c| (0.0..=1.0).contains(&c)));
        }
    }

    #[test]
    fn test_supplied_origin_derives_scale_from_it() {
        let origin = [Point3::new(0.0, 0.0, 0.0)];
        let params = NormalizationParams::resolve(&[item()], Some(&origin), None).unwrap();
        assert_relative_eq!(params[0].scale, 5.0);
    }

    #[test]
    fn test_supplied_scale() {
        let normalized = normalize(&[item()], 4, Some(&[Point3::origin()]), Some(&[10.0])).unwrap();
        assert_relative_eq!(normalized[0][1].x, 0.5);
    }

    #[test]
    fn test_degenerate_item_gets_unit_scale() {
        let points = vec![Point3::new(2.0, 2.0, 2.0); 3];
        let params = NormalizationParams::from_vertices(&points).unwrap();
        assert_eq!(params.scale, 1.0);
        assert_eq!(params.apply(&points[0]), Point3::origin());
    }

    #[test]
    fn test_overflowing_extent_is_rejected() {
        let points = vec![
            Point3::new(-1e308, 0.0, 0.0),
            Point3::new(1e308, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(matches!(
            NormalizationParams::from_vertices(&points),
            Err(VoxelError::InvalidScale { item: 0, .. })
        ));
        assert!(matches!(
            normalize(&[item(), points.clone()], 4, None, None),
            Err(VoxelError::InvalidScale { item: 1, .. })
        ));
        // An explicit scale sidesteps the derived extent
        let normalized = normalize(&[points], 4, Some(&[Point3::origin()]), Some(&[1e308])).unwrap();
        assert_relative_eq!(normalized[0][0].x, -1.0);
        assert_relative_eq!(normalized[0][1].x, 1.0);
    }

    #[test]
    fn test_non_finite_vertex_is_rejected() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(f64::NAN, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        assert_eq!(
            normalize(&[item(), points], 4, None, None),
            Err(VoxelError::NonFiniteVertex { item: 1, vertex: 1 })
        );

        let infinite = vec![Point3::new(0.0, f64::INFINITY, 0.0)];
        assert_eq!(
            normalize(&[infinite], 4, Some(&[Point3::origin()]), Some(&[1.0])),
            Err(VoxelError::NonFiniteVertex { item: 0, vertex: 0 })
        );
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            normalize(&[item()], 0, None, None),
            Err(VoxelError::InvalidResolution(0))
        );
        assert_eq!(
            normalize(&[item()], 4, None, Some(&[0.0])),
            Err(VoxelError::InvalidScale { item: 0, scale: 0.0 })
        );
        assert!(matches!(
            normalize(&[item()], 4, None, Some(&[-1.0])),
            Err(VoxelError::InvalidScale { .. })
        ));
        assert!(matches!(
            normalize(&[item()], 4, Some(&[Point3::new(f64::NAN, 0.0, 0.0)]), None),
            Err(VoxelError::NonFiniteOrigin { item: 0 })
        ));
        assert_eq!(
            normalize(&[item(), item()], 4, None, Some(&[1.0])),
            Err(VoxelError::ParamCountMismatch {
                what: "scale",
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            normalize(&[Vec::new()], 4, None, None),
            Err(VoxelError::EmptyItem { item: 0 })
        );
    }
}
