// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL mesh importer

use crate::geometry::{MeshBatch, TriangleMesh};
use anyhow::{bail, Context, Result};
use log::debug;
use nalgebra::Point3;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Read an ASCII or binary STL stream into an indexed mesh
pub fn read_stl<R: Read + Seek>(reader: &mut R) -> Result<TriangleMesh> {
    let stl = stl_io::read_stl(reader).context("Failed to read STL contents")?;

    let vertices = stl
        .vertices
        .iter()
        .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
        .collect();
    let faces = stl.faces.iter().map(|face| face.vertices).collect();

    Ok(TriangleMesh::new(vertices, faces))
}

/// Import an STL file
pub fn import_stl(path: impl AsRef<Path>) -> Result<TriangleMesh> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open STL file: {:?}", path))?;
    let mut reader = BufReader::new(file);

    let mesh = read_stl(&mut reader).with_context(|| format!("Failed to parse STL file: {:?}", path))?;
    debug!(
        "Imported {:?}: {} vertices, {} faces",
        path,
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// Import several STL files that share one topology as a single batch.
///
/// Every file must have the same face list as the first one.
pub fn import_stl_batch<P: AsRef<Path>>(paths: &[P]) -> Result<MeshBatch> {
    let mut batch = MeshBatch::default();

    for (i, path) in paths.iter().enumerate() {
        let mesh = import_stl(path)?;
        if i == 0 {
            batch.faces = mesh.faces;
        } else if mesh.faces != batch.faces {
            bail!(
                "{:?} does not share the topology of {:?} ({} vs {} faces)",
                path.as_ref(),
                paths[0].as_ref(),
                mesh.faces.len(),
                batch.faces.len()
            );
        }
        batch.push_item(mesh.vertices);
    }

    Ok(batch)
}
