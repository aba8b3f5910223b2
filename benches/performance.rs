// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meshvox::geometry::primitives;
use meshvox::voxel::{normalize, rasterize, subdivide, subdivide_par};
use meshvox::{ConversionConfig, MeshBatch, Voxelizer};

fn bench_subdivide(c: &mut Criterion) {
    let mut group = c.benchmark_group("subdivide");

    let sphere = primitives::uv_sphere(1.0, 32);
    let normalized = normalize(&[sphere.vertices.clone()], 64, None, None).unwrap();
    let points = &normalized[0];

    for resolution in [32, 64, 128] {
        group.bench_with_input(BenchmarkId::new("sequential", resolution), &resolution, |b, &r| {
            b.iter(|| subdivide(black_box(points), black_box(&sphere.faces), r));
        });
        group.bench_with_input(BenchmarkId::new("parallel", resolution), &resolution, |b, &r| {
            b.iter(|| subdivide_par(black_box(points), black_box(&sphere.faces), r));
        });
    }

    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let mut group = c.benchmark_group("rasterize");

    let sphere = primitives::uv_sphere(1.0, 32);
    let normalized = normalize(&[sphere.vertices.clone()], 128, None, None).unwrap();
    let samples = subdivide(&normalized[0], &sphere.faces, 128);

    group.bench_function("dense_128", |b| {
        b.iter(|| rasterize(black_box(&samples), 128, false).unwrap());
    });

    group.bench_function("sparse_128", |b| {
        b.iter(|| rasterize(black_box(&samples), 128, true).unwrap());
    });

    group.finish();
}

fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    let sphere = primitives::uv_sphere(10.0, 32);
    let cube = primitives::cube(10.0);

    for resolution in [16, 32, 64] {
        let voxelizer = Voxelizer::new(ConversionConfig::new(resolution).sparse(true));
        group.bench_with_input(BenchmarkId::new("sphere", resolution), &sphere, |b, mesh| {
            b.iter(|| voxelizer.convert_mesh(black_box(mesh)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("cube", resolution), &cube, |b, mesh| {
            b.iter(|| voxelizer.convert_mesh(black_box(mesh)).unwrap());
        });
    }

    // Same topology, eight scaled copies
    let batch = MeshBatch::new(
        (1..=8)
            .map(|k| sphere.vertices.iter().map(|v| v * k as f64).collect())
            .collect(),
        sphere.faces.clone(),
    );
    let voxelizer = Voxelizer::new(ConversionConfig::new(32));
    group.bench_function("batch_8_spheres", |b| {
        b.iter(|| voxelizer.convert(black_box(&batch)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_subdivide, bench_rasterize, bench_convert);
criterion_main!(benches);
