// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stl_topology::geometry::{build_incidence, Primitive};
use stl_topology::io::{StlReader, StlWriter};
use stl_topology::{build, refine, MeshTopology, RefineOptions, Triangle};

/// Octahedron subdivided onto the unit sphere; 8 * 4^levels faces
fn sphere_soup(levels: u32) -> Vec<Triangle> {
    let base = MeshTopology::from_triangles(&Primitive::octahedron(1.0).triangles());
    let options = RefineOptions::default().levels(levels).on_sphere(1.0);
    refine(&base, &options).topology().face_triangles()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    let soup = sphere_soup(5);
    let binary = StlWriter::binary().to_bytes(&soup).unwrap();
    let ascii = StlWriter::ascii().to_bytes(&soup).unwrap();

    group.bench_function("binary_serial", |b| {
        let reader = StlReader::new().parallel(false);
        b.iter(|| reader.decode(black_box(&binary)).unwrap());
    });

    group.bench_function("binary_parallel", |b| {
        let reader = StlReader::new().parallel(true);
        b.iter(|| reader.decode(black_box(&binary)).unwrap());
    });

    group.bench_function("ascii", |b| {
        let reader = StlReader::new();
        b.iter(|| reader.decode(black_box(&ascii)).unwrap());
    });

    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for levels in [3, 5, 6] {
        let soup = sphere_soup(levels);
        group.bench_with_input(BenchmarkId::new("topology", soup.len()), &soup, |b, soup| {
            b.iter(|| build(black_box(soup)));
        });

        let topology = build(&soup);
        group.bench_with_input(
            BenchmarkId::new("incidence", soup.len()),
            &topology,
            |b, topology| {
                b.iter(|| build_incidence(black_box(topology)));
            },
        );
    }

    group.finish();
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("refine");

    let cube = MeshTopology::from_triangles(&Primitive::cube(10.0).triangles());
    for levels in [1, 3] {
        let options = RefineOptions::default().levels(levels);
        group.bench_with_input(BenchmarkId::new("cube", levels), &options, |b, options| {
            b.iter(|| refine(black_box(&cube), options));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_build, bench_refine);
criterion_main!(benches);
