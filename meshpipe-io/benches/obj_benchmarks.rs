//! Benchmarks for the parallel OBJ import pipeline
//!
//! These compare the sequential fallback against the threaded pipeline at
//! several consumer counts and batch sizes, on synthetic models large
//! enough to span many batches.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tempfile::NamedTempFile;

use meshpipe_io::{import_from_bytes, ImportConfig, MeshReader, MeshWriter, ObjReader, ObjWriter};

/// Generate a synthetic OBJ model with the given vertex count
fn generate_obj(vertices: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(vertices * 48);
    for i in 0..vertices {
        let x = (i as f32 * 0.1).sin();
        let y = (i as f32 * 0.1).cos();
        let _ = writeln!(out, "v {} {} {}", x, y, i as f32 * 0.001);
        let _ = writeln!(out, "vt {} {}", x.abs(), y.abs());
        let _ = writeln!(out, "vn 0 0 1");
        if i > 2 {
            let _ = writeln!(out, "f {0}/{0}/{0} {1}/{1}/{1} {2}/{2}/{2}", i - 2, i - 1, i);
        }
    }
    out
}

fn benchmark_import_consumer_counts(c: &mut Criterion) {
    let data = generate_obj(100_000);

    let mut group = c.benchmark_group("obj_import_consumers");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("sequential", |b| {
        let config = ImportConfig::new().with_batch_size(data.len());
        b.iter(|| {
            let mesh = import_from_bytes(&data, &config).expect("import failed");
            black_box(mesh);
        });
    });

    for consumers in [1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("parallel", consumers),
            &consumers,
            |b, &consumers| {
                let config = ImportConfig::new().with_num_consumers(consumers);
                b.iter(|| {
                    let mesh = import_from_bytes(&data, &config).expect("import failed");
                    black_box(mesh);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_import_batch_sizes(c: &mut Criterion) {
    let data = generate_obj(100_000);

    let mut group = c.benchmark_group("obj_import_batch_size");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for batch_kib in [16, 64, 256, 1024] {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_kib),
            &batch_kib,
            |b, &batch_kib| {
                let config = ImportConfig::new().with_batch_size(batch_kib * 1024);
                b.iter(|| {
                    let mesh = import_from_bytes(&data, &config).expect("import failed");
                    black_box(mesh);
                });
            },
        );
    }

    group.finish();
}

fn benchmark_file_round_trip(c: &mut Criterion) {
    let data = generate_obj(50_000);
    let source = NamedTempFile::new().expect("Failed to create temporary file");
    std::fs::write(source.path(), &data).expect("Failed to write fixture");

    let mut group = c.benchmark_group("obj_file_round_trip");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("read_mesh", |b| {
        b.iter(|| {
            let mesh = ObjReader::read_mesh(source.path()).expect("read failed");
            black_box(mesh);
        });
    });

    let mesh = ObjReader::read_mesh(source.path()).expect("read failed");
    group.bench_function("write_mesh", |b| {
        let target = NamedTempFile::new().expect("Failed to create temporary file");
        b.iter(|| {
            ObjWriter::write_mesh(&mesh, target.path()).expect("write failed");
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_import_consumer_counts,
    benchmark_import_batch_sizes,
    benchmark_file_round_trip
);

criterion_main!(benches);
