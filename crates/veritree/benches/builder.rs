//! Build and verify throughput benchmarks
//!
//! Run with: cargo bench -p veritree

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use veritree::{verify, TreeBuilder, NODE_SIZE};

/// Generate random data
fn random_data(size: usize) -> Vec<u8> {
    use rand::RngCore;
    let mut data = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut data);
    data
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    let sizes = [(1, "1MB"), (16, "16MB"), (64, "64MB")];

    for (size_mb, size_name) in sizes {
        let size = size_mb * 1024 * 1024;
        let data = random_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("one_shot", size_name), &data, |b, data| {
            let mut tree = vec![0u8; TreeBuilder::tree_length(data.len())];
            b.iter(|| TreeBuilder::build(black_box(data), &mut tree).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("streamed", size_name), &data, |b, data| {
            let mut tree = vec![0u8; TreeBuilder::tree_length(data.len())];
            b.iter(|| {
                let mut builder = TreeBuilder::new();
                builder.init(data.len(), tree.len()).unwrap();
                for chunk in data.chunks(NODE_SIZE) {
                    builder.update(black_box(chunk), &mut tree).unwrap();
                }
                builder.finalize(&mut tree).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("verify");

    let size = 16 * 1024 * 1024;
    let data = random_data(size);
    let mut tree = vec![0u8; TreeBuilder::tree_length(size)];
    let root = TreeBuilder::build(&data, &mut tree).unwrap();
    group.throughput(Throughput::Bytes(size as u64));
    group.bench_function("full_range", |b| {
        b.iter(|| verify(black_box(&data), &tree, 0, size, &root).unwrap())
    });

    group.throughput(Throughput::Bytes(NODE_SIZE as u64));
    group.bench_function("single_node", |b| {
        b.iter(|| verify(black_box(&data), &tree, size / 2, NODE_SIZE, &root).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_verify);
criterion_main!(benches);
