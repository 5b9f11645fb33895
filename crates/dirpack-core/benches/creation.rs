//! Benchmarks for archive creation throughput.
//!
//! Measures the plain writer on flat and nested trees, the cost of ignore
//! rules, and the gzip filter at each named level.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::cast_sign_loss,
    clippy::uninlined_format_args
)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use dirpack_core::ArchiveConfig;
use dirpack_core::CompressionLevel;
use dirpack_core::archive;
use dirpack_core::compress_and_archive;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

/// Creates a flat directory of 1 KB files.
fn create_test_directory(temp: &TempDir, file_count: usize) -> PathBuf {
    let dir = temp.path().join("bench_data");
    fs::create_dir_all(&dir).unwrap();

    let content = "x".repeat(1024);
    for i in 0..file_count {
        fs::write(dir.join(format!("file_{:05}.txt", i)), &content).unwrap();
    }

    dir
}

/// Creates a chain of `depth` nested directories with a few files each.
fn create_nested_directory(temp: &TempDir, depth: usize, files_per_level: usize) -> PathBuf {
    fn create_level(base: &Path, current_depth: usize, max_depth: usize, files: usize) {
        if current_depth >= max_depth {
            return;
        }
        for i in 0..files {
            fs::write(base.join(format!("file_{}.txt", i)), "content\n").unwrap();
        }
        let subdir = base.join(format!("level_{}", current_depth + 1));
        fs::create_dir_all(&subdir).unwrap();
        create_level(&subdir, current_depth + 1, max_depth, files);
    }

    let root = temp.path().join("nested");
    fs::create_dir_all(&root).unwrap();
    create_level(&root, 0, depth, files_per_level);
    root
}

fn bench_flat_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_flat");

    for file_count in [10, 100, 1000] {
        let temp = TempDir::new().unwrap();
        let dir = create_test_directory(&temp, file_count);
        let config = ArchiveConfig::default();

        group.throughput(Throughput::Bytes((file_count * 1024) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(file_count), &dir, |b, dir| {
            b.iter(|| {
                let report = archive(black_box(dir), std::io::sink(), &config).unwrap();
                black_box(report);
            });
        });
    }

    group.finish();
}

fn bench_nested_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_nested");

    for depth in [5, 20] {
        let temp = TempDir::new().unwrap();
        let dir = create_nested_directory(&temp, depth, 5);
        let config = ArchiveConfig::default().with_sorted(true);

        group.bench_with_input(BenchmarkId::from_parameter(depth), &dir, |b, dir| {
            b.iter(|| {
                let report = archive(black_box(dir), std::io::sink(), &config).unwrap();
                black_box(report);
            });
        });
    }

    group.finish();
}

fn bench_ignore_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("archive_ignore_rules");

    let temp = TempDir::new().unwrap();
    let dir = create_test_directory(&temp, 500);
    fs::write(
        dir.join(".gitignore"),
        "# bench rules\n*.tmp\nfile_001*.txt\n!file_00100.txt\nbuild/\n",
    )
    .unwrap();

    for (name, config) in [
        ("none", ArchiveConfig::default()),
        (
            "gitignore",
            ArchiveConfig::default()
                .with_honor_ignore_rules(true)
                .with_exclude_vcs_dir(true),
        ),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            b.iter(|| {
                let report = archive(black_box(&dir), std::io::sink(), config).unwrap();
                black_box(report);
            });
        });
    }

    group.finish();
}

fn bench_compression_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_and_archive");

    let temp = TempDir::new().unwrap();
    let dir = create_test_directory(&temp, 200);
    group.throughput(Throughput::Bytes(200 * 1024));

    for level in CompressionLevel::named() {
        let config = ArchiveConfig::default().with_compression_level(level);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", level)),
            &config,
            |b, config| {
                b.iter(|| {
                    let report =
                        compress_and_archive(black_box(&dir), std::io::sink(), config).unwrap();
                    black_box(report);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_flat_tree,
    bench_nested_tree,
    bench_ignore_rules,
    bench_compression_levels
);
criterion_main!(benches);
