use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use octree_patch::prelude::*;

fn config(dimension: usize, level: u8) -> PatchConfig {
    PatchConfig {
        dimension,
        dh: 1.0 / f64::from(1u32 << level),
        max_level: 10,
        ..PatchConfig::default()
    }
}

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap");

    for &level in &[4u8, 6u8] {
        group.bench_with_input(BenchmarkId::new("quadtree", level), &level, |b, &level| {
            b.iter(|| {
                let mut patch = OctreePatch::<QuadTree>::new(&config(2, level)).unwrap();
                black_box(patch.update(true).unwrap());
            });
        });
    }
    for &level in &[2u8, 3u8] {
        group.bench_with_input(BenchmarkId::new("octree", level), &level, |b, &level| {
            b.iter(|| {
                let mut patch = OctreePatch::<OcTree>::new(&config(3, level)).unwrap();
                black_box(patch.update(true).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("refine_corner");

    for &level in &[4u8, 6u8] {
        let mut base = OctreePatch::<QuadTree>::new(&config(2, level)).unwrap();
        base.update(false).unwrap();
        let corner = base.locate_point([0.01, 0.01, 0.0]).unwrap();

        group.bench_with_input(BenchmarkId::new("quadtree", level), &level, |b, _| {
            b.iter_batched(
                || base.clone(),
                |mut patch| {
                    patch.mark_cell_for_refinement(corner).unwrap();
                    black_box(patch.update(true).unwrap());
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_bootstrap, bench_refine);
criterion_main!(benches);
