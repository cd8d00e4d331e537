//! Hot-path benchmarks: propagation fixpoint, entropy selection, and
//! full model runs.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use quell_core::{Heuristic, Model, Mulberry32};
use quell_models::{OverlappingModel, OverlappingOptions};
use quell_solver::{heuristics, Compatibility, Propagator, Solver, Wave};
use quell_space::{EdgeBehavior, Grid};
use quell_test_utils::checkerboard_sample;

fn bench_propagate(c: &mut Criterion) {
    let grid = Grid::new(64, 64, EdgeBehavior::Wrap).unwrap();
    let compat = Compatibility::build(2, |t, _, t2| t != t2);
    c.bench_function("propagate_full_cascade_64x64", |b| {
        b.iter_batched(
            || {
                let wave = Wave::new(grid.cell_count(), &[1.0, 1.0]).unwrap();
                let propagator = Propagator::new(grid, compat.clone());
                (wave, propagator)
            },
            |(mut wave, mut propagator)| {
                wave.remove(0, 1);
                propagator.push(0, 1);
                assert!(propagator.propagate(&mut wave));
                black_box(wave.remaining(grid.cell_count() - 1))
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_entropy_scan(c: &mut Criterion) {
    let wave = Wave::new(64 * 64, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    c.bench_function("entropy_scan_64x64", |b| {
        let mut rng = Mulberry32::new(1);
        b.iter(|| black_box(heuristics::lowest_entropy(&wave, &mut rng)))
    });
}

fn bench_solver_run(c: &mut Criterion) {
    let grid = Grid::new(32, 32, EdgeBehavior::Wrap).unwrap();
    let compat = Compatibility::build(3, |t, _, t2| (t as i32 - t2 as i32).abs() <= 1);
    c.bench_function("solver_run_32x32_banded", |b| {
        b.iter_batched(
            || Solver::new(grid, &[1.0, 2.0, 0.5], compat.clone(), Heuristic::Entropy, 42).unwrap(),
            |mut solver| {
                assert!(solver.run(10_000));
                black_box(solver.metrics().steps)
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_overlapping_run(c: &mut Criterion) {
    let (pixels, w, h) = checkerboard_sample();
    c.bench_function("overlapping_checkerboard_16x16", |b| {
        b.iter_batched(
            || {
                OverlappingModel::new(
                    &pixels,
                    w,
                    h,
                    OverlappingOptions {
                        pattern_size: 2,
                        periodic: true,
                        width: 16,
                        height: 16,
                        seed: 1,
                        ..OverlappingOptions::default()
                    },
                )
                .unwrap()
            },
            |mut model| {
                assert!(model.run(10_000));
                black_box(model.state().collapsed_cells)
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_propagate,
    bench_entropy_scan,
    bench_solver_run,
    bench_overlapping_run
);
criterion_main!(benches);
