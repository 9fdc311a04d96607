//! Criterion benchmarks for the phase-field step.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use dendrite_sim::grid::Shape2D;
use dendrite_sim::initial_states::set_nucleus_at_corner;
use dendrite_sim::params::SimulationParameters;
use dendrite_sim::scalar_field::ScalarField2D;
use dendrite_sim::solver::{PhaseField2D, PredictScratch};
use dendrite_sim::stencil::{conv2d, Boundary, StencilFilter};

fn setup(n: usize) -> (PhaseField2D, ScalarField2D) {
    let mut params = SimulationParameters::pure_ni().with_inputs(-0.2, 16.0);
    params.setup().unwrap();
    let solver = PhaseField2D::new(&params).unwrap();
    let mut phi = ScalarField2D::new(Shape2D::new(n, n));
    set_nucleus_at_corner(&mut phi, 10).unwrap();
    (solver, phi)
}

/// Benchmark: one step on a 100x100 grid, scratch reused across iterations.
fn bench_predict_100(c: &mut Criterion) {
    let (solver, phi) = setup(100);
    let mut out = ScalarField2D::like(&phi);
    let mut scratch = PredictScratch::new(phi.shape());

    c.bench_function("predict_100x100", |b| {
        b.iter(|| {
            solver
                .predict_with_scratch(black_box(&phi), &mut out, &mut scratch)
                .unwrap();
            black_box(&out);
        });
    });
}

/// Benchmark: one step on a 100x100 grid, fresh scratch per call.
fn bench_predict_100_alloc(c: &mut Criterion) {
    let (solver, phi) = setup(100);

    c.bench_function("predict_100x100_alloc", |b| {
        b.iter(|| black_box(solver.predict_new(black_box(&phi)).unwrap()));
    });
}

/// Benchmark: a single Laplacian pass on a 400x400 grid.
fn bench_laplacian_400(c: &mut Criterion) {
    let (_, phi) = setup(400);
    let filter = StencilFilter::laplacian(1.0);
    let mut out = ScalarField2D::like(&phi);

    c.bench_function("laplacian_400x400", |b| {
        b.iter(|| {
            conv2d(black_box(&phi), &filter, Boundary::Replicate, &mut out).unwrap();
            black_box(&out);
        });
    });
}

criterion_group!(
    benches,
    bench_predict_100,
    bench_predict_100_alloc,
    bench_laplacian_400
);
criterion_main!(benches);
