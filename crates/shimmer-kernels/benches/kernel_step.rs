//! Kernel step throughput at interactive resolutions.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use shimmer_grid::{DoubleBuffer, EdgeBehavior, Grid};
use shimmer_kernels::{
    Disturbance, GradientExtractor, InjectionProfile, SourceInjector, ThermalKernel, UpdateKernel,
    WaveKernel,
};

fn seeded_buffers(grid: &Grid, kernel: &dyn UpdateKernel) -> DoubleBuffer {
    let mut db = DoubleBuffer::new(grid.cell_count(), &kernel.rest_state()).unwrap();
    let injector = SourceInjector::new(kernel.injection_profile());
    let disturbance = Disturbance {
        center: (0.0, 0.0),
        radius: 0.25,
        strength: 0.5,
        value: match kernel.injection_profile() {
            InjectionProfile::Blend => 100.0,
            InjectionProfile::Additive => 0.05,
        },
    };
    {
        let (prev, mut next) = db.split();
        injector
            .inject(grid, &prev, &mut next, kernel.primary_channel(), &disturbance)
            .unwrap();
    }
    db.swap().unwrap();
    db
}

fn bench_kernels(c: &mut Criterion) {
    let grid = Grid::new(256, 1.0, EdgeBehavior::Clamp).unwrap();

    let thermal = ThermalKernel::builder().build().unwrap();
    c.bench_function("thermal_step_256", |b| {
        b.iter_batched_ref(
            || seeded_buffers(&grid, &thermal),
            |db| {
                {
                    let (prev, mut next) = db.split();
                    thermal.step(&grid, &prev, &mut next, 0.016).unwrap();
                }
                db.swap().unwrap();
            },
            BatchSize::LargeInput,
        );
    });

    let wave = WaveKernel::builder().build().unwrap();
    c.bench_function("wave_step_256", |b| {
        b.iter_batched_ref(
            || seeded_buffers(&grid, &wave),
            |db| {
                {
                    let (prev, mut next) = db.split();
                    wave.step(&grid, &prev, &mut next, 1.0).unwrap();
                }
                db.swap().unwrap();
            },
            BatchSize::LargeInput,
        );
    });

    c.bench_function("gradient_extract_256", |b| {
        let db = seeded_buffers(&grid, &thermal);
        let extractor = GradientExtractor::new();
        b.iter(|| {
            extractor
                .extract(&grid, &db.current(), thermal.primary_channel())
                .unwrap()
        });
    });
}

criterion_group!(benches, bench_kernels);
criterion_main!(benches);
