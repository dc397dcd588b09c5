//! # Field Benchmark
//!
//! Per-frame cost of the particle field: one tick and one repaint into a
//! draw list, for the default 45 particles and a denser 1000.
//!
//! Run with: `cargo bench --bench field_tick`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glowfolio::config::Variant;
use glowfolio::content::Content;
use glowfolio::prelude::*;
use glowfolio::signals::SignalHub;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn field(count: usize, config: FieldConfig) -> ParticleField {
    let mut rng = SmallRng::seed_from_u64(42);
    let config = FieldConfig { count, ..config };
    ParticleField::new(config, Viewport::new(1920.0, 1080.0, 2.0), &mut rng)
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_tick");
    for count in [45usize, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut field = field(count, FieldConfig::default());
            b.iter(|| {
                field.tick();
                black_box(field.particles().len())
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_render");
    for variant in [Variant::Dots, Variant::Glow] {
        let name = format!("{variant:?}");
        let mut field = field(45, variant.preset().field);
        let mut list = DrawList::with_capacity(128);
        group.bench_function(name, |b| {
            b.iter(|| {
                list.reset();
                field.tick();
                field.render(&mut list);
                black_box(list.len())
            });
        });
    }
    group.finish();
}

fn bench_page_frame(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut hub = SignalHub::new();
    let config = PageConfig::default();
    let mut page = Page::mount(
        config,
        Content::default(),
        Viewport::new(1440.0, 900.0, 1.0),
        &mut hub,
        &mut rng,
    );
    let mut list = DrawList::with_capacity(512);
    let mut clock = FrameClock::fixed(1.0 / 60.0);

    c.bench_function("page_frame", |b| {
        b.iter(|| {
            clock.update();
            list.reset();
            if let Some(signal) = page.scroll_by(3.0) {
                page.signal(&hub, signal);
            }
            page.frame(clock.now(), &mut list);
            black_box(list.len())
        });
    });
}

criterion_group!(benches, bench_tick, bench_render, bench_page_frame);
criterion_main!(benches);
