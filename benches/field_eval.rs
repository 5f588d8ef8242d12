//! Benchmarks for field evaluation and rendering
//!
//! Author: Moroya Sakamoto

use alice_modeler::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");

    let point = Vec3::new(0.5, 0.5, 0.5);

    group.bench_function("sphere", |b| {
        let nodes = upload(&[ModelerNode::sphere(1.0)]).unwrap();
        b.iter(|| field_distance(black_box(&nodes), black_box(point)))
    });

    group.bench_function("box3d", |b| {
        let nodes = upload(&[ModelerNode::box3d(Vec3::ONE)]).unwrap();
        b.iter(|| field_distance(black_box(&nodes), black_box(point)))
    });

    group.bench_function("cylinder", |b| {
        let nodes = upload(&[ModelerNode::cylinder(0.5, 1.0)]).unwrap();
        b.iter(|| field_distance(black_box(&nodes), black_box(point)))
    });

    group.bench_function("heightfield", |b| {
        let nodes = upload(&[ModelerNode::heightfield()]).unwrap();
        b.iter(|| field_distance(black_box(&nodes), black_box(point)))
    });

    group.finish();
}

fn bench_fold(c: &mut Criterion) {
    let mut group = c.benchmark_group("fold");

    let point = Vec3::new(0.5, 0.5, 0.5);
    let nodes = upload(&[
        ModelerNode::sphere(1.0),
        ModelerNode::box3d(Vec3::splat(0.6))
            .with_action(Action::Subtract)
            .with_smoothing(0.1),
        ModelerNode::sphere(0.4)
            .at(Vec3::new(0.8, 0.0, 0.0))
            .with_smoothing(0.2),
        ModelerNode::cylinder(0.3, 1.2)
            .at(Vec3::new(-0.8, 0.0, 0.0))
            .with_noise(0.1),
    ])
    .unwrap();

    group.bench_function("distance_4_nodes", |b| {
        b.iter(|| field_distance(black_box(&nodes), black_box(point)))
    });

    group.bench_function("sample_4_nodes", |b| {
        b.iter(|| field_sample(black_box(&nodes), black_box(point)))
    });

    group.bench_function("normal_4_nodes", |b| {
        b.iter(|| field_normal(black_box(&nodes), black_box(point), 1e-4))
    });

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    let nodes = upload(&[
        ModelerNode::sphere(1.0),
        ModelerNode::box3d(Vec3::splat(0.6)).with_action(Action::Subtract),
    ])
    .unwrap();
    let points: Vec<Vec3> = (0..4096)
        .map(|i| {
            let t = i as f32 * 0.003;
            Vec3::new(t.sin() * 2.0, t.cos() * 2.0, (t * 1.7).sin() * 2.0)
        })
        .collect();

    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("serial_4096", |b| {
        b.iter(|| field_distance_batch(black_box(&nodes), black_box(&points)))
    });
    group.bench_function("parallel_4096", |b| {
        b.iter(|| field_distance_batch_parallel(black_box(&nodes), black_box(&points)))
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(10);

    let nodes = upload(&[
        ModelerNode::sphere(1.0),
        ModelerNode::box3d(Vec3::splat(0.6)).with_action(Action::Subtract),
    ])
    .unwrap();
    let mut scene = RenderScene::default();
    scene
        .push_light(LightDescriptor::Distant {
            direction: Vec3::new(0.2, -1.0, 0.3),
            emission: Vec3::splat(3.0),
        })
        .unwrap();
    let uniform = scene.to_uniform(Vec3::new(0.1, 0.5, 0.9), 0).unwrap();

    group.throughput(Throughput::Elements(64 * 64));
    group.bench_function("frame_64x64", |b| {
        b.iter(|| render_frame(black_box(&uniform), black_box(&nodes), 64, 64).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_primitives, bench_fold, bench_batch, bench_render);
criterion_main!(benches);
