#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};
use tilt::motion::{AnimationDriver, Orientation, RotationState, SpringParams};
use tilt::options::Options;
use tilt::scene::{Mesh, Model};
use tilt::stage::Stage;

fn spring_step_benchmark(c: &mut Criterion) {
    let spring = SpringParams::default();
    c.bench_function("spring_axis_step", |b| {
        b.iter(|| {
            black_box(spring.step(
                black_box(0.4),
                black_box(-1.2),
                black_box(0.0),
                black_box(1.0 / 60.0),
            ))
        })
    });
}

fn settle_benchmark(c: &mut Criterion) {
    let driver = AnimationDriver::default();
    c.bench_function("settle_from_max_tilt", |b| {
        b.iter(|| {
            let mut state = RotationState::default();
            state.orientation = Orientation::new(0.87, -0.7, 0.25);
            let mut frames = 0_u32;
            while !state.is_at_rest() && frames < 2000 {
                let _ = driver.tick(&mut state, 1.0 / 60.0, true, false);
                frames += 1;
            }
            black_box(frames)
        })
    });
}

fn hit_test_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    for subdivisions in [1_u16, 8, 32] {
        let mut mesh = Mesh::default();
        let step = 2.0 / f32::from(subdivisions);
        for i in 0..subdivisions {
            for j in 0..subdivisions {
                let center = Vec3::new(
                    -1.0 + step * (f32::from(i) + 0.5),
                    -1.0 + step * (f32::from(j) + 0.5),
                    0.0,
                );
                mesh.append(&Mesh::cuboid(center, Vec3::splat(step * 0.9)));
            }
        }
        let Some(model) = Model::new(mesh) else {
            continue;
        };
        let mut stage = Stage::new(&Options::default(), 800, 600);
        let _ = stage.set_model(model);

        group.bench_function(format!("{}_cuboids", u32::from(subdivisions).pow(2)), |b| {
            b.iter(|| black_box(stage.hit(black_box(Vec2::new(0.1, -0.05)))))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    spring_step_benchmark,
    settle_benchmark,
    hit_test_benchmark
);
criterion_main!(benches);
