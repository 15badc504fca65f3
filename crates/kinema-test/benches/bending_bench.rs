//! Benchmarks for KINEMA reconciliation

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kinema_core::{BendingConfig, EntityId, PlayerId, Quat, Vec3};
use kinema_state::{physics_handle, EntityState, NetEntity, RigidBody};
use kinema_test::{Craft, SimConfig, SimWorld};

fn remote(x: f32) -> EntityState {
    let mut state = EntityState::new(EntityId::new(1), PlayerId::new(1));
    state.position = Vec3::new(x, 1.0, -2.0);
    state.orientation = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.7);
    state.velocity = Vec3::new(3.0, 0.0, 0.0);
    state
}

fn bench_receive_authoritative(c: &mut Criterion) {
    let mut net = NetEntity::new(remote(0.0));
    let update = remote(2.5);

    c.bench_function("receive_authoritative", |b| {
        b.iter(|| {
            net.receive_authoritative(black_box(&update)).unwrap();
        })
    });
}

fn bench_bending_episode(c: &mut Criterion) {
    let update = remote(2.5);

    c.bench_function("bending_episode_6", |b| {
        b.iter(|| {
            let mut net = NetEntity::new(remote(0.0));
            net.receive_authoritative(&update).unwrap();
            while net.is_bending() {
                net.apply_incremental_bending();
            }
            black_box(net.entity().position)
        })
    });
}

fn bench_bending_with_physics(c: &mut Criterion) {
    let update = Craft::new(EntityId::new(1), PlayerId::new(1));

    c.bench_function("bending_episode_physics", |b| {
        b.iter(|| {
            let mut net = NetEntity::with_config(
                Craft::new(EntityId::new(1), PlayerId::new(1)),
                BendingConfig::smooth(),
            )
            .unwrap();
            net.bind_physics(physics_handle(RigidBody::default()));
            net.receive_authoritative(&update).unwrap();
            while net.is_bending() {
                net.apply_incremental_bending();
                net.pull_from_physics();
            }
            black_box(net.entity().hull)
        })
    });
}

fn bench_sim_step(c: &mut Criterion) {
    let mut world = SimWorld::new(SimConfig::light()).unwrap();

    c.bench_function("sim_world_step", |b| {
        b.iter(|| {
            world.step().unwrap();
        })
    });
}

criterion_group!(
    benches,
    bench_receive_authoritative,
    bench_bending_episode,
    bench_bending_with_physics,
    bench_sim_step,
);

criterion_main!(benches);
