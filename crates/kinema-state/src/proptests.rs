//! Property tests for the bending schedule

use kinema_core::{EntityId, PlayerId, Quat, Vec3};
use proptest::prelude::*;

use crate::{EntityState, NetEntity};

prop_compose! {
    fn arb_vec3()(x in -100.0f32..100.0, y in -100.0f32..100.0, z in -100.0f32..100.0) -> Vec3 {
        Vec3::new(x, y, z)
    }
}

prop_compose! {
    fn arb_quat()(axis in arb_vec3(), angle in -3.0f32..3.0) -> Quat {
        Quat::from_axis_angle(axis, angle)
    }
}

prop_compose! {
    fn arb_state()(
        position in arb_vec3(),
        orientation in arb_quat(),
        velocity in arb_vec3(),
        angular_velocity in arb_vec3(),
    ) -> EntityState {
        let mut state = EntityState::new(EntityId::new(11), PlayerId::new(3));
        state.position = position;
        state.orientation = orientation;
        state.velocity = velocity;
        state.angular_velocity = angular_velocity;
        state
    }
}

fn start(predicted: &EntityState, authoritative: &EntityState, strength: f32, n: u32) -> NetEntity<EntityState> {
    let mut net = NetEntity::new(predicted.clone());
    net.save_state(None);
    net.apply_authoritative(authoritative);
    net.start_reconciliation(strength, n).unwrap();
    net
}

proptest! {
    #[test]
    fn full_strength_converges_exactly(
        predicted in arb_state(),
        authoritative in arb_state(),
        n in 1u32..24,
    ) {
        let mut net = start(&predicted, &authoritative, 1.0, n);
        for _ in 0..n {
            net.apply_incremental_bending();
        }
        prop_assert_eq!(net.entity().position, authoritative.position);
        prop_assert_eq!(net.entity().orientation, authoritative.orientation);
        prop_assert_eq!(net.bending_increments(), 0);
    }

    #[test]
    fn partial_strength_leaves_residual(
        predicted in arb_vec3(),
        offset in arb_vec3(),
        strength in 0.05f32..0.95,
        n in 1u32..12,
    ) {
        prop_assume!(offset.length() > 1.0);

        let mut from = EntityState::new(EntityId::new(1), PlayerId::UNOWNED);
        from.position = predicted;
        let mut to = from.clone();
        to.position = predicted + offset;

        let mut net = start(&from, &to, strength, n);
        let d0 = net.residual_distance().unwrap();
        for _ in 0..n {
            net.apply_incremental_bending();
        }

        let expected = (1..=n).fold(d0, |d, k| d * (1.0 - strength / k as f32));
        let residual = net.entity().position.distance(&to.position);
        prop_assert!(residual > 0.0);
        prop_assert!((residual - expected).abs() <= expected * 1e-3 + 1e-3,
            "residual {} expected {}", residual, expected);

        let settled = net.entity().clone();
        for _ in 0..5 {
            net.apply_incremental_bending();
        }
        prop_assert_eq!(net.entity(), &settled);
    }

    #[test]
    fn partial_strength_leaves_angular_residual(
        base in arb_quat(),
        axis in arb_vec3(),
        angle in 0.5f32..2.5,
        strength in 0.05f32..0.95,
        n in 1u32..6,
    ) {
        prop_assume!(axis.length() > 1.0);

        let mut from = EntityState::new(EntityId::new(1), PlayerId::UNOWNED);
        from.orientation = base;
        let mut to = from.clone();
        to.orientation = Quat::from_axis_angle(axis, angle).mul(&base).normalize();

        let mut net = start(&from, &to, strength, n);
        let theta0 = net.residual_angle().unwrap();
        for _ in 0..n {
            net.apply_incremental_bending();
        }

        let expected = (1..=n).fold(theta0, |a, k| a * (1.0 - strength / k as f32));
        let residual = net.entity().orientation.angle_to(&to.orientation);
        prop_assert!((residual - expected).abs() <= expected * 2e-2 + 2e-3,
            "residual {} expected {}", residual, expected);
        prop_assert_eq!(net.entity().position, from.position);
    }

    #[test]
    fn idle_step_changes_nothing(state in arb_state()) {
        let mut net = NetEntity::new(state.clone());
        net.apply_incremental_bending();
        prop_assert_eq!(net.entity(), &state);
    }

    #[test]
    fn velocities_are_never_blended(
        predicted in arb_state(),
        authoritative in arb_state(),
        strength in 0.01f32..=1.0,
        n in 1u32..30,
    ) {
        let net = start(&predicted, &authoritative, strength, n);
        prop_assert_eq!(net.entity().velocity, authoritative.velocity);
        prop_assert_eq!(net.entity().angular_velocity, authoritative.angular_velocity);
        prop_assert_eq!(net.entity().position, predicted.position);
        prop_assert_eq!(net.entity().orientation, predicted.orientation);
    }

    #[test]
    fn authoritative_sync_is_exact(local in arb_state(), remote in arb_state()) {
        let mut net = NetEntity::new(local);
        let mut remote = remote;
        remote.id = EntityId::new(77);
        remote.player_id = PlayerId::new(9);
        net.apply_authoritative(&remote);
        prop_assert_eq!(net.entity(), &remote);

        let copy = remote.clone();
        remote.position = remote.position + Vec3::new(1.0, 1.0, 1.0);
        prop_assert_eq!(net.entity(), &copy);
    }
}
