//! State sync - applying an authoritative update onto an entity

use crate::{PhysicsBinding, SimEntity};

/// Copy identity and kinematics from `other` and write them through to the
/// physics body if one is bound. No smoothing happens here.
pub fn apply_authoritative<E: SimEntity>(entity: &mut E, other: &E, physics: &PhysicsBinding) {
    entity.sync_from(other);
    physics.push(entity.base());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{physics_handle, EntityState, PhysicsBody, RigidBody};
    use kinema_core::{EntityId, PlayerId, Quat, Vec3};

    fn remote() -> EntityState {
        let mut other = EntityState::new(EntityId::new(9), PlayerId::new(4));
        other.position = Vec3::new(1.5, -2.0, 0.25);
        other.orientation = Quat::from_axis_angle(Vec3::new(0.0, 1.0, 0.0), 0.7);
        other.velocity = Vec3::new(0.0, 3.0, 0.0);
        other.angular_velocity = Vec3::new(0.1, 0.0, 0.0);
        other
    }

    #[test]
    fn test_bit_exact_copy() {
        let mut entity = EntityState::new(EntityId::new(1), PlayerId::UNOWNED);
        let mut other = remote();

        apply_authoritative(&mut entity, &other, &PhysicsBinding::new());
        assert_eq!(entity, other);

        other.position.x = 100.0;
        other.orientation = Quat::IDENTITY;
        assert_eq!(entity.position.x, 1.5);
        assert_ne!(entity.orientation, Quat::IDENTITY);
    }

    #[test]
    fn test_write_through_when_bound() {
        let handle = physics_handle(RigidBody::default());
        let mut binding = PhysicsBinding::new();
        binding.bind(handle.clone());

        let mut entity = EntityState::new(EntityId::new(1), PlayerId::UNOWNED);
        let other = remote();
        apply_authoritative(&mut entity, &other, &binding);

        assert_eq!(handle.lock().kinematics(), other.kinematics());
    }
}
