//! Networked entity - an entity together with its reconciliation machinery
//!
//! Per authoritative update the order is fixed:
//! `save_state` -> `apply_authoritative` -> `start_reconciliation`,
//! then one `apply_incremental_bending` per simulation tick.
//! [`NetEntity::receive_authoritative`] runs the first three in order.

use kinema_core::{BendingConfig, KinemaError, KinemaResult, Quat, Vec3};
use tracing::error;

use crate::{
    apply_authoritative, BendState, Bender, PhysicsBinding, PhysicsHandle, SimEntity,
    SnapshotSlot,
};

/// A simulated entity with snapshot, bending state and physics binding
#[derive(Debug, Clone)]
pub struct NetEntity<E> {
    entity: E,
    snapshot: SnapshotSlot<E>,
    bender: Bender<E>,
    physics: PhysicsBinding,
    config: BendingConfig,
}

impl<E: SimEntity> NetEntity<E> {
    /// Wrap an entity using the default bending configuration
    pub fn new(entity: E) -> Self {
        NetEntity {
            entity,
            snapshot: SnapshotSlot::new(),
            bender: Bender::new(),
            physics: PhysicsBinding::new(),
            config: BendingConfig::default(),
        }
    }

    pub fn with_config(entity: E, config: BendingConfig) -> KinemaResult<Self> {
        config.validate()?;
        let mut net = Self::new(entity);
        net.config = config;
        Ok(net)
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// Direct access for local prediction. Does not interact with bending.
    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }

    pub fn into_inner(self) -> E {
        self.entity
    }

    pub fn config(&self) -> &BendingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BendingConfig) -> KinemaResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    // Physics bridge

    pub fn bind_physics(&mut self, handle: PhysicsHandle) {
        self.physics.bind(handle);
    }

    pub fn unbind_physics(&mut self) -> Option<PhysicsHandle> {
        self.physics.unbind()
    }

    pub fn physics(&self) -> &PhysicsBinding {
        &self.physics
    }

    /// Overwrite local kinematics from the physics body, if bound
    pub fn pull_from_physics(&mut self) {
        self.physics.pull(self.entity.base_mut());
    }

    /// Overwrite the physics body from local kinematics, if bound
    pub fn push_to_physics(&self) {
        self.physics.push(self.entity.base());
    }

    // Snapshot store

    /// Snapshot `source`, or the entity itself when `None`
    pub fn save_state(&mut self, source: Option<&E>) {
        self.snapshot.save(source.unwrap_or(&self.entity));
    }

    pub fn snapshot(&self) -> Option<&E> {
        self.snapshot.get()
    }

    // State sync

    pub fn apply_authoritative(&mut self, other: &E) {
        apply_authoritative(&mut self.entity, other, &self.physics);
    }

    // Reconciliation

    /// Begin blending from the saved snapshot toward the current state.
    ///
    /// The snapshot is consumed by every call, including failed ones.
    pub fn start_reconciliation(&mut self, strength: f32, increments: u32) -> KinemaResult<()> {
        let Some(snapshot) = self.snapshot.take() else {
            error!(
                entity = %self.entity.base().id,
                "reconciliation started without a snapshot"
            );
            return Err(KinemaError::SnapshotMissing);
        };

        self.bender
            .begin(&mut self.entity, &snapshot, strength, increments)?;
        self.push_to_physics();
        Ok(())
    }

    /// Begin reconciliation with the configured strength and increments
    pub fn bend_to_current(&mut self) -> KinemaResult<()> {
        let (strength, increments) = (self.config.strength, self.config.increments);
        self.start_reconciliation(strength, increments)
    }

    /// Apply one bending increment. A no-op when idle.
    pub fn apply_incremental_bending(&mut self) {
        if self.bender.step(&mut self.entity) && self.config.write_through_steps {
            self.push_to_physics();
        }
    }

    /// Snapshot, sync and start bending in the required order
    pub fn receive_authoritative(&mut self, other: &E) -> KinemaResult<()> {
        self.save_state(None);
        self.apply_authoritative(other);
        self.bend_to_current()
    }

    /// Move the bending target along with motion the simulation integrated
    /// this tick. No-op when idle.
    pub fn carry_bending_target(&mut self, offset: Vec3, turn: Quat) {
        self.bender.carry_target(offset, turn);
    }

    pub fn bend_state(&self) -> &BendState<E> {
        self.bender.state()
    }

    pub fn is_bending(&self) -> bool {
        self.bender.is_bending()
    }

    /// Remaining increments, zero when idle
    pub fn bending_increments(&self) -> u32 {
        self.bender.remaining_increments()
    }

    /// Strength of the active episode
    pub fn bending(&self) -> Option<f32> {
        self.bender.strength()
    }

    pub fn bending_target(&self) -> Option<&E> {
        self.bender.target()
    }

    pub fn residual_distance(&self) -> Option<f32> {
        self.bender.residual_distance(&self.entity)
    }

    pub fn residual_angle(&self) -> Option<f32> {
        self.bender.residual_angle(&self.entity)
    }

    /// Abandon the active episode, leaving the entity where it is
    pub fn cancel_reconciliation(&mut self) {
        self.bender.cancel();
    }
}
