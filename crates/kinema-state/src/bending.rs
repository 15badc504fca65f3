//! Reconciliation engine ("bending")
//!
//! When an authoritative update lands, the entity keeps showing its
//! predicted pose and then walks position and orientation toward the
//! authoritative values over a fixed number of ticks. Velocities are taken
//! over immediately.
//!
//! Step `k` of an `N` increment episode moves `strength / (N - k + 1)` of
//! the remaining gap, so the remaining gap after the window is
//! `d0 * prod_{k=1..N} (1 - strength / k)`. With `strength == 1` the last
//! step closes it exactly; below 1 a residual gap is left behind and no
//! further correction happens until the next episode.

use kinema_core::{BendingConfig, KinemaResult, Quat, Vec3};
use tracing::{debug, trace};

use crate::SimEntity;

/// Per-entity reconciliation state machine
#[derive(Debug, Clone)]
pub enum BendState<E> {
    Idle,
    Bending {
        /// Authoritative state being blended toward
        target: E,
        /// Increments left, never zero while bending
        remaining: u32,
        /// Blend strength coefficient
        strength: f32,
    },
}

/// Drives a [`BendState`] for one entity
#[derive(Debug, Clone)]
pub struct Bender<E> {
    state: BendState<E>,
}

impl<E> Default for Bender<E> {
    fn default() -> Self {
        Bender {
            state: BendState::Idle,
        }
    }
}

impl<E: SimEntity> Bender<E> {
    pub fn new() -> Self {
        Bender::default()
    }

    /// Start an episode.
    ///
    /// `entity` holds the freshly applied authoritative state and
    /// `snapshot` the predicted state captured before it. The target is
    /// taken from `entity`, then the entity's pose is rolled back to
    /// `snapshot` while keeping the target's velocities. Only kinematics are
    /// rolled back; identity and subtype fields stay authoritative. With
    /// zero increments the rollback still happens and the bender stays idle.
    pub fn begin(
        &mut self,
        entity: &mut E,
        snapshot: &E,
        strength: f32,
        increments: u32,
    ) -> KinemaResult<()> {
        BendingConfig::check_strength(strength)?;

        if let BendState::Bending { remaining, .. } = &self.state {
            debug!(
                entity = %entity.base().id,
                remaining = *remaining,
                "superseding active bending episode"
            );
        }

        let target = entity.clone();
        {
            let goal = target.base();
            let base = entity.base_mut();
            base.set_kinematics(&snapshot.base().kinematics());
            base.velocity.copy_from(&goal.velocity);
            base.angular_velocity.copy_from(&goal.angular_velocity);
        }

        if increments == 0 {
            debug!(entity = %entity.base().id, "zero increments, no bending window");
            self.state = BendState::Idle;
            return Ok(());
        }

        debug!(
            entity = %entity.base().id,
            strength,
            increments,
            gap = entity.base().position.distance(&target.base().position),
            "bending episode started"
        );

        self.state = BendState::Bending {
            target,
            remaining: increments,
            strength,
        };
        Ok(())
    }

    /// Apply one increment. Returns false (and does nothing) when idle.
    pub fn step(&mut self, entity: &mut E) -> bool {
        let BendState::Bending {
            target,
            remaining,
            strength,
        } = &mut self.state
        else {
            return false;
        };

        let alpha = *strength / *remaining as f32;
        let goal = target.base();
        let base = entity.base_mut();
        base.position = base.position.lerp(&goal.position, alpha);
        base.orientation = base.orientation.slerp(&goal.orientation, alpha);

        *remaining -= 1;
        trace!(entity = %base.id, alpha, remaining = *remaining, "bending increment");

        if *remaining == 0 {
            debug!(
                entity = %base.id,
                residual = base.position.distance(&goal.position),
                "bending episode complete"
            );
            self.state = BendState::Idle;
        }
        true
    }

    /// Move the active target by a rigid motion.
    ///
    /// The target is a pose sampled at the update tick. A simulation that
    /// keeps integrating the entity while it bends applies the same per-tick
    /// motion here, so the gap shrinks only by the bending schedule.
    /// No-op when idle.
    pub fn carry_target(&mut self, offset: Vec3, turn: Quat) {
        if let BendState::Bending { target, .. } = &mut self.state {
            let goal = target.base_mut();
            goal.position += offset;
            goal.orientation = turn.mul(&goal.orientation).normalize();
        }
    }

    /// Drop any active episode without touching the entity
    pub fn cancel(&mut self) {
        self.state = BendState::Idle;
    }

    pub fn state(&self) -> &BendState<E> {
        &self.state
    }

    pub fn is_bending(&self) -> bool {
        matches!(self.state, BendState::Bending { .. })
    }

    /// Increments left; zero when idle
    pub fn remaining_increments(&self) -> u32 {
        match &self.state {
            BendState::Bending { remaining, .. } => *remaining,
            BendState::Idle => 0,
        }
    }

    pub fn strength(&self) -> Option<f32> {
        match &self.state {
            BendState::Bending { strength, .. } => Some(*strength),
            BendState::Idle => None,
        }
    }

    pub fn target(&self) -> Option<&E> {
        match &self.state {
            BendState::Bending { target, .. } => Some(target),
            BendState::Idle => None,
        }
    }

    /// Positional distance from `entity` to the active target
    pub fn residual_distance(&self, entity: &E) -> Option<f32> {
        self.target()
            .map(|t| entity.base().position.distance(&t.base().position))
    }

    /// Angular distance from `entity` to the active target
    pub fn residual_angle(&self, entity: &E) -> Option<f32> {
        self.target()
            .map(|t| entity.base().orientation.angle_to(&t.base().orientation))
    }
}
