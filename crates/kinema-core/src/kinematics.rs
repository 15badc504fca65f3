//! Kinematic state bundle exchanged with the physics bridge

use std::fmt;

use crate::{Quat, Vec3};

/// Position, orientation and their rates of change
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Kinematics {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Kinematics {
    /// Canonical rest state: zero vectors, identity orientation
    pub fn rest() -> Self {
        Self::default()
    }

    pub fn at(position: Vec3) -> Self {
        Kinematics {
            position,
            ..Self::default()
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.orientation.is_finite()
            && self.velocity.is_finite()
            && self.angular_velocity.is_finite()
    }
}

impl fmt::Display for Kinematics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos{} rot{} vel{} angvel{}",
            self.position, self.orientation, self.velocity, self.angular_velocity
        )
    }
}
