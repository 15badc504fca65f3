//! Bending configuration

use crate::{KinemaError, KinemaResult};

/// Reconciliation schedule used when an authoritative update arrives
#[derive(Clone, Debug, PartialEq)]
pub struct BendingConfig {
    /// Blend strength coefficient, in (0, 1]
    pub strength: f32,
    /// Number of simulation ticks the blend is spread over
    pub increments: u32,
    /// Push the bent pose into the physics body after every increment
    pub write_through_steps: bool,
}

impl Default for BendingConfig {
    fn default() -> Self {
        BendingConfig {
            strength: 0.6,
            increments: 6,
            write_through_steps: true,
        }
    }
}

impl BendingConfig {
    /// Short window, full convergence
    pub fn snappy() -> Self {
        BendingConfig {
            strength: 1.0,
            increments: 3,
            write_through_steps: true,
        }
    }

    /// Long, gentle window for high-latency links
    pub fn smooth() -> Self {
        BendingConfig {
            strength: 0.8,
            increments: 20,
            write_through_steps: true,
        }
    }

    /// Low-latency networks where corrections are small
    pub fn lan() -> Self {
        BendingConfig {
            strength: 1.0,
            increments: 2,
            write_through_steps: true,
        }
    }

    /// Check a strength coefficient
    pub fn check_strength(strength: f32) -> KinemaResult<()> {
        if strength.is_finite() && strength > 0.0 && strength <= 1.0 {
            Ok(())
        } else {
            Err(KinemaError::InvalidStrength(strength))
        }
    }

    pub fn validate(&self) -> KinemaResult<()> {
        Self::check_strength(self.strength)
    }
}
