//! KINEMA Core - Fundamental types and primitives
//!
//! This crate defines the core types used throughout KINEMA:
//! - Identifiers (EntityId, PlayerId)
//! - Kinematic value types (Vec3, Quat, Kinematics)
//! - Bending configuration
//! - Error taxonomy

pub mod id;
pub mod math;
pub mod kinematics;
pub mod config;
pub mod error;

pub use id::*;
pub use math::*;
pub use kinematics::*;
pub use config::*;
pub use error::*;
