//! KINEMA State Engine - Network schema and state reconciliation
//!
//! This crate implements the entity side of client prediction:
//! - Network field schema
//! - Entity state container
//! - Snapshot store
//! - Authoritative state sync
//! - Bending (smooth reconciliation toward authoritative state)
//! - Physics and render bridges

pub mod schema;
pub mod entity;
pub mod snapshot;
pub mod physics;
pub mod sync;
pub mod bending;
pub mod net_entity;

#[cfg(test)]
mod proptests;

pub use schema::*;
pub use entity::*;
pub use snapshot::*;
pub use physics::*;
pub use sync::*;
pub use bending::*;
pub use net_entity::*;
