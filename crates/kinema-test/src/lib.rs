//! KINEMA Test Harness - Reconciliation under simulated network conditions
//!
//! This crate provides:
//! - A lossy, latent, reordering link model
//! - A fixed-step server/client simulation
//! - Smoothness and error metrics
//! - Tracing setup for tests and benches

pub mod craft;
pub mod link;
pub mod metrics;
pub mod simulator;
pub mod logging;

pub use craft::*;
pub use link::*;
pub use metrics::*;
pub use simulator::*;
pub use logging::*;
