//! Smoothness and error metrics

use kinema_core::{Quat, Vec3};

/// Accumulates per-tick corrections and tracking error
#[derive(Clone, Debug, Default)]
pub struct SmoothnessMeter {
    ticks: u64,
    correction_sum: f64,
    max_correction: f32,
    max_angle_correction: f32,
    error_sum: f64,
    max_error: f32,
    last_error: f32,
}

impl SmoothnessMeter {
    pub fn new() -> Self {
        SmoothnessMeter::default()
    }

    /// Record how far reconciliation moved the visible pose this tick
    pub fn record_correction(&mut self, before: (Vec3, Quat), after: (Vec3, Quat)) {
        let distance = before.0.distance(&after.0);
        let angle = before.1.angle_to(&after.1);
        self.correction_sum += f64::from(distance);
        self.max_correction = self.max_correction.max(distance);
        self.max_angle_correction = self.max_angle_correction.max(angle);
    }

    /// Record distance between the visible pose and ground truth
    pub fn record_error(&mut self, visible: Vec3, truth: Vec3) {
        let error = visible.distance(&truth);
        self.error_sum += f64::from(error);
        self.max_error = self.max_error.max(error);
        self.last_error = error;
    }

    pub fn end_tick(&mut self) {
        self.ticks += 1;
    }

    pub fn report(&self) -> SmoothnessReport {
        let ticks = self.ticks.max(1) as f64;
        SmoothnessReport {
            ticks: self.ticks,
            max_correction: self.max_correction,
            mean_correction: self.correction_sum / ticks,
            max_angle_correction: self.max_angle_correction,
            max_error: self.max_error,
            mean_error: self.error_sum / ticks,
            final_error: self.last_error,
        }
    }
}

/// Summary of one simulation run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SmoothnessReport {
    pub ticks: u64,
    /// Largest single-tick positional correction
    pub max_correction: f32,
    /// Mean positional correction per tick, summed over entities
    pub mean_correction: f64,
    /// Largest single-tick angular correction (radians)
    pub max_angle_correction: f32,
    /// Largest distance between visible and true position
    pub max_error: f32,
    /// Mean tracking error per tick, summed over entities
    pub mean_error: f64,
    /// Tracking error of the last recorded entity on the last tick
    pub final_error: f32,
}
