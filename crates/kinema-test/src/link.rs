//! Simulated server-to-client link
//!
//! Delivers update packets after a latency measured in simulation ticks:
//! - Base latency plus uniform jitter
//! - Random loss
//! - Reordering as a side effect of jitter
//!
//! The receiver side discards anything older than the newest packet it has
//! already accepted.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use kinema_core::{KinemaError, KinemaResult};

/// Link configuration
#[derive(Clone, Debug)]
pub struct LinkConfig {
    /// Base latency in ticks
    pub latency_ticks: u32,
    /// Extra latency drawn uniformly from `0..=jitter_ticks`
    pub jitter_ticks: u32,
    /// Packet loss rate (0.0 - 1.0)
    pub loss_rate: f64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            latency_ticks: 3,
            jitter_ticks: 2,
            loss_rate: 0.02,
        }
    }
}

impl LinkConfig {
    /// Ideal link
    pub fn perfect() -> Self {
        LinkConfig {
            latency_ticks: 0,
            jitter_ticks: 0,
            loss_rate: 0.0,
        }
    }

    /// Good network conditions
    pub fn good() -> Self {
        LinkConfig {
            latency_ticks: 2,
            jitter_ticks: 1,
            loss_rate: 0.005,
        }
    }

    /// Poor network conditions
    pub fn poor() -> Self {
        LinkConfig {
            latency_ticks: 8,
            jitter_ticks: 6,
            loss_rate: 0.1,
        }
    }

    pub fn validate(&self) -> KinemaResult<()> {
        if !(0.0..=1.0).contains(&self.loss_rate) {
            return Err(KinemaError::InvalidConfig(format!(
                "loss_rate {} outside 0..=1",
                self.loss_rate
            )));
        }
        Ok(())
    }
}

/// Link statistics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub sent: u64,
    pub lost: u64,
    pub delivered: u64,
    pub stale: u64,
}

struct InFlight<T> {
    deliver_at: u64,
    seq: u64,
    payload: T,
}

/// One-way link carrying payloads of type `T`
pub struct Link<T> {
    config: LinkConfig,
    rng: StdRng,
    in_flight: Vec<InFlight<T>>,
    next_seq: u64,
    newest_delivered: Option<u64>,
    stats: LinkStats,
}

impl<T> Link<T> {
    pub fn new(config: LinkConfig, seed: u64) -> Self {
        Link {
            config,
            rng: StdRng::seed_from_u64(seed),
            in_flight: Vec::new(),
            next_seq: 0,
            newest_delivered: None,
            stats: LinkStats::default(),
        }
    }

    /// Send a payload at tick `now`
    pub fn send(&mut self, now: u64, payload: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.stats.sent += 1;

        if self.config.loss_rate > 0.0 && self.rng.gen::<f64>() < self.config.loss_rate {
            self.stats.lost += 1;
            return;
        }

        let jitter = if self.config.jitter_ticks > 0 {
            self.rng.gen_range(0..=self.config.jitter_ticks)
        } else {
            0
        };
        let deliver_at = now + u64::from(self.config.latency_ticks + jitter);
        self.in_flight.push(InFlight {
            deliver_at,
            seq,
            payload,
        });
    }

    /// Collect everything due by tick `now`, oldest first, minus stale packets
    pub fn deliver(&mut self, now: u64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .in_flight
            .drain(..)
            .partition(|p| p.deliver_at <= now);
        self.in_flight = pending;
        due.sort_by_key(|p| p.seq);

        let mut delivered = Vec::with_capacity(due.len());
        for packet in due {
            if self.newest_delivered.is_some_and(|newest| packet.seq <= newest) {
                self.stats.stale += 1;
                continue;
            }
            self.newest_delivered = Some(packet.seq);
            self.stats.delivered += 1;
            delivered.push(packet.payload);
        }
        delivered
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }
}
