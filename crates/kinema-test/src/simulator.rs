//! Fixed-step server/client simulation
//!
//! The server flies a set of crafts with random steering the client cannot
//! predict, and streams its state over a [`Link`]. The client dead-reckons
//! with its own physics bodies and reconciles each update either by
//! snapping or by bending.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use kinema_core::{BendingConfig, EntityId, KinemaError, KinemaResult, PlayerId, Quat, Vec3};
use kinema_state::{NetEntity, PhysicsBody, PhysicsHandle, RigidBody, SimEntity};

use crate::{Craft, Link, LinkConfig, LinkStats, SmoothnessMeter, SmoothnessReport};

/// How the client applies authoritative updates
#[derive(Clone, Debug, PartialEq)]
pub enum ReconcileMode {
    /// Apply the update directly
    Snap,
    /// Snapshot, apply, then bend back over several ticks
    Bend(BendingConfig),
}

/// Simulation configuration
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Number of crafts
    pub entity_count: usize,
    /// Ticks to run
    pub ticks: u64,
    /// Fixed step in seconds
    pub dt: f32,
    /// Server sends an update every this many ticks
    pub send_interval: u64,
    /// Random steering acceleration (units/s^2)
    pub accel_noise: f32,
    /// Random angular acceleration (rad/s^2)
    pub turn_noise: f32,
    /// Speed cap
    pub max_speed: f32,
    /// Random seed
    pub seed: u64,
    /// Link model
    pub link: LinkConfig,
    /// Client reconciliation mode
    pub mode: ReconcileMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            entity_count: 8,
            ticks: 600,
            dt: 1.0 / 60.0,
            send_interval: 5,
            accel_noise: 20.0,
            turn_noise: 4.0,
            max_speed: 15.0,
            seed: 42,
            link: LinkConfig::default(),
            mode: ReconcileMode::Bend(BendingConfig::default()),
        }
    }
}

impl SimConfig {
    /// Short run for quick tests
    pub fn light() -> Self {
        SimConfig {
            entity_count: 3,
            ticks: 120,
            ..Self::default()
        }
    }

    pub fn standard() -> Self {
        Self::default()
    }

    /// Long run over a poor link
    pub fn hostile() -> Self {
        SimConfig {
            entity_count: 16,
            ticks: 1800,
            send_interval: 6,
            accel_noise: 40.0,
            link: LinkConfig::poor(),
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: ReconcileMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }

    pub fn validate(&self) -> KinemaResult<()> {
        if self.send_interval == 0 {
            return Err(KinemaError::InvalidConfig("send_interval must be > 0".into()));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(KinemaError::InvalidConfig(format!("invalid dt {}", self.dt)));
        }
        if let ReconcileMode::Bend(bending) = &self.mode {
            bending.validate()?;
        }
        self.link.validate()
    }
}

/// Authoritative state broadcast by the server
#[derive(Clone, Debug)]
pub struct WorldUpdate {
    pub tick: u64,
    pub crafts: Vec<Craft>,
}

/// Result of a simulation run
#[derive(Clone, Debug)]
pub struct SimulationResult {
    pub report: SmoothnessReport,
    pub link: LinkStats,
    pub updates_applied: u64,
}

struct ServerCraft {
    craft: Craft,
    body: RigidBody,
}

struct ClientCraft {
    net: NetEntity<Craft>,
    body: Arc<Mutex<RigidBody>>,
}

/// Server and client worlds joined by a link
pub struct SimWorld {
    config: SimConfig,
    rng: StdRng,
    tick: u64,
    server: Vec<ServerCraft>,
    client: Vec<ClientCraft>,
    link: Link<WorldUpdate>,
    meter: SmoothnessMeter,
    updates_applied: u64,
}

impl SimWorld {
    pub fn new(config: SimConfig) -> KinemaResult<Self> {
        config.validate()?;

        let mut server = Vec::with_capacity(config.entity_count);
        let mut client = Vec::with_capacity(config.entity_count);

        for i in 0..config.entity_count {
            let id = EntityId::new(i as u32 + 1);
            let owner = PlayerId::new((i % 4) as u16 + 1);
            let mut craft = Craft::new(id, owner);
            craft.state.position = Vec3::new(i as f32 * 10.0, 0.0, 0.0);
            craft.state.velocity = Vec3::new(0.0, 0.0, 5.0);
            craft.state.angular_velocity = Vec3::new(0.0, 0.5, 0.0);

            let body = RigidBody::new(craft.state.kinematics());
            server.push(ServerCraft {
                craft: craft.clone(),
                body,
            });

            let client_body = Arc::new(Mutex::new(body));
            let handle: PhysicsHandle = client_body.clone();
            let mut net = match &config.mode {
                ReconcileMode::Snap => NetEntity::new(craft),
                ReconcileMode::Bend(bending) => NetEntity::with_config(craft, bending.clone())?,
            };
            net.bind_physics(handle);
            client.push(ClientCraft {
                net,
                body: client_body,
            });
        }

        Ok(SimWorld {
            rng: StdRng::seed_from_u64(config.seed),
            link: Link::new(config.link.clone(), config.seed.wrapping_add(1)),
            config,
            tick: 0,
            server,
            client,
            meter: SmoothnessMeter::new(),
            updates_applied: 0,
        })
    }

    /// Run the configured number of ticks
    pub fn run(&mut self) -> KinemaResult<SimulationResult> {
        info!(
            crafts = self.config.entity_count,
            ticks = self.config.ticks,
            mode = ?self.config.mode,
            "simulation started"
        );
        for _ in 0..self.config.ticks {
            self.step()?;
        }

        let result = self.result();
        info!(
            max_correction = result.report.max_correction,
            mean_error = result.report.mean_error,
            updates = result.updates_applied,
            "simulation finished"
        );
        Ok(result)
    }

    /// Advance both worlds by one tick
    pub fn step(&mut self) -> KinemaResult<()> {
        self.tick += 1;
        self.step_server();

        if self.tick % self.config.send_interval == 0 {
            let update = WorldUpdate {
                tick: self.tick,
                crafts: self.server.iter().map(|s| s.craft.clone()).collect(),
            };
            self.link.send(self.tick, update);
        }

        self.step_client()?;
        self.meter.end_tick();
        Ok(())
    }

    fn step_server(&mut self) {
        let dt = self.config.dt;
        for s in &mut self.server {
            let accel = random_unit_cube(&mut self.rng) * self.config.accel_noise;
            let spin = random_unit_cube(&mut self.rng) * self.config.turn_noise;

            let k = &mut s.body.kinematics;
            k.velocity += accel * dt;
            let speed = k.velocity.length();
            if speed > self.config.max_speed {
                k.velocity = k.velocity * (self.config.max_speed / speed);
            }
            k.angular_velocity += spin * dt;

            s.body.step(dt);
            s.craft.state.set_kinematics(&s.body.kinematics());

            if self.rng.gen::<f64>() < 0.01 {
                s.craft.hull = s.craft.hull.saturating_sub(1);
            }
        }
    }

    fn step_client(&mut self) -> KinemaResult<()> {
        let dt = self.config.dt;
        for c in &mut self.client {
            let (offset, turn) = {
                let mut body = c.body.lock();
                let start = body.kinematics;
                body.step(dt);
                (
                    body.kinematics.position - start.position,
                    Quat::from_scaled_axis(start.angular_velocity * dt),
                )
            };
            c.net.pull_from_physics();
            c.net.carry_bending_target(offset, turn);
        }

        let before: Vec<(Vec3, Quat)> = self.client.iter().map(|c| pose(&c.net)).collect();

        for update in self.link.deliver(self.tick) {
            debug!(sent = update.tick, now = self.tick, "update delivered");
            for craft in &update.crafts {
                let Some(c) = self
                    .client
                    .iter_mut()
                    .find(|c| c.net.entity().base().id == craft.base().id)
                else {
                    continue;
                };
                match &self.config.mode {
                    ReconcileMode::Snap => c.net.apply_authoritative(craft),
                    ReconcileMode::Bend(_) => c.net.receive_authoritative(craft)?,
                }
            }
            self.updates_applied += 1;
        }

        for c in &mut self.client {
            c.net.apply_incremental_bending();
        }

        for ((c, s), start) in self.client.iter().zip(&self.server).zip(before) {
            let now = pose(&c.net);
            self.meter.record_correction(start, now);
            self.meter.record_error(now.0, s.craft.state.position);
        }
        Ok(())
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn client_crafts(&self) -> impl Iterator<Item = &Craft> {
        self.client.iter().map(|c| c.net.entity())
    }

    pub fn server_crafts(&self) -> impl Iterator<Item = &Craft> {
        self.server.iter().map(|s| &s.craft)
    }

    pub fn result(&self) -> SimulationResult {
        SimulationResult {
            report: self.meter.report(),
            link: self.link.stats().clone(),
            updates_applied: self.updates_applied,
        }
    }
}

fn pose(net: &NetEntity<Craft>) -> (Vec3, Quat) {
    let state = net.entity().base();
    (state.position, state.orientation)
}

fn random_unit_cube(rng: &mut StdRng) -> Vec3 {
    Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    )
}

/// Run the same scenario with snapping and with bending
pub fn compare_modes(
    config: SimConfig,
    bending: BendingConfig,
) -> KinemaResult<(SimulationResult, SimulationResult)> {
    let snap = SimWorld::new(config.clone().with_mode(ReconcileMode::Snap))?.run()?;
    let bend = SimWorld::new(config.with_mode(ReconcileMode::Bend(bending)))?.run()?;
    Ok((snap, bend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init_tracing;

    #[test]
    fn test_snap_on_perfect_link_tracks_truth() {
        init_tracing();
        let config = SimConfig {
            send_interval: 1,
            ..SimConfig::light()
        }
        .with_link(LinkConfig::perfect())
        .with_mode(ReconcileMode::Snap);

        let mut world = SimWorld::new(config).unwrap();
        let result = world.run().unwrap();

        assert_eq!(result.updates_applied, 120);
        assert!(result.report.max_error < 1e-5);
        for (client, server) in world.client_crafts().zip(world.server_crafts()) {
            assert_eq!(client, server);
        }
    }

    #[test]
    fn test_bending_without_noise_stays_on_track() {
        let config = SimConfig {
            accel_noise: 0.0,
            turn_noise: 0.0,
            ..SimConfig::light()
        }
        .with_link(LinkConfig::perfect())
        .with_mode(ReconcileMode::Bend(BendingConfig::snappy()));

        let result = SimWorld::new(config).unwrap().run().unwrap();
        assert!(result.updates_applied > 0);
        assert!(result.report.max_error < 1e-4, "{:?}", result.report);
        assert!(result.report.max_correction < 1e-4, "{:?}", result.report);
    }

    #[test]
    fn test_bending_spreads_corrections() {
        init_tracing();
        let (snap, bend) = compare_modes(SimConfig::standard(), BendingConfig::default()).unwrap();

        assert!(snap.report.max_correction > 0.0);
        assert!(
            bend.report.max_correction < snap.report.max_correction,
            "bend {} snap {}",
            bend.report.max_correction,
            snap.report.max_correction
        );
        assert_eq!(snap.link, bend.link);
    }

    #[test]
    fn test_deterministic() {
        let a = SimWorld::new(SimConfig::light()).unwrap().run().unwrap();
        let b = SimWorld::new(SimConfig::light()).unwrap().run().unwrap();
        assert_eq!(a.report, b.report);
        assert_eq!(a.updates_applied, b.updates_applied);
    }

    #[test]
    fn test_hull_replicated() {
        let config = SimConfig {
            send_interval: 1,
            ticks: 600,
            ..SimConfig::light()
        }
        .with_link(LinkConfig::perfect());

        let mut world = SimWorld::new(config).unwrap();
        world.run().unwrap();
        for (client, server) in world.client_crafts().zip(world.server_crafts()) {
            assert_eq!(client.hull, server.hull);
        }
        assert!(world.server_crafts().any(|c| c.hull < Craft::FULL_HULL));
    }

    #[test]
    fn test_hostile_run_completes() {
        let result = SimWorld::new(SimConfig::hostile()).unwrap().run().unwrap();
        assert_eq!(result.report.ticks, 1800);
        assert!(result.link.lost > 0);
        assert!(result.report.mean_error.is_finite());
    }

    #[test]
    fn test_invalid_config() {
        let config = SimConfig {
            send_interval: 0,
            ..SimConfig::light()
        };
        assert!(matches!(
            SimWorld::new(config),
            Err(KinemaError::InvalidConfig(_))
        ));

        let config = SimConfig::light().with_mode(ReconcileMode::Bend(BendingConfig {
            strength: -1.0,
            ..BendingConfig::default()
        }));
        assert!(matches!(
            SimWorld::new(config),
            Err(KinemaError::InvalidStrength(_))
        ));
    }
}
