//! Physics and render bridges
//!
//! The physics body is owned by the surrounding simulation. An entity only
//! holds an optional handle to it; every write-through checks for the
//! binding first and is silently skipped when there is none.

use std::fmt;
use std::sync::Arc;

use kinema_core::{Kinematics, Quat, Vec3};
use parking_lot::Mutex;

use crate::EntityState;

/// Rigid-body representation owned by a physics engine
pub trait PhysicsBody {
    fn kinematics(&self) -> Kinematics;

    fn set_kinematics(&mut self, kinematics: &Kinematics);
}

/// Shared handle to a physics body
pub type PhysicsHandle = Arc<Mutex<dyn PhysicsBody + Send>>;

/// Wrap a body into a handle
pub fn physics_handle<B: PhysicsBody + Send + 'static>(body: B) -> PhysicsHandle {
    Arc::new(Mutex::new(body))
}

/// Optional link from an entity to its physics body
#[derive(Clone, Default)]
pub struct PhysicsBinding {
    handle: Option<PhysicsHandle>,
}

impl PhysicsBinding {
    pub fn new() -> Self {
        PhysicsBinding::default()
    }

    pub fn bind(&mut self, handle: PhysicsHandle) {
        self.handle = Some(handle);
    }

    pub fn unbind(&mut self) -> Option<PhysicsHandle> {
        self.handle.take()
    }

    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle(&self) -> Option<&PhysicsHandle> {
        self.handle.as_ref()
    }

    /// Overwrite local kinematics from the physics body.
    /// Returns false when unbound.
    pub fn pull(&self, state: &mut EntityState) -> bool {
        match &self.handle {
            Some(handle) => {
                let kinematics = handle.lock().kinematics();
                state.set_kinematics(&kinematics);
                true
            }
            None => false,
        }
    }

    /// Overwrite the physics body from local kinematics.
    /// Returns false when unbound.
    pub fn push(&self, state: &EntityState) -> bool {
        match &self.handle {
            Some(handle) => {
                handle.lock().set_kinematics(&state.kinematics());
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for PhysicsBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsBinding")
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Renderable representation of an entity
pub trait RenderBody {
    fn set_pose(&mut self, position: Vec3, orientation: Quat);
}

/// Copy position and orientation from a physics body into a renderable.
/// Driven by the render loop.
pub fn render_step(physics: &dyn PhysicsBody, render: &mut dyn RenderBody) {
    let kinematics = physics.kinematics();
    render.set_pose(kinematics.position, kinematics.orientation);
}

/// Minimal explicit-Euler rigid body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RigidBody {
    pub kinematics: Kinematics,
}

impl RigidBody {
    pub fn new(kinematics: Kinematics) -> Self {
        RigidBody { kinematics }
    }

    /// Integrate position by velocity and orientation by angular velocity
    pub fn step(&mut self, dt: f32) {
        let k = &mut self.kinematics;
        k.position += k.velocity * dt;
        let delta = Quat::from_scaled_axis(k.angular_velocity * dt);
        k.orientation = delta.mul(&k.orientation).normalize();
    }
}

impl PhysicsBody for RigidBody {
    fn kinematics(&self) -> Kinematics {
        self.kinematics
    }

    fn set_kinematics(&mut self, kinematics: &Kinematics) {
        self.kinematics = *kinematics;
    }
}
