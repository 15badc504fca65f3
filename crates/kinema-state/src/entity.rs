//! Entity state container
//!
//! `EntityState` is the identity and kinematic record every simulated
//! entity carries. Concrete entity types embed it and implement
//! [`SimEntity`]; snapshots and bending targets are clones of the
//! concrete type, so subtype fields come along for free.

use std::fmt;

use kinema_core::{
    EntityId, KinemaError, KinemaResult, Kinematics, PlayerId, Quat, Vec3,
};

use crate::schema::{NestedKind, NetSchema, WireType};

/// Optional initial values for a new entity. Missing fields take rest values.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitialState {
    pub position: Option<Vec3>,
    pub orientation: Option<Quat>,
    pub velocity: Option<Vec3>,
    pub angular_velocity: Option<Vec3>,
}

/// Identity and kinematic state of one simulated entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub id: EntityId,
    pub player_id: PlayerId,
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl EntityState {
    /// Create an entity in the canonical rest state
    pub fn new(id: EntityId, player_id: PlayerId) -> Self {
        EntityState {
            id,
            player_id,
            position: Vec3::zero(),
            orientation: Quat::identity(),
            velocity: Vec3::zero(),
            angular_velocity: Vec3::zero(),
        }
    }

    pub fn with_initial(id: EntityId, player_id: PlayerId, initial: InitialState) -> Self {
        let mut state = Self::new(id, player_id);
        if let Some(position) = &initial.position {
            state.position.copy_from(position);
        }
        if let Some(orientation) = &initial.orientation {
            state.orientation.copy_from(orientation);
        }
        if let Some(velocity) = &initial.velocity {
            state.velocity.copy_from(velocity);
        }
        if let Some(angular_velocity) = &initial.angular_velocity {
            state.angular_velocity.copy_from(angular_velocity);
        }
        state
    }

    /// Copy identity and all kinematic fields from `other`
    pub fn copy_state_from(&mut self, other: &EntityState) {
        self.id = other.id;
        self.player_id = other.player_id;
        self.set_kinematics(&other.kinematics());
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            position: self.position,
            orientation: self.orientation,
            velocity: self.velocity,
            angular_velocity: self.angular_velocity,
        }
    }

    pub fn set_kinematics(&mut self, k: &Kinematics) {
        self.position.copy_from(&k.position);
        self.orientation.copy_from(&k.orientation);
        self.velocity.copy_from(&k.velocity);
        self.angular_velocity.copy_from(&k.angular_velocity);
    }

    /// Read a base schema field by name
    pub fn read_base_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Int32(self.id.to_wire())),
            "playerId" => Some(FieldValue::Int16(self.player_id.to_wire())),
            "position" => Some(FieldValue::Vec3(self.position)),
            "orientation" => Some(FieldValue::Quat(self.orientation)),
            "velocity" => Some(FieldValue::Vec3(self.velocity)),
            "angularVelocity" => Some(FieldValue::Vec3(self.angular_velocity)),
            _ => None,
        }
    }

    /// Write a base schema field by name
    pub fn write_base_field(&mut self, name: &str, value: FieldValue) -> KinemaResult<()> {
        let expected = NetSchema::base()
            .get(name)
            .ok_or_else(|| KinemaError::UnknownField(name.to_string()))?;

        match (name, value) {
            ("id", FieldValue::Int32(v)) => self.id = EntityId::from_wire(v),
            ("playerId", FieldValue::Int16(v)) => self.player_id = PlayerId::from_wire(v),
            ("position", FieldValue::Vec3(v)) => self.position.copy_from(&v),
            ("orientation", FieldValue::Quat(v)) => self.orientation.copy_from(&v),
            ("velocity", FieldValue::Vec3(v)) => self.velocity.copy_from(&v),
            ("angularVelocity", FieldValue::Vec3(v)) => self.angular_velocity.copy_from(&v),
            _ => {
                return Err(KinemaError::FieldTypeMismatch {
                    field: name.to_string(),
                    expected: expected.name(),
                })
            }
        }
        Ok(())
    }
}

impl fmt::Display for EntityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EntityState[id={} playerId={} pos{} rot{} vel{} angvel{}]",
            self.id,
            self.player_id,
            self.position,
            self.orientation,
            self.velocity,
            self.angular_velocity
        )
    }
}

/// A schema field value as handed to or from the serializer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Int16(i16),
    Int32(i32),
    Vec3(Vec3),
    Quat(Quat),
}

impl FieldValue {
    pub fn wire_type(&self) -> WireType {
        match self {
            FieldValue::Int16(_) => WireType::Int16,
            FieldValue::Int32(_) => WireType::Int32,
            FieldValue::Vec3(_) => WireType::Nested(NestedKind::Vec3),
            FieldValue::Quat(_) => WireType::Nested(NestedKind::Quat),
        }
    }
}

/// Abstract simulated entity.
///
/// `Clone` is the same-type re-creation capability: snapshots and bending
/// targets are clones of the concrete entity. Subtypes that add networked
/// fields extend `net_schema`, `sync_from` and the field accessors together.
pub trait SimEntity: Clone + fmt::Display {
    fn base(&self) -> &EntityState;

    fn base_mut(&mut self) -> &mut EntityState;

    fn net_schema() -> NetSchema {
        NetSchema::base()
    }

    /// Copy every networked field from `other`
    fn sync_from(&mut self, other: &Self) {
        self.base_mut().copy_state_from(other.base());
    }

    fn read_field(&self, name: &str) -> Option<FieldValue> {
        self.base().read_base_field(name)
    }

    fn write_field(&mut self, name: &str, value: FieldValue) -> KinemaResult<()> {
        self.base_mut().write_base_field(name, value)
    }
}

impl SimEntity for EntityState {
    fn base(&self) -> &EntityState {
        self
    }

    fn base_mut(&mut self) -> &mut EntityState {
        self
    }
}
