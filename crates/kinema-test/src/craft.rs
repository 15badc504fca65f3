//! Craft - the entity type flown by the harness
//!
//! Extends the base entity with a networked hull integrity field.

use std::fmt;

use kinema_core::{EntityId, KinemaError, KinemaResult, PlayerId};
use kinema_state::{EntityState, FieldValue, NetSchema, SimEntity, WireType};

/// Simulated craft
#[derive(Debug, Clone, PartialEq)]
pub struct Craft {
    pub state: EntityState,
    pub hull: i16,
}

impl Craft {
    pub const FULL_HULL: i16 = 1000;

    pub fn new(id: EntityId, owner: PlayerId) -> Self {
        Craft {
            state: EntityState::new(id, owner),
            hull: Self::FULL_HULL,
        }
    }
}

impl fmt::Display for Craft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Craft[{} hull={}]", self.state, self.hull)
    }
}

impl SimEntity for Craft {
    fn base(&self) -> &EntityState {
        &self.state
    }

    fn base_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn net_schema() -> NetSchema {
        NetSchema::base().with_field("hull", WireType::Int16)
    }

    fn sync_from(&mut self, other: &Self) {
        self.state.copy_state_from(&other.state);
        self.hull = other.hull;
    }

    fn read_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "hull" => Some(FieldValue::Int16(self.hull)),
            _ => self.state.read_base_field(name),
        }
    }

    fn write_field(&mut self, name: &str, value: FieldValue) -> KinemaResult<()> {
        match (name, value) {
            ("hull", FieldValue::Int16(hull)) => {
                self.hull = hull;
                Ok(())
            }
            ("hull", _) => Err(KinemaError::FieldTypeMismatch {
                field: name.to_string(),
                expected: WireType::Int16.name(),
            }),
            _ => self.state.write_base_field(name, value),
        }
    }
}
