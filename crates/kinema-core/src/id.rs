//! Identity types for KINEMA
//!
//! Widths follow the wire schema: entity ids are 32-bit, owner ids 16-bit.

use std::fmt;

/// Entity identity - stable and unique for the lifetime of the entity
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    pub const ZERO: EntityId = EntityId(0);

    #[inline]
    pub fn new(id: u32) -> Self {
        EntityId(id)
    }

    /// Reinterpret as the signed 32-bit value carried on the wire
    #[inline]
    pub fn to_wire(self) -> i32 {
        i32::from_le_bytes(self.0.to_le_bytes())
    }

    #[inline]
    pub fn from_wire(value: i32) -> Self {
        EntityId(u32::from_le_bytes(value.to_le_bytes()))
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({:08x})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Owning player of an entity. Zero means unowned.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PlayerId(pub u16);

impl PlayerId {
    pub const UNOWNED: PlayerId = PlayerId(0);

    #[inline]
    pub fn new(id: u16) -> Self {
        PlayerId(id)
    }

    #[inline]
    pub fn is_unowned(self) -> bool {
        self == Self::UNOWNED
    }

    /// Reinterpret as the signed 16-bit value carried on the wire
    #[inline]
    pub fn to_wire(self) -> i16 {
        i16::from_le_bytes(self.0.to_le_bytes())
    }

    #[inline]
    pub fn from_wire(value: i16) -> Self {
        PlayerId(u16::from_le_bytes(value.to_le_bytes()))
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unowned() {
            write!(f, "Player(unowned)")
        } else {
            write!(f, "Player({})", self.0)
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
