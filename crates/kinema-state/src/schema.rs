//! Network schema - which entity fields travel over the wire
//!
//! A schema is an ordered `name -> WireType` list read by the external
//! serializer. Subtypes build theirs by appending to the parent's schema;
//! a declared field can never be redefined further down the hierarchy.

use std::fmt;

use kinema_core::{KinemaError, KinemaResult};

/// Nested value types serialized through their own schema
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NestedKind {
    Vec3,
    Quat,
}

impl NestedKind {
    /// Schema of the nested value itself
    pub fn schema(self) -> NetSchema {
        match self {
            NestedKind::Vec3 => NetSchema::from_fields(&[
                ("x", WireType::Float32),
                ("y", WireType::Float32),
                ("z", WireType::Float32),
            ]),
            NestedKind::Quat => NetSchema::from_fields(&[
                ("x", WireType::Float32),
                ("y", WireType::Float32),
                ("z", WireType::Float32),
                ("w", WireType::Float32),
            ]),
        }
    }
}

/// Wire type tag of a schema field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    Int16,
    Int32,
    /// Only appears inside nested value schemas
    Float32,
    Nested(NestedKind),
}

impl WireType {
    pub fn name(self) -> &'static str {
        match self {
            WireType::Int16 => "int16",
            WireType::Int32 => "int32",
            WireType::Float32 => "float32",
            WireType::Nested(NestedKind::Vec3) => "vec3",
            WireType::Nested(NestedKind::Quat) => "quat",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub wire_type: WireType,
}

/// Ordered field declaration for one entity type
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetSchema {
    fields: Vec<FieldDef>,
}

impl NetSchema {
    pub fn new() -> Self {
        NetSchema::default()
    }

    /// Schema shared by every simulated entity
    pub fn base() -> Self {
        Self::from_fields(&[
            ("id", WireType::Int32),
            ("playerId", WireType::Int16),
            ("position", WireType::Nested(NestedKind::Vec3)),
            ("orientation", WireType::Nested(NestedKind::Quat)),
            ("velocity", WireType::Nested(NestedKind::Vec3)),
            ("angularVelocity", WireType::Nested(NestedKind::Vec3)),
        ])
    }

    fn from_fields(fields: &[(&'static str, WireType)]) -> Self {
        NetSchema {
            fields: fields
                .iter()
                .map(|&(name, wire_type)| FieldDef { name, wire_type })
                .collect(),
        }
    }

    /// Append a field, failing if it is already declared
    pub fn try_with_field(mut self, name: &'static str, wire_type: WireType) -> KinemaResult<Self> {
        if self.contains(name) {
            return Err(KinemaError::SchemaFieldOverwrite(name.to_string()));
        }
        self.fields.push(FieldDef { name, wire_type });
        Ok(self)
    }

    /// Append a field. On a name clash the existing declaration wins.
    pub fn with_field(self, name: &'static str, wire_type: WireType) -> Self {
        if let Some(existing) = self.get(name) {
            if existing != wire_type {
                tracing::warn!(
                    field = name,
                    declared = %existing,
                    requested = %wire_type,
                    "schema field redeclared, keeping parent declaration"
                );
            }
            return self;
        }
        let mut schema = self;
        schema.fields.push(FieldDef { name, wire_type });
        schema
    }

    /// Append several fields, failing on the first clash
    pub fn extend(self, fields: &[(&'static str, WireType)]) -> KinemaResult<Self> {
        fields
            .iter()
            .try_fold(self, |schema, &(name, ty)| schema.try_with_field(name, ty))
    }

    pub fn get(&self, name: &str) -> Option<WireType> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.wire_type)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// True if every parent field is present here with the same type and
    /// the parent's fields form a prefix of this schema
    pub fn is_superset_of(&self, parent: &NetSchema) -> bool {
        parent.len() <= self.len()
            && parent
                .fields
                .iter()
                .zip(self.fields.iter())
                .all(|(p, s)| p == s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_order_and_types() {
        let schema = NetSchema::base();
        let names: Vec<_> = schema.names().collect();
        assert_eq!(
            names,
            vec![
                "id",
                "playerId",
                "position",
                "orientation",
                "velocity",
                "angularVelocity"
            ]
        );
        assert_eq!(schema.get("id"), Some(WireType::Int32));
        assert_eq!(schema.get("playerId"), Some(WireType::Int16));
        assert_eq!(
            schema.get("orientation"),
            Some(WireType::Nested(NestedKind::Quat))
        );
    }

    #[test]
    fn test_extend_is_additive() {
        let parent = NetSchema::base();
        let child = parent
            .clone()
            .extend(&[("fuel", WireType::Int16), ("score", WireType::Int32)])
            .unwrap();

        assert_eq!(child.len(), parent.len() + 2);
        assert!(child.is_superset_of(&parent));
        assert!(!parent.is_superset_of(&child));
        assert_eq!(child.names().last(), Some("score"));
    }

    #[test]
    fn test_overwrite_rejected() {
        let err = NetSchema::base()
            .try_with_field("position", WireType::Int32)
            .unwrap_err();
        assert_eq!(err, KinemaError::SchemaFieldOverwrite("position".into()));
    }

    #[test]
    fn test_with_field_keeps_parent() {
        let schema = NetSchema::base().with_field("velocity", WireType::Int16);
        assert_eq!(schema.len(), NetSchema::base().len());
        assert_eq!(
            schema.get("velocity"),
            Some(WireType::Nested(NestedKind::Vec3))
        );
    }

    #[test]
    fn test_nested_schemas() {
        assert_eq!(NestedKind::Vec3.schema().len(), 3);
        let quat: Vec<_> = NestedKind::Quat.schema().names().collect();
        assert_eq!(quat, vec!["x", "y", "z", "w"]);
        assert!(NestedKind::Quat
            .schema()
            .iter()
            .all(|f| f.wire_type == WireType::Float32));
    }
}
