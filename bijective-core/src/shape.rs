//! Static per-type field tables.
//!
//! `#[derive(Record)]` emits one [`RecordShape`] per target type: an ordered
//! table of [`FieldSpec`]s plus the type name. The table is built at compile
//! time, so metadata lookup is a `const` read; there is no runtime
//! build-and-cache step to race on.

use crate::error::ShapeError;

/// Semantic classification of a field's declared type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// A primitive: boolean, number, character, or string.
    Scalar,
    /// An ordered sequence (`Vec`, slice, array).
    Sequence,
    /// A string-keyed mapping.
    Mapping,
    /// A nested record.
    Record,
    /// Anything the derive could not classify syntactically.
    Other,
}

/// Describes one declared field of a record.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// Rust identifier of the field.
    pub name: &'static str,

    /// Key used for wire lookup; equals `name` unless renamed.
    pub wire_name: &'static str,

    /// Alternate wire keys also accepted when deserializing.
    pub aliases: &'static [&'static str],

    /// Semantic classification of the declared type.
    pub kind: FieldKind,

    /// Rendered Rust type, for diagnostics.
    pub type_name: &'static str,

    /// True iff the field is `Option<T>` or carries the `optional` marker.
    /// Read once at derive time, never re-evaluated per instance.
    pub nullable: bool,

    /// Index of this field in the constructor argument slice.
    pub ctor_position: usize,
}

impl FieldSpec {
    /// Returns a builder for `FieldSpec`.
    pub const fn builder() -> FieldSpecBuilder {
        FieldSpecBuilder::new()
    }

    /// True if `key` resolves to this field, by wire name or alias.
    pub fn matches_key(&self, key: &str) -> bool {
        self.wire_name == key || self.aliases.iter().any(|alias| *alias == key)
    }
}

/// Builder for [`FieldSpec`], usable in `const` context.
pub struct FieldSpecBuilder {
    name: Option<&'static str>,
    wire_name: Option<&'static str>,
    aliases: &'static [&'static str],
    kind: FieldKind,
    type_name: &'static str,
    nullable: bool,
    ctor_position: Option<usize>,
}

impl FieldSpecBuilder {
    /// Creates a new builder with no field set.
    #[allow(clippy::new_without_default)]
    pub const fn new() -> Self {
        Self {
            name: None,
            wire_name: None,
            aliases: &[],
            kind: FieldKind::Other,
            type_name: "",
            nullable: false,
            ctor_position: None,
        }
    }

    /// Sets the Rust field name. Also used as the wire name unless
    /// [`wire_name`](Self::wire_name) is set.
    pub const fn name(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Overrides the wire key.
    pub const fn wire_name(mut self, wire_name: &'static str) -> Self {
        self.wire_name = Some(wire_name);
        self
    }

    /// Sets the alternate wire keys.
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Sets the semantic classification.
    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the rendered type name.
    pub const fn type_name(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }

    /// Marks the field nullable.
    pub const fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the constructor position.
    pub const fn ctor_position(mut self, position: usize) -> Self {
        self.ctor_position = Some(position);
        self
    }

    /// Builds the `FieldSpec`.
    pub const fn build(self) -> FieldSpec {
        let name = self.name.unwrap();
        let wire_name = match self.wire_name {
            Some(wire_name) => wire_name,
            None => name,
        };
        FieldSpec {
            name,
            wire_name,
            aliases: self.aliases,
            kind: self.kind,
            type_name: self.type_name,
            nullable: self.nullable,
            ctor_position: self.ctor_position.unwrap(),
        }
    }
}

/// The full metadata for one record type: its name and the ordered table of
/// field specs (declaration order).
#[derive(Clone, Copy, Debug)]
pub struct RecordShape {
    /// Name of the target type.
    pub type_name: &'static str,

    /// All fields, in declaration order.
    pub fields: &'static [FieldSpec],
}

impl RecordShape {
    /// Creates a shape from a type name and a field table.
    pub const fn new(type_name: &'static str, fields: &'static [FieldSpec]) -> Self {
        Self { type_name, fields }
    }

    /// Number of declared fields.
    pub const fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Resolves a wire key to a field, by wire name or alias.
    pub fn field_by_key(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.matches_key(key))
    }

    /// The fields whose absence at deserialize time is a hard error.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| !field.nullable)
    }

    /// Checks the structural invariants a hand-written `Record`
    /// implementation could violate: constructor positions must be a
    /// permutation of `0..field_count`, and no wire key (name or alias) may
    /// be claimed by two fields.
    ///
    /// Derived shapes always pass; the registry runs this at registration
    /// time so that an invalid shape is rejected before first use.
    pub fn validate(&self) -> Result<(), ShapeError> {
        let count = self.fields.len();
        let mut claimed: Vec<Option<&'static str>> = vec![None; count];
        for field in self.fields {
            if field.ctor_position >= count {
                return Err(ShapeError::PositionOutOfBounds {
                    type_name: self.type_name,
                    field: field.name,
                    position: field.ctor_position,
                    field_count: count,
                });
            }
            if let Some(first) = claimed[field.ctor_position] {
                return Err(ShapeError::PositionConflict {
                    type_name: self.type_name,
                    position: field.ctor_position,
                    first,
                    second: field.name,
                });
            }
            claimed[field.ctor_position] = Some(field.name);
        }

        let mut claimed_keys: Vec<&'static str> = Vec::new();
        for field in self.fields {
            let keys = core::iter::once(field.wire_name).chain(field.aliases.iter().copied());
            for key in keys {
                if claimed_keys.contains(&key) {
                    return Err(ShapeError::DuplicateWireName {
                        type_name: self.type_name,
                        wire_name: key,
                    });
                }
                claimed_keys.push(key);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::builder()
            .name("id")
            .kind(FieldKind::Scalar)
            .type_name("u64")
            .ctor_position(0)
            .build(),
        FieldSpec::builder()
            .name("label")
            .wire_name("display_label")
            .aliases(&["caption"])
            .kind(FieldKind::Scalar)
            .type_name("Option<String>")
            .nullable(true)
            .ctor_position(1)
            .build(),
    ];

    const SHAPE: RecordShape = RecordShape::new("Widget", FIELDS);

    #[test]
    fn builder_defaults_wire_name_to_name() {
        assert_eq!(SHAPE.fields[0].wire_name, "id");
        assert_eq!(SHAPE.fields[1].wire_name, "display_label");
    }

    #[test]
    fn key_resolution_covers_aliases() {
        assert_eq!(SHAPE.field_by_key("caption").map(|f| f.name), Some("label"));
        assert!(SHAPE.field_by_key("label").is_none());
        assert!(SHAPE.field_by_key("id").is_some());
    }

    #[test]
    fn required_fields_excludes_nullable() {
        let required: Vec<&str> = SHAPE.required_fields().map(|f| f.name).collect();
        assert_eq!(required, ["id"]);
    }

    #[test]
    fn validate_accepts_well_formed_shape() {
        assert!(SHAPE.validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_wire_key() {
        static FIELDS: &[FieldSpec] = &[
            FieldSpec::builder()
                .name("field")
                .kind(FieldKind::Scalar)
                .ctor_position(0)
                .build(),
            FieldSpec::builder()
                .name("same_field")
                .wire_name("field")
                .kind(FieldKind::Scalar)
                .ctor_position(1)
                .build(),
        ];
        let shape = RecordShape::new("BadRecord", FIELDS);
        assert!(matches!(
            shape.validate(),
            Err(ShapeError::DuplicateWireName {
                wire_name: "field",
                ..
            })
        ));
    }

    #[test]
    fn validate_rejects_alias_clashes() {
        // alias duplicating the field's own wire name
        static SELF_CLASH: &[FieldSpec] = &[FieldSpec::builder()
            .name("a")
            .aliases(&["a"])
            .kind(FieldKind::Scalar)
            .ctor_position(0)
            .build()];
        let shape = RecordShape::new("BadRecord", SELF_CLASH);
        assert!(matches!(
            shape.validate(),
            Err(ShapeError::DuplicateWireName { wire_name: "a", .. })
        ));

        // alias claiming a later field's wire name
        static CROSS_CLASH: &[FieldSpec] = &[
            FieldSpec::builder()
                .name("a")
                .aliases(&["b"])
                .kind(FieldKind::Scalar)
                .ctor_position(0)
                .build(),
            FieldSpec::builder()
                .name("b")
                .kind(FieldKind::Scalar)
                .ctor_position(1)
                .build(),
        ];
        let shape = RecordShape::new("BadRecord", CROSS_CLASH);
        assert!(matches!(
            shape.validate(),
            Err(ShapeError::DuplicateWireName { wire_name: "b", .. })
        ));
    }

    #[test]
    fn validate_rejects_position_conflict() {
        static FIELDS: &[FieldSpec] = &[
            FieldSpec::builder()
                .name("a")
                .kind(FieldKind::Scalar)
                .ctor_position(0)
                .build(),
            FieldSpec::builder()
                .name("b")
                .kind(FieldKind::Scalar)
                .ctor_position(0)
                .build(),
        ];
        let shape = RecordShape::new("BadRecord", FIELDS);
        assert!(matches!(
            shape.validate(),
            Err(ShapeError::PositionConflict { position: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_out_of_bounds_position() {
        static FIELDS: &[FieldSpec] = &[FieldSpec::builder()
            .name("a")
            .kind(FieldKind::Scalar)
            .ctor_position(3)
            .build()];
        let shape = RecordShape::new("BadRecord", FIELDS);
        assert!(matches!(
            shape.validate(),
            Err(ShapeError::PositionOutOfBounds { position: 3, .. })
        ));
    }
}
