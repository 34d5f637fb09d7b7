//! Error taxonomy of the codec.
//!
//! Two families, deliberately separate:
//!
//! - [`ShapeError`]: configuration errors, raised when a shape is validated
//!   (at registration). Fatal for the type: every subsequent call fails
//!   identically.
//! - [`DecodeError`]: validation errors, raised while deserializing a node.
//!   Recoverable by the caller by rejecting the input; never retried
//!   internally.

use core::fmt;

use bijective_value::{Number, ValueType};

/// A segment in the path from the root node to the error site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// A key in a mapping.
    Field(String),
    /// An index in a sequence.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, ".{name}"),
            PathSegment::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// A structural configuration error: the field table of a type cannot be
/// used as codec metadata. Detected when the shape is validated, never at
/// codec-use time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShapeError {
    /// Two fields claim the same wire key (name or alias).
    DuplicateWireName {
        /// Name of the record type.
        type_name: &'static str,
        /// The contested key.
        wire_name: &'static str,
    },
    /// A constructor position is outside `0..field_count`.
    PositionOutOfBounds {
        /// Name of the record type.
        type_name: &'static str,
        /// Field carrying the bad position.
        field: &'static str,
        /// The out-of-bounds position.
        position: usize,
        /// Number of declared fields.
        field_count: usize,
    },
    /// Two fields share a constructor position.
    PositionConflict {
        /// Name of the record type.
        type_name: &'static str,
        /// The contested position.
        position: usize,
        /// First field claiming it.
        first: &'static str,
        /// Second field claiming it.
        second: &'static str,
    },
    /// The type was never registered with the registry that was asked to
    /// handle it.
    NotRegistered {
        /// Name of the record type.
        type_name: &'static str,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::DuplicateWireName {
                type_name,
                wire_name,
            } => {
                write!(
                    f,
                    "record `{type_name}` declares multiple fields for wire key `{wire_name}`"
                )
            }
            ShapeError::PositionOutOfBounds {
                type_name,
                field,
                position,
                field_count,
            } => {
                write!(
                    f,
                    "record `{type_name}`: constructor position {position} of field `{field}` \
                     is out of bounds for {field_count} field(s)"
                )
            }
            ShapeError::PositionConflict {
                type_name,
                position,
                first,
                second,
            } => {
                write!(
                    f,
                    "record `{type_name}`: fields `{first}` and `{second}` share \
                     constructor position {position}"
                )
            }
            ShapeError::NotRegistered { type_name } => {
                write!(f, "record `{type_name}` is not registered with this registry")
            }
        }
    }
}

impl core::error::Error for ShapeError {}

/// Specific kinds of deserialization failure.
#[derive(Clone, Debug, PartialEq)]
pub enum DecodeErrorKind {
    /// The node does not have the shape the target type expects.
    TypeMismatch {
        /// What the target expected.
        expected: &'static str,
        /// What the node actually was.
        got: ValueType,
    },
    /// One or more required fields are missing from the node, or present
    /// with a null value; the two cases are equivalent violations.
    MissingFields {
        /// Name of the record type.
        type_name: &'static str,
        /// Wire keys of the violated fields, in declaration order.
        fields: Vec<&'static str>,
    },
    /// The node carries a key that resolves to no field.
    UnknownField {
        /// Name of the record type.
        type_name: &'static str,
        /// The unresolved key.
        field: String,
        /// Rendered value under the key, for the error message.
        value: String,
    },
    /// A number does not fit the target field type.
    NumberOutOfRange {
        /// The target type.
        target: &'static str,
        /// The offending number.
        value: Number,
    },
    /// A configuration error surfaced through a decode entry point.
    Shape(ShapeError),
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got:?}")
            }
            DecodeErrorKind::MissingFields { type_name, fields } => {
                write!(
                    f,
                    "record `{type_name}` is missing required field(s): {}",
                    BacktickList(fields)
                )
            }
            DecodeErrorKind::UnknownField {
                type_name,
                field,
                value,
            } => {
                write!(
                    f,
                    "record `{type_name}` has no field for wire key `{field}` with value `{value}`"
                )
            }
            DecodeErrorKind::NumberOutOfRange { target, value } => {
                write!(f, "number out of range: {value} does not fit in {target}")
            }
            DecodeErrorKind::Shape(e) => write!(f, "{e}"),
        }
    }
}

struct BacktickList<'a>(&'a [&'static str]);

impl fmt::Display for BacktickList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "`{name}`")?;
        }
        Ok(())
    }
}

/// Error returned when deserializing a node fails.
///
/// Carries the specific [`DecodeErrorKind`] plus the path from the root node
/// to the error site, accumulated as the failure unwinds through enclosing
/// nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeError {
    /// The specific kind of failure.
    pub kind: DecodeErrorKind,
    /// Path from the root node to the error site.
    pub path: Vec<PathSegment>,
}

impl DecodeError {
    /// Creates an error with an empty path.
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    /// Prepends a path segment; used while unwinding from the error site.
    pub fn with_path(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// Renders the path, or `<root>` when the error is at the root node.
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            "<root>".into()
        } else {
            use core::fmt::Write;
            let mut s = String::new();
            for segment in &self.path {
                let _ = write!(s, "{segment}");
            }
            s
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "at {}: {}", self.path_string(), self.kind)
        }
    }
}

impl core::error::Error for DecodeError {}

impl From<ShapeError> for DecodeError {
    fn from(e: ShapeError) -> Self {
        DecodeError::new(DecodeErrorKind::Shape(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path() {
        let err = DecodeError::new(DecodeErrorKind::TypeMismatch {
            expected: "number",
            got: ValueType::Null,
        })
        .with_path(PathSegment::Index(2))
        .with_path(PathSegment::Field("items".into()));
        assert_eq!(
            err.to_string(),
            "at .items[2]: type mismatch: expected number, got Null"
        );
    }

    #[test]
    fn missing_fields_lists_every_violation() {
        let err = DecodeError::new(DecodeErrorKind::MissingFields {
            type_name: "TestObject",
            fields: vec!["stringField", "intField"],
        });
        assert_eq!(
            err.to_string(),
            "record `TestObject` is missing required field(s): `stringField`, `intField`"
        );
    }
}
