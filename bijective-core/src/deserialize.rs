//! Deserialize direction of the codec, the harder path.
//!
//! A mapping node resolves against the target's [`RecordShape`]: every entry
//! binds a constructor slot (or trips the unknown-key policy), every required
//! field must end up bound and non-null, and only then is the constructor
//! invoked, once, with the completed slots. Any single violation aborts the
//! whole deserialization, transitively through enclosing nodes; there is no
//! partial-success mode.

use bijective_value::Value;

use crate::decode::DecodeOptions;
use crate::error::{DecodeError, DecodeErrorKind, ShapeError};
use crate::record::Record;
use crate::shape::{FieldSpec, RecordShape};

fn bad_position(shape: &RecordShape, field: &FieldSpec) -> DecodeError {
    DecodeError::from(ShapeError::PositionOutOfBounds {
        type_name: shape.type_name,
        field: field.name,
        position: field.ctor_position,
        field_count: shape.fields.len(),
    })
}

/// Deserializes a mapping node into a record, under the strict default
/// [`DecodeOptions`].
pub fn from_value<T: Record>(value: &Value) -> Result<T, DecodeError> {
    from_value_with(value, &DecodeOptions::new())
}

/// Deserializes a mapping node into a record with explicit options.
///
/// Failure modes, in the order they are checked:
///
/// 1. The node is not a mapping: type mismatch.
/// 2. A key resolves to no field and the unknown-key policy denies it.
/// 3. A required field's key is absent, or present with a null value; the
///    two are equivalent violations. All violations for this node are
///    collected into a single [`DecodeErrorKind::MissingFields`].
/// 4. A child value fails to decode into its field's type; the error
///    propagates unchanged apart from the path prefix.
pub fn from_value_with<T: Record>(
    value: &Value,
    options: &DecodeOptions,
) -> Result<T, DecodeError> {
    let shape = T::SHAPE;
    tracing::trace!(type_name = shape.type_name, "deserializing record");

    let mapping = value.as_mapping().ok_or_else(|| {
        DecodeError::new(DecodeErrorKind::TypeMismatch {
            expected: "mapping",
            got: value.value_type(),
        })
    })?;

    let mut slots: Vec<Option<&Value>> = vec![None; shape.fields.len()];
    for (key, child) in mapping.iter() {
        match shape.field_by_key(key) {
            Some(field) => match slots.get_mut(field.ctor_position) {
                Some(slot) => *slot = Some(child),
                None => return Err(bad_position(shape, field)),
            },
            None => {
                if child.is_null() && options.allow_unused_nulls {
                    continue;
                }
                if !options.deny_unknown_keys {
                    continue;
                }
                return Err(DecodeError::new(DecodeErrorKind::UnknownField {
                    type_name: shape.type_name,
                    field: key.to_owned(),
                    value: child.to_string(),
                }));
            }
        }
    }

    let missing: Vec<&'static str> = shape
        .fields
        .iter()
        .filter(|field| {
            !field.nullable
                && slots
                    .get(field.ctor_position)
                    .copied()
                    .flatten()
                    .is_none_or(Value::is_null)
        })
        .map(|field| field.wire_name)
        .collect();
    if !missing.is_empty() {
        return Err(DecodeError::new(DecodeErrorKind::MissingFields {
            type_name: shape.type_name,
            fields: missing,
        }));
    }

    T::construct(&slots, options)
}
