//! Serialize direction of the codec.

use bijective_value::{Mapping, Value};

use crate::record::Record;

/// Serializes a record into a mapping node.
///
/// Fields are emitted in declaration order, each under its wire key.
/// Required fields are non-`Option` Rust fields and therefore always carry a
/// value; nullable fields emit null when `None`. Serialization is total: the
/// producer-side null-required-field failure mode cannot arise here, because
/// the type system already rules it out.
pub fn to_value<T: Record>(record: &T) -> Value {
    let shape = T::SHAPE;
    tracing::trace!(type_name = shape.type_name, "serializing record");

    let mut mapping = Mapping::with_capacity(shape.fields.len());
    for (index, field) in shape.fields.iter().enumerate() {
        mapping.insert(field.wire_name, record.read_field(index));
    }
    Value::Mapping(mapping)
}
