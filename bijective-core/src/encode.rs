//! Conversion from Rust values into value-tree nodes.

use std::collections::{BTreeMap, HashMap};

use bijective_value::{Mapping, Number, Value};
use indexmap::IndexMap;

/// A type that can be emitted as a value-tree node.
///
/// Implemented for the primitives, strings, sequences, and string-keyed maps
/// the codec understands; `#[derive(Record)]` adds an implementation for
/// each record type that delegates to [`to_value`](crate::to_value).
///
/// Encoding is total: a well-typed Rust value always has a node
/// representation, so there is no error channel on this side.
pub trait Encode {
    /// Emits this value as a node.
    fn encode(&self) -> Value;
}

impl Encode for bool {
    fn encode(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_encode_number {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self) -> Value {
                Value::Number(Number::from(*self))
            }
        }
    )*};
}

impl_encode_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

impl Encode for str {
    fn encode(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl Encode for String {
    fn encode(&self) -> Value {
        Value::String(self.clone())
    }
}

/// `None` encodes as null; the consume side accepts both null and an absent
/// key, so the producer does not need to omit the entry.
impl<T: Encode> Encode for Option<T> {
    fn encode(&self) -> Value {
        match self {
            Some(value) => value.encode(),
            None => Value::Null,
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn encode(&self) -> Value {
        Value::Sequence(self.iter().map(Encode::encode).collect())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self) -> Value {
        self.as_slice().encode()
    }
}

macro_rules! impl_encode_map {
    ($($map:ident),*) => {$(
        impl<T: Encode> Encode for $map<String, T> {
            fn encode(&self) -> Value {
                let mut mapping = Mapping::with_capacity(self.len());
                for (key, value) in self {
                    mapping.insert(key.clone(), value.encode());
                }
                Value::Mapping(mapping)
            }
        }
    )*};
}

impl_encode_map!(HashMap, BTreeMap, IndexMap);

impl Encode for Value {
    fn encode(&self) -> Value {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_encodes_none_as_null() {
        assert_eq!(None::<i32>.encode(), Value::Null);
        assert_eq!(Some(5i32).encode(), Value::from(5));
    }

    #[test]
    fn sequences_encode_element_wise() {
        let seq = vec![Some(1i64), None];
        assert_eq!(
            seq.encode(),
            Value::Sequence(vec![Value::from(1i64), Value::Null])
        );
    }

    #[test]
    fn maps_encode_as_mappings() {
        let mut map = BTreeMap::new();
        map.insert("k".to_owned(), 2i32);
        let node = map.encode();
        assert_eq!(node.get("k"), Some(&Value::from(2)));
    }
}
