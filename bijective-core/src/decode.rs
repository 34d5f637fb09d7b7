//! Conversion from value-tree nodes into Rust values, plus the strictness
//! options threaded through nested decodes.

use std::collections::{BTreeMap, HashMap};

use bijective_value::{Number, Value};
use indexmap::IndexMap;

use crate::error::{DecodeError, DecodeErrorKind, PathSegment};

/// Strictness knobs for deserialization.
///
/// The defaults are the strict, bijective configuration; both knobs exist to
/// tolerate schema drift in inputs produced elsewhere. Options are carried
/// through nested decodes unchanged, so a single configuration governs the
/// whole tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// When true (the default), an input key that resolves to no field of
    /// the target record fails deserialization.
    pub deny_unknown_keys: bool,

    /// When true (the default), an unknown key whose value is null is
    /// tolerated even when unknown keys are denied.
    pub allow_unused_nulls: bool,
}

impl DecodeOptions {
    /// The strict default configuration.
    pub const fn new() -> Self {
        Self {
            deny_unknown_keys: true,
            allow_unused_nulls: true,
        }
    }

    /// Sets whether unknown keys are denied.
    pub const fn deny_unknown_keys(mut self, deny: bool) -> Self {
        self.deny_unknown_keys = deny;
        self
    }

    /// Sets whether unknown keys with null values are tolerated.
    pub const fn allow_unused_nulls(mut self, allow: bool) -> Self {
        self.allow_unused_nulls = allow;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A type that can be decoded from a value-tree node.
///
/// Implemented for the primitives, strings, sequences, and string-keyed maps
/// the codec understands; `#[derive(Record)]` adds an implementation for
/// each record type that re-enters the engine, so nested records decode
/// under the same contract as the root.
pub trait Decode: Sized {
    /// Decodes a node into this type.
    fn decode(value: &Value, options: &DecodeOptions) -> Result<Self, DecodeError>;
}

fn mismatch(expected: &'static str, value: &Value) -> DecodeError {
    DecodeError::new(DecodeErrorKind::TypeMismatch {
        expected,
        got: value.value_type(),
    })
}

fn out_of_range(target: &'static str, value: Number) -> DecodeError {
    DecodeError::new(DecodeErrorKind::NumberOutOfRange { target, value })
}

impl Decode for bool {
    fn decode(value: &Value, _options: &DecodeOptions) -> Result<Self, DecodeError> {
        value.as_bool().ok_or_else(|| mismatch("boolean", value))
    }
}

macro_rules! impl_decode_signed {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode(value: &Value, _options: &DecodeOptions) -> Result<Self, DecodeError> {
                let number = value.as_number().ok_or_else(|| mismatch("number", value))?;
                let wide = number
                    .to_i64()
                    .ok_or_else(|| out_of_range(stringify!($ty), number))?;
                <$ty>::try_from(wide).map_err(|_| out_of_range(stringify!($ty), number))
            }
        }
    )*};
}

macro_rules! impl_decode_unsigned {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            fn decode(value: &Value, _options: &DecodeOptions) -> Result<Self, DecodeError> {
                let number = value.as_number().ok_or_else(|| mismatch("number", value))?;
                let wide = number
                    .to_u64()
                    .ok_or_else(|| out_of_range(stringify!($ty), number))?;
                <$ty>::try_from(wide).map_err(|_| out_of_range(stringify!($ty), number))
            }
        }
    )*};
}

impl_decode_signed!(i8, i16, i32, i64);
impl_decode_unsigned!(u8, u16, u32, u64);

impl Decode for f64 {
    fn decode(value: &Value, _options: &DecodeOptions) -> Result<Self, DecodeError> {
        let number = value.as_number().ok_or_else(|| mismatch("number", value))?;
        Ok(number.to_f64())
    }
}

impl Decode for f32 {
    fn decode(value: &Value, options: &DecodeOptions) -> Result<Self, DecodeError> {
        f64::decode(value, options).map(|n| n as f32)
    }
}

impl Decode for String {
    fn decode(value: &Value, _options: &DecodeOptions) -> Result<Self, DecodeError> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch("string", value))
    }
}

/// Null decodes to `None`; anything else decodes as the inner type. The
/// absent-key case never reaches this impl: the engine binds `None` into
/// the constructor slot directly.
impl<T: Decode> Decode for Option<T> {
    fn decode(value: &Value, options: &DecodeOptions) -> Result<Self, DecodeError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::decode(value, options).map(Some)
        }
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(value: &Value, options: &DecodeOptions) -> Result<Self, DecodeError> {
        let seq = value
            .as_sequence()
            .ok_or_else(|| mismatch("sequence", value))?;
        seq.iter()
            .enumerate()
            .map(|(index, child)| {
                T::decode(child, options).map_err(|e| e.with_path(PathSegment::Index(index)))
            })
            .collect()
    }
}

macro_rules! impl_decode_map {
    ($($map:ident),*) => {$(
        impl<T: Decode> Decode for $map<String, T> {
            fn decode(value: &Value, options: &DecodeOptions) -> Result<Self, DecodeError> {
                let mapping = value
                    .as_mapping()
                    .ok_or_else(|| mismatch("mapping", value))?;
                mapping
                    .iter()
                    .map(|(key, child)| {
                        T::decode(child, options)
                            .map(|decoded| (key.to_owned(), decoded))
                            .map_err(|e| e.with_path(PathSegment::Field(key.to_owned())))
                    })
                    .collect()
            }
        }
    )*};
}

impl_decode_map!(HashMap, BTreeMap, IndexMap);

impl Decode for Value {
    fn decode(value: &Value, _options: &DecodeOptions) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: DecodeOptions = DecodeOptions::new();

    #[test]
    fn integers_enforce_range() {
        let ok = i8::decode(&Value::from(-5), &OPTIONS).unwrap();
        assert_eq!(ok, -5);

        let err = u8::decode(&Value::from(300), &OPTIONS).unwrap_err();
        assert!(matches!(
            err.kind,
            DecodeErrorKind::NumberOutOfRange { target: "u8", .. }
        ));

        let err = u32::decode(&Value::from(-1), &OPTIONS).unwrap_err();
        assert!(matches!(
            err.kind,
            DecodeErrorKind::NumberOutOfRange { target: "u32", .. }
        ));
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::decode(&Value::from(3), &OPTIONS).unwrap(), 3.0);
    }

    #[test]
    fn integers_reject_floats() {
        let err = i64::decode(&Value::from(1.5), &OPTIONS).unwrap_err();
        assert!(matches!(
            err.kind,
            DecodeErrorKind::NumberOutOfRange { target: "i64", .. }
        ));
    }

    #[test]
    fn option_maps_null_to_none() {
        assert_eq!(Option::<String>::decode(&Value::Null, &OPTIONS).unwrap(), None);
        assert_eq!(
            Option::<String>::decode(&Value::from("x"), &OPTIONS).unwrap(),
            Some("x".to_owned())
        );
    }

    #[test]
    fn sequence_errors_carry_element_paths() {
        let node = Value::from(vec![Value::from(1), Value::from("oops")]);
        let err = Vec::<i32>::decode(&node, &OPTIONS).unwrap_err();
        assert_eq!(err.path, vec![PathSegment::Index(1)]);
    }

    #[test]
    fn map_errors_carry_key_paths() {
        let node = Value::from(bijective_value::Mapping::from_iter([("k", "oops")]));
        let err = BTreeMap::<String, i32>::decode(&node, &OPTIONS).unwrap_err();
        assert_eq!(err.path, vec![PathSegment::Field("k".into())]);
    }
}
