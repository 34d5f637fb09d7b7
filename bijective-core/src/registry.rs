//! Explicit codec registry.
//!
//! The registry replaces the process-wide adapter cache of a classic
//! reflective codec with an object the caller owns: types opt in through
//! [`CodecRegistry::register`], which validates the shape once and rejects
//! structurally ineligible types with a [`ShapeError`] instead of silently
//! falling back. Encode/decode through the registry refuse types that never
//! registered, so the registry doubles as the allowlist of the original
//! design.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use bijective_value::Value;

use crate::decode::DecodeOptions;
use crate::deserialize::from_value_with;
use crate::error::{DecodeError, ShapeError};
use crate::record::Record;
use crate::serialize::to_value;
use crate::shape::RecordShape;

/// A registry of record types eligible for (de)serialization, keyed by type
/// identity, carrying the [`DecodeOptions`] applied to every decode that
/// goes through it.
///
/// Safe to share across threads: lookups take a read lock and never block
/// each other; registration takes a brief write lock. Registering the same
/// type twice is idempotent (the shape is a compile-time constant, so both
/// writers store the identical table; last writer wins, harmlessly).
pub struct CodecRegistry {
    shapes: RwLock<HashMap<TypeId, &'static RecordShape>>,
    options: DecodeOptions,
}

impl CodecRegistry {
    /// Creates an empty registry with the strict default options.
    pub fn new() -> Self {
        Self::with_options(DecodeOptions::new())
    }

    /// Creates an empty registry with explicit options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            shapes: RwLock::new(HashMap::new()),
            options,
        }
    }

    /// The options applied to decodes through this registry.
    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Registers `T`, validating its shape first.
    ///
    /// A structurally ineligible shape (duplicate wire keys, bad constructor
    /// positions) is rejected here, at registration time, and will be
    /// rejected identically on every retry, since the shape is immutable.
    pub fn register<T: Record + 'static>(&self) -> Result<(), ShapeError> {
        let shape = T::SHAPE;
        shape.validate()?;
        self.shapes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(TypeId::of::<T>(), shape);
        tracing::debug!(type_name = shape.type_name, "registered record type");
        Ok(())
    }

    /// True if `T` has been registered.
    pub fn is_registered<T: Record + 'static>(&self) -> bool {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// The shape registered for `T`, if any.
    pub fn shape_of<T: Record + 'static>(&self) -> Option<&'static RecordShape> {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .copied()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.shapes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if no type has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serializes a registered record; unregistered types are refused.
    pub fn encode<T: Record + 'static>(&self, record: &T) -> Result<Value, ShapeError> {
        self.require_registered::<T>()?;
        Ok(to_value(record))
    }

    /// Deserializes a node into a registered record under this registry's
    /// options; unregistered types are refused.
    pub fn decode<T: Record + 'static>(&self, value: &Value) -> Result<T, DecodeError> {
        self.require_registered::<T>()?;
        from_value_with(value, &self.options)
    }

    fn require_registered<T: Record + 'static>(&self) -> Result<(), ShapeError> {
        if self.is_registered::<T>() {
            Ok(())
        } else {
            Err(ShapeError::NotRegistered {
                type_name: T::SHAPE.type_name,
            })
        }
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new()
    }
}
