//! The `Record` trait implemented by `#[derive(Record)]`.

use bijective_value::Value;

use crate::decode::DecodeOptions;
use crate::error::DecodeError;
use crate::shape::RecordShape;

/// A type the codec can convert to and from a mapping node.
///
/// Implemented by `#[derive(Record)]`, which emits the static [`RecordShape`]
/// table plus the two typed accessors the engine drives: a declaration-order
/// field reader for serialization and a constructor function for
/// deserialization.
///
/// Hand-written implementations are possible but must uphold the shape
/// invariants checked by [`RecordShape::validate`]; the
/// [`CodecRegistry`](crate::CodecRegistry) enforces them at registration.
pub trait Record: Sized {
    /// The field table for this type, built at compile time.
    const SHAPE: &'static RecordShape;

    /// Reads the field at declaration-order `index` as a value-tree node.
    /// A `None` in an `Option` field reads as [`Value::Null`]; indexes past
    /// the field count read as [`Value::Null`] as well.
    fn read_field(&self, index: usize) -> Value;

    /// Builds an instance from resolved constructor slots, arranged in
    /// `ctor_position` order. A slot is `None` when the wire key was absent.
    ///
    /// The engine has already enforced required-field presence when this is
    /// called; the implementation still fails cleanly (never panics) if
    /// handed an incomplete slice. The instance is complete the moment this
    /// returns; there is no post-construction mutation path.
    fn construct(slots: &[Option<&Value>], options: &DecodeOptions) -> Result<Self, DecodeError>;
}
