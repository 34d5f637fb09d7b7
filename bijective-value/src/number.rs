//! Numeric value type.

use core::fmt::{self, Debug, Display, Formatter};

/// A number decoded from the wire: a signed integer, an unsigned integer, or
/// a float. The three representations are kept apart so that integers survive
/// a round trip losslessly.
#[derive(Copy, Clone)]
pub struct Number {
    repr: Repr,
}

#[derive(Copy, Clone)]
enum Repr {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    /// Create a number from a signed integer.
    pub const fn from_i64(n: i64) -> Self {
        Self { repr: Repr::I64(n) }
    }

    /// Create a number from an unsigned integer.
    pub const fn from_u64(n: u64) -> Self {
        Self { repr: Repr::U64(n) }
    }

    /// Create a number from a float.
    pub const fn from_f64(n: f64) -> Self {
        Self { repr: Repr::F64(n) }
    }

    /// The value as an `i64`, if it is an integer that fits.
    pub const fn to_i64(self) -> Option<i64> {
        match self.repr {
            Repr::I64(n) => Some(n),
            Repr::U64(n) if n <= i64::MAX as u64 => Some(n as i64),
            _ => None,
        }
    }

    /// The value as a `u64`, if it is a non-negative integer.
    pub const fn to_u64(self) -> Option<u64> {
        match self.repr {
            Repr::I64(n) if n >= 0 => Some(n as u64),
            Repr::U64(n) => Some(n),
            _ => None,
        }
    }

    /// The value as an `f64`. Integers are converted; always succeeds.
    pub const fn to_f64(self) -> f64 {
        match self.repr {
            Repr::I64(n) => n as f64,
            Repr::U64(n) => n as f64,
            Repr::F64(n) => n,
        }
    }

    /// True if the value is stored as a float.
    pub const fn is_float(self) -> bool {
        matches!(self.repr, Repr::F64(_))
    }
}

/// Signed and unsigned integers compare numerically across representations;
/// floats only compare to floats, so `2` never equals `2.0`.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.repr, other.repr) {
            (Repr::I64(a), Repr::I64(b)) => a == b,
            (Repr::U64(a), Repr::U64(b)) => a == b,
            (Repr::F64(a), Repr::F64(b)) => a == b,
            (Repr::I64(a), Repr::U64(b)) | (Repr::U64(b), Repr::I64(a)) => {
                a >= 0 && a as u64 == b
            }
            _ => false,
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.repr {
            Repr::I64(n) => write!(f, "{n}"),
            Repr::U64(n) => write!(f, "{n}"),
            Repr::F64(n) => write!(f, "{n}"),
        }
    }
}

impl Debug for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Number({self})")
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Number {
            fn from(n: $ty) -> Self {
                Self::from_i64(n as i64)
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Number {
            fn from(n: $ty) -> Self {
                Self::from_u64(n as u64)
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Self::from_f64(n as f64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Self::from_f64(n)
    }
}
