#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use bijective_value::{Mapping, Number, Value, ValueType};

mod shape;
pub use shape::*;

mod record;
pub use record::*;

mod error;
pub use error::*;

mod encode;
pub use encode::*;

mod decode;
pub use decode::*;

mod serialize;
pub use serialize::*;

mod deserialize;
pub use deserialize::*;

mod registry;
pub use registry::*;
