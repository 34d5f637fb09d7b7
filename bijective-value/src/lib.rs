#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod value;
pub use value::*;

mod number;
pub use number::*;

mod object;
pub use object::*;

mod format;
