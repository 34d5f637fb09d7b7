#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

pub use bijective_core::*;

pub use bijective_macros::Record;
