#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

use proc_macro2::TokenStream;

mod emit;
mod field_meta;

/// Entry point for `#[derive(Record)]`, operating on `proc-macro2` streams.
///
/// Parse failures and unsupported inputs come back as `compile_error!`
/// invocations so the caller sees a spanned diagnostic instead of a panic.
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = match syn::parse2::<syn::DeriveInput>(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };
    emit::expand(&input).unwrap_or_else(|err| err.to_compile_error())
}
