#![doc = include_str!("../README.md")]

/// Derives the `Record` trait plus `Encode`/`Decode` for a named-field
/// struct, emitting its static field table.
///
/// Field attributes: `#[record(rename = "key")]`, `#[record(alias = "key")]`
/// (repeatable), `#[record(optional)]`. Container attribute:
/// `#[record(crate = "path")]` to point the generated code at a renamed
/// dependency.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    bijective_macros_impl::derive_record(input.into()).into()
}
