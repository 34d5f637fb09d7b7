//! Parsing of `#[record(...)]` field attributes and syntactic type
//! classification.
//!
//! Supported field attributes:
//! - `rename = "key"`: wire key used instead of the field name
//! - `alias = "key"`: an extra wire key accepted when deserializing
//!   (repeatable)
//! - `optional`: an absent or null wire value falls back to
//!   `Default::default()` instead of failing

use syn::{Field, GenericArgument, PathArguments, Type};

/// Parsed `#[record(...)]` attributes of one field.
#[derive(Debug, Clone, Default)]
pub struct RecordFieldMeta {
    /// Wire key override; `None` means the field name is the wire key.
    pub rename: Option<String>,
    /// Alternate wire keys, in attribute order.
    pub aliases: Vec<String>,
    /// Whether an absent or null value falls back to the type's default.
    pub optional: bool,
}

/// Syntactic classification of a field's declared type.
///
/// Purely textual: the derive sees tokens, not resolved types, so `Vec` is a
/// sequence by its name and an unrecognized path is assumed to be a nested
/// record. The classification only feeds diagnostics and the field table; the
/// generated code goes through the `Encode`/`Decode` traits, which the
/// compiler checks for real.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTypeClass {
    /// bool, the fixed-width integers, f32/f64, String.
    Scalar,
    /// `Vec<T>`, arrays, slices.
    Sequence,
    /// `HashMap`, `BTreeMap`, `IndexMap` with any arguments.
    Mapping,
    /// Any other single-path type; assumed to be a nested record.
    Record,
    /// Types the derive cannot classify (references, tuples, pointers).
    Other,
}

/// Parse the `#[record(...)]` attributes of a field.
pub fn parse_field_meta(field: &Field) -> syn::Result<RecordFieldMeta> {
    let mut meta = RecordFieldMeta::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("rename") {
                let lit: syn::LitStr = nested.value()?.parse()?;
                if meta.rename.is_some() {
                    return Err(syn::Error::new(lit.span(), "duplicate `rename` attribute"));
                }
                meta.rename = Some(lit.value());
            } else if nested.path.is_ident("alias") {
                let lit: syn::LitStr = nested.value()?.parse()?;
                meta.aliases.push(lit.value());
            } else if nested.path.is_ident("optional") {
                meta.optional = true;
            } else {
                return Err(nested.error("expected `rename`, `alias`, or `optional`"));
            }
            Ok(())
        })?;
    }

    Ok(meta)
}

const SCALAR_IDENTS: &[&str] = &[
    "bool", "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64", "String",
];

const MAPPING_IDENTS: &[&str] = &["HashMap", "BTreeMap", "IndexMap"];

/// Classify a declared type by its surface syntax, looking through `Option`.
pub fn classify_type(ty: &Type) -> FieldTypeClass {
    match ty {
        Type::Path(path) => {
            let Some(segment) = path.path.segments.last() else {
                return FieldTypeClass::Other;
            };
            let ident = segment.ident.to_string();
            if ident == "Option" {
                return match option_inner(ty) {
                    Some(inner) => classify_type(inner),
                    None => FieldTypeClass::Other,
                };
            }
            if SCALAR_IDENTS.contains(&ident.as_str()) {
                FieldTypeClass::Scalar
            } else if ident == "Vec" {
                FieldTypeClass::Sequence
            } else if MAPPING_IDENTS.contains(&ident.as_str()) {
                FieldTypeClass::Mapping
            } else {
                FieldTypeClass::Record
            }
        }
        Type::Array(_) | Type::Slice(_) => FieldTypeClass::Sequence,
        _ => FieldTypeClass::Other,
    }
}

/// If `ty` is syntactically `Option<T>` (optionally path-qualified), returns
/// the inner `T`.
pub fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn named_field(tokens: syn::FieldsNamed) -> Field {
        tokens.named.into_iter().next().unwrap()
    }

    #[test]
    fn parses_rename_alias_and_optional() {
        let field = named_field(parse_quote! {{
            #[record(rename = "stringField", alias = "string_field", alias = "str", optional)]
            value: String
        }});
        let meta = parse_field_meta(&field).unwrap();
        assert_eq!(meta.rename.as_deref(), Some("stringField"));
        assert_eq!(meta.aliases, ["string_field", "str"]);
        assert!(meta.optional);
    }

    #[test]
    fn rejects_unknown_attribute_key() {
        let field = named_field(parse_quote! {{
            #[record(skip)]
            value: String
        }});
        let err = parse_field_meta(&field).unwrap_err();
        assert!(err.to_string().contains("expected `rename`"));
    }

    #[test]
    fn rejects_duplicate_rename() {
        let field = named_field(parse_quote! {{
            #[record(rename = "a", rename = "b")]
            value: String
        }});
        assert!(parse_field_meta(&field).is_err());
    }

    #[test]
    fn classification_by_surface_syntax() {
        let cases: &[(Type, FieldTypeClass)] = &[
            (parse_quote!(i64), FieldTypeClass::Scalar),
            (parse_quote!(String), FieldTypeClass::Scalar),
            (parse_quote!(Vec<u8>), FieldTypeClass::Sequence),
            (parse_quote!([f64; 4]), FieldTypeClass::Sequence),
            (parse_quote!(HashMap<String, i32>), FieldTypeClass::Mapping),
            (parse_quote!(indexmap::IndexMap<String, Value>), FieldTypeClass::Mapping),
            (parse_quote!(Address), FieldTypeClass::Record),
            (parse_quote!(Option<Vec<String>>), FieldTypeClass::Sequence),
            (parse_quote!(&'static str), FieldTypeClass::Other),
        ];
        for (ty, expected) in cases {
            assert_eq!(classify_type(ty), *expected);
        }
    }

    #[test]
    fn option_inner_looks_through_qualification() {
        let ty: Type = parse_quote!(::core::option::Option<String>);
        let inner = option_inner(&ty).unwrap();
        assert_eq!(classify_type(inner), FieldTypeClass::Scalar);

        let ty: Type = parse_quote!(Vec<String>);
        assert!(option_inner(&ty).is_none());
    }
}
