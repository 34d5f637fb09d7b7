//! Expansion of `#[derive(Record)]`.
//!
//! For a named-field struct this emits, inside an anonymous `const` block:
//! the static field table, the `Record` implementation driving it, and
//! `Encode`/`Decode` implementations that re-enter the codec engine so the
//! type composes as a nested record.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields};

use crate::field_meta::{FieldTypeClass, classify_type, option_inner, parse_field_meta};

/// Per-container `#[record(...)]` attributes.
#[derive(Default)]
struct ContainerMeta {
    /// Path to the crate providing the codec items; defaults to
    /// `::bijective`. Set `#[record(crate = "...")]` when deriving inside a
    /// crate that renames the dependency.
    krate: Option<syn::Path>,
}

fn parse_container_meta(input: &DeriveInput) -> syn::Result<ContainerMeta> {
    let mut meta = ContainerMeta::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("crate") {
                let lit: syn::LitStr = nested.value()?.parse()?;
                meta.krate = Some(lit.parse_with(syn::Path::parse_mod_style)?);
            } else {
                return Err(nested.error("expected `crate`"));
            }
            Ok(())
        })?;
    }
    Ok(meta)
}

/// Expands the derive input, or explains why the type is not derivable.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "`#[derive(Record)]` does not support generic types",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "`#[derive(Record)]` requires named fields; tuple and unit structs \
                     have no wire keys to bind",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new(
                input.ident.span(),
                "`#[derive(Record)]` only supports structs with named fields",
            ));
        }
    };

    let container = parse_container_meta(input)?;
    let krate = container
        .krate
        .unwrap_or_else(|| syn::parse_quote!(::bijective));

    let ident = &input.ident;
    let type_name = ident.to_string();

    let mut claimed_keys: HashSet<String> = HashSet::new();
    let mut specs = Vec::with_capacity(fields.len());
    let mut read_arms = Vec::with_capacity(fields.len());
    let mut construct_fields = Vec::with_capacity(fields.len());

    for (position, field) in fields.iter().enumerate() {
        let name = field.ident.as_ref().unwrap();
        let ty = &field.ty;
        let meta = parse_field_meta(field)?;

        let wire_name = meta.rename.clone().unwrap_or_else(|| name.to_string());
        for key in std::iter::once(&wire_name).chain(meta.aliases.iter()) {
            if !claimed_keys.insert(key.clone()) {
                return Err(syn::Error::new(
                    name.span(),
                    format!("wire key `{key}` is already claimed by another field"),
                ));
            }
        }

        let kind = match classify_type(ty) {
            FieldTypeClass::Scalar => quote!(#krate::FieldKind::Scalar),
            FieldTypeClass::Sequence => quote!(#krate::FieldKind::Sequence),
            FieldTypeClass::Mapping => quote!(#krate::FieldKind::Mapping),
            FieldTypeClass::Record => quote!(#krate::FieldKind::Record),
            FieldTypeClass::Other => quote!(#krate::FieldKind::Other),
        };

        let is_option = option_inner(ty).is_some();
        let nullable = is_option || meta.optional;
        let name_str = name.to_string();
        let type_name_str = ty.to_token_stream().to_string();
        let aliases = &meta.aliases;
        let wire = match &meta.rename {
            Some(rename) => quote!(.wire_name(#rename)),
            None => quote!(),
        };

        specs.push(quote! {
            #krate::FieldSpec::builder()
                .name(#name_str)
                #wire
                .aliases(&[#(#aliases),*])
                .kind(#kind)
                .type_name(#type_name_str)
                .nullable(#nullable)
                .ctor_position(#position)
                .build()
        });

        read_arms.push(quote! {
            #position => #krate::Encode::encode(&self.#name),
        });

        let decode_bound = quote! {
            <#ty as #krate::Decode>::decode(__value, __options).map_err(|__e| {
                __e.with_path(#krate::PathSegment::Field(
                    ::std::string::String::from(#wire_name),
                ))
            })?
        };
        let arm = if is_option {
            quote! {
                match __slots.get(#position).copied().flatten() {
                    ::core::option::Option::Some(__value) => #decode_bound,
                    ::core::option::Option::None => ::core::option::Option::None,
                }
            }
        } else if meta.optional {
            quote! {
                match __slots.get(#position).copied().flatten() {
                    ::core::option::Option::Some(__value) if !__value.is_null() => #decode_bound,
                    _ => ::core::default::Default::default(),
                }
            }
        } else {
            quote! {
                match __slots.get(#position).copied().flatten() {
                    ::core::option::Option::Some(__value) if !__value.is_null() => #decode_bound,
                    _ => {
                        return ::core::result::Result::Err(#krate::DecodeError::new(
                            #krate::DecodeErrorKind::MissingFields {
                                type_name: #type_name,
                                fields: ::std::vec![#wire_name],
                            },
                        ));
                    }
                }
            }
        };
        construct_fields.push(quote!(#name: #arm,));
    }

    Ok(quote! {
        const _: () = {
            static __FIELDS: &[#krate::FieldSpec] = &[#(#specs),*];
            static __SHAPE: #krate::RecordShape = #krate::RecordShape::new(#type_name, __FIELDS);

            #[automatically_derived]
            impl #krate::Record for #ident {
                const SHAPE: &'static #krate::RecordShape = &__SHAPE;

                fn read_field(&self, index: usize) -> #krate::Value {
                    match index {
                        #(#read_arms)*
                        _ => #krate::Value::Null,
                    }
                }

                #[allow(unused_variables)]
                fn construct(
                    __slots: &[::core::option::Option<&#krate::Value>],
                    __options: &#krate::DecodeOptions,
                ) -> ::core::result::Result<Self, #krate::DecodeError> {
                    ::core::result::Result::Ok(Self {
                        #(#construct_fields)*
                    })
                }
            }

            #[automatically_derived]
            impl #krate::Encode for #ident {
                fn encode(&self) -> #krate::Value {
                    #krate::to_value(self)
                }
            }

            #[automatically_derived]
            impl #krate::Decode for #ident {
                fn decode(
                    __value: &#krate::Value,
                    __options: &#krate::DecodeOptions,
                ) -> ::core::result::Result<Self, #krate::DecodeError> {
                    #krate::from_value_with(__value, __options)
                }
            }
        };
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_str(input: DeriveInput) -> String {
        expand(&input).unwrap().to_string()
    }

    #[test]
    fn emits_field_table_and_impls() {
        let output = expand_str(parse_quote! {
            struct Person {
                name: String,
                #[record(rename = "yearsAlive", alias = "age")]
                years: u32,
                nickname: Option<String>,
            }
        });

        assert!(output.contains("RecordShape :: new (\"Person\""));
        assert!(output.contains(". name (\"years\")"));
        assert!(output.contains(". wire_name (\"yearsAlive\")"));
        assert!(output.contains(". aliases (& [\"age\"])"));
        assert!(output.contains(". nullable (true)"));
        assert!(output.contains("impl :: bijective :: Record for Person"));
        assert!(output.contains("impl :: bijective :: Decode for Person"));
    }

    #[test]
    fn required_fields_fail_construct_when_absent() {
        let output = expand_str(parse_quote! {
            struct One {
                id: u64,
            }
        });
        assert!(output.contains("MissingFields"));
        assert!(output.contains("fields : :: std :: vec ! [\"id\"]"));
    }

    #[test]
    fn optional_marker_falls_back_to_default() {
        let output = expand_str(parse_quote! {
            struct Settings {
                #[record(optional)]
                retries: u32,
            }
        });
        assert!(output.contains(":: core :: default :: Default :: default ()"));
        assert!(!output.contains("MissingFields"));
    }

    #[test]
    fn crate_path_is_overridable() {
        let output = expand_str(parse_quote! {
            #[record(crate = "crate")]
            struct Inner {
                id: u64,
            }
        });
        assert!(output.contains("impl crate :: Record for Inner"));
        assert!(!output.contains(":: bijective :: Record"));
    }

    #[test]
    fn rejects_duplicate_wire_keys() {
        let input: DeriveInput = parse_quote! {
            struct Clash {
                a: u64,
                #[record(rename = "a")]
                b: u64,
            }
        };
        let err = expand(&input).unwrap_err();
        assert!(err.to_string().contains("wire key `a`"));
    }

    #[test]
    fn rejects_tuple_structs_enums_and_generics() {
        let tuple: DeriveInput = parse_quote!(struct Pair(u64, u64););
        assert!(expand(&tuple).is_err());

        let unit: DeriveInput = parse_quote!(struct Nothing;);
        assert!(expand(&unit).is_err());

        let an_enum: DeriveInput = parse_quote! {
            enum Either { Left, Right }
        };
        assert!(expand(&an_enum).is_err());

        let generic: DeriveInput = parse_quote! {
            struct Wrapper<T> { inner: T }
        };
        assert!(expand(&generic).is_err());
    }
}
