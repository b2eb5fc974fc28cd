//! Expansion of `#[derive(Bind)]`.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{punctuated::Punctuated, spanned::Spanned, Data, DeriveInput, Field, Fields, Ident, LitStr, Token};

use crate::parse::{classify, parse_field_attrs, Shape};

/// Generates the `Bindable` impl for a struct.
pub fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "#[derive(Bind)] does not support generic types",
        ));
    }

    let empty: Punctuated<Field, Token![,]> = Punctuated::new();
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unit => &empty,
            Fields::Unnamed(_) => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "#[derive(Bind)] requires a struct with named fields or a unit struct",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                input.ident.span(),
                "#[derive(Bind)] can only be used on structs",
            ))
        }
    };

    let mut bindings = Vec::new();
    let mut body_field: Option<&Ident> = None;

    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.is_empty() {
            continue;
        }

        if attrs.json {
            if !attrs.sources.is_empty() {
                return Err(syn::Error::new(
                    ident.span(),
                    "a #[bind(json)] field cannot also bind a header, query or path value",
                ));
            }
            if body_field.is_some() {
                return Err(syn::Error::new(
                    ident.span(),
                    "only one field may be marked #[bind(json)]",
                ));
            }
            body_field = Some(ident);
            continue;
        }

        let Some(source) = attrs.selected() else {
            continue;
        };

        let field_name = LitStr::new(&ident.to_string(), ident.span());
        let key = LitStr::new(&source.key, Span::call_site());
        let options = LitStr::new(&source.options, Span::call_site());
        let source_variant = format_ident!("{}", source.kind.variant());
        let (shape, assign) = shape_tokens(ident, &classify(&field.ty));

        bindings.push(quote! {
            ::daedalus_bind::FieldBinding {
                field: #field_name,
                source: ::daedalus_bind::BindSource::#source_variant,
                key: #key,
                options: #options,
                shape: #shape,
                assign: #assign,
            }
        });
    }

    let overlay = body_field.map(|ident| {
        let field_name = LitStr::new(&ident.to_string(), ident.span());
        quote! {
            fn overlay_body(&mut self, body: &[u8]) -> ::core::result::Result<(), ::daedalus_bind::BindError> {
                ::daedalus_bind::json::decode_into(&mut self.#ident, #field_name, body)
            }
        }
    });

    let name = &input.ident;
    Ok(quote! {
        impl ::daedalus_bind::Bindable for #name {
            const BINDINGS: &'static [::daedalus_bind::FieldBinding<Self>] = &[
                #(#bindings),*
            ];

            #overlay
        }
    })
}

fn shape_tokens(ident: &Ident, shape: &Shape) -> (TokenStream, TokenStream) {
    let (variant, convert) = match shape {
        Shape::Bool => (quote!(Bool), quote!(into_bool)),
        Shape::Int => (quote!(Int), quote!(into_int)),
        Shape::Str => (quote!(Str), quote!(into_string)),
        Shape::IntList => (quote!(IntList), quote!(into_int_list)),
        Shape::StrList => (quote!(StrList), quote!(into_string_list)),
        Shape::Unsupported(type_name) => {
            let type_name = LitStr::new(type_name, Span::call_site());
            return (
                quote!(::daedalus_bind::ValueShape::Unsupported(#type_name)),
                quote!(::daedalus_bind::unsupported),
            );
        }
    };

    (
        quote!(::daedalus_bind::ValueShape::#variant),
        quote! {
            |target, value| {
                target.#ident = value.#convert()?;
                ::core::result::Result::Ok(())
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_str(input: DeriveInput) -> String {
        expand(&input).unwrap().to_string()
    }

    #[test]
    fn test_expands_query_field() {
        let out = expand_str(parse_quote! {
            struct GetPokemon {
                #[bind(query = "name,required=true")]
                name: String,
            }
        });
        assert!(out.contains("impl :: daedalus_bind :: Bindable for GetPokemon"));
        assert!(out.contains("\"required=true\""));
        assert!(out.contains("BindSource :: Query"));
        assert!(out.contains("into_string"));
    }

    #[test]
    fn test_unannotated_fields_are_skipped() {
        let out = expand_str(parse_quote! {
            struct Endpoint {
                #[bind(path = "id")]
                id: String,
                token: String,
            }
        });
        assert!(out.contains("\"id\""));
        assert!(!out.contains("\"token\""));
    }

    #[test]
    fn test_unsupported_type_uses_placeholder_setter() {
        let out = expand_str(parse_quote! {
            struct Endpoint {
                #[bind(query = "ratio")]
                ratio: f64,
            }
        });
        assert!(out.contains("Unsupported (\"f64\")"));
        assert!(out.contains(":: daedalus_bind :: unsupported"));
    }

    #[test]
    fn test_json_field_overrides_overlay() {
        let out = expand_str(parse_quote! {
            struct PutGame {
                #[bind(path = "id")]
                id: String,
                #[bind(json)]
                game: Game,
            }
        });
        assert!(out.contains("fn overlay_body"));
        assert!(out.contains("decode_into (& mut self . game , \"game\" , body)"));
    }

    #[test]
    fn test_rejects_two_json_fields() {
        let input: DeriveInput = parse_quote! {
            struct Endpoint {
                #[bind(json)]
                a: A,
                #[bind(json)]
                b: B,
            }
        };
        let err = expand(&input).unwrap_err();
        assert!(err.to_string().contains("only one field"));
    }

    #[test]
    fn test_rejects_json_with_source() {
        let input: DeriveInput = parse_quote! {
            struct Endpoint {
                #[bind(json, query = "q")]
                a: A,
            }
        };
        assert!(expand(&input).is_err());
    }

    #[test]
    fn test_rejects_generics() {
        let input: DeriveInput = parse_quote! {
            struct Endpoint<T> {
                #[bind(query = "q")]
                a: T,
            }
        };
        assert!(expand(&input).unwrap_err().to_string().contains("generic"));
    }

    #[test]
    fn test_unit_struct_has_empty_table() {
        let out = expand_str(parse_quote! { struct Ping; });
        assert!(out.contains("BINDINGS"));
        assert!(!out.contains("FieldBinding {"));
        assert!(!out.contains("overlay_body"));
    }

    #[test]
    fn test_rejects_tuple_structs_and_enums() {
        let tuple: DeriveInput = parse_quote! { struct Endpoint(String); };
        assert!(expand(&tuple).is_err());

        let en: DeriveInput = parse_quote! { enum Endpoint { A } };
        assert!(expand(&en).is_err());
    }
}
