//! Parsing of `#[bind(...)]` field attributes and field types.

use syn::{
    punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, GenericArgument, Lit,
    LitStr, Meta, PathArguments, Token, Type,
};

/// Request channel named in a binding attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Header,
    Query,
    Path,
}

impl SourceKind {
    /// Sources in the order they win when a field names several.
    pub const PRIORITY: [SourceKind; 3] = [SourceKind::Path, SourceKind::Query, SourceKind::Header];

    fn from_ident(ident: &str) -> Option<Self> {
        match ident {
            "header" => Some(Self::Header),
            "query" => Some(Self::Query),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    /// Variant name in `daedalus_bind::BindSource`.
    pub fn variant(self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Query => "Query",
            Self::Path => "Path",
        }
    }
}

/// One source annotation: `query = "name,default=plant"`.
#[derive(Debug, Clone)]
pub struct SourceAttr {
    pub kind: SourceKind,
    pub key: String,
    pub options: String,
}

/// Everything declared on one field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub sources: Vec<SourceAttr>,
    pub json: bool,
}

impl FieldAttrs {
    /// Picks the source that wins by [`SourceKind::PRIORITY`].
    pub fn selected(&self) -> Option<&SourceAttr> {
        SourceKind::PRIORITY
            .iter()
            .find_map(|kind| self.sources.iter().find(|s| s.kind == *kind))
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && !self.json
    }
}

/// Collects every `#[bind(...)]` attribute on a field.
pub fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("bind")) {
        let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in metas {
            match meta {
                Meta::Path(path) if path.is_ident("json") => parsed.json = true,
                Meta::NameValue(nv) => {
                    let ident = nv
                        .path
                        .get_ident()
                        .ok_or_else(|| syn::Error::new(nv.path.span(), "expected identifier"))?
                        .to_string();
                    let kind = SourceKind::from_ident(&ident).ok_or_else(|| {
                        syn::Error::new(
                            nv.path.span(),
                            format!("unknown binding source `{ident}`, expected header, query or path"),
                        )
                    })?;
                    let tag = match &nv.value {
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }) => s.clone(),
                        other => return Err(syn::Error::new(other.span(), "expected string literal")),
                    };
                    parsed.sources.push(split_tag(kind, &tag)?);
                }
                other => {
                    return Err(syn::Error::new(
                        other.span(),
                        "expected `header = \"..\"`, `query = \"..\"`, `path = \"..\"` or `json`",
                    ))
                }
            }
        }
    }

    Ok(parsed)
}

/// Splits `"key,opt=a,opt=b"` into key and raw option chain. Options are
/// kept verbatim; they are validated when a request is bound.
fn split_tag(kind: SourceKind, tag: &LitStr) -> syn::Result<SourceAttr> {
    let value = tag.value();
    let (key, options) = value.split_once(',').unwrap_or((value.as_str(), ""));
    let key = key.trim();
    if key.is_empty() {
        return Err(syn::Error::new(tag.span(), "binding key must not be empty"));
    }
    Ok(SourceAttr {
        kind,
        key: key.to_string(),
        options: options.to_string(),
    })
}

/// Shape of a field's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Bool,
    Int,
    Str,
    IntList,
    StrList,
    Unsupported(String),
}

const INTEGER_TYPES: &[&str] = &[
    "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64", "u128", "usize",
];

/// Classifies a field type by its last path segment.
pub fn classify(ty: &Type) -> Shape {
    let unsupported = || Shape::Unsupported(type_text(ty));

    let Type::Path(path) = ty else {
        return unsupported();
    };
    if path.qself.is_some() {
        return unsupported();
    }
    let Some(last) = path.path.segments.last() else {
        return unsupported();
    };

    let ident = last.ident.to_string();
    match (&last.arguments, ident.as_str()) {
        (PathArguments::None, "bool") => Shape::Bool,
        (PathArguments::None, "String") => Shape::Str,
        (PathArguments::None, name) if INTEGER_TYPES.contains(&name) => Shape::Int,
        (PathArguments::AngleBracketed(args), "Vec") if args.args.len() == 1 => {
            match args.args.first() {
                Some(GenericArgument::Type(inner)) => match classify(inner) {
                    Shape::Int => Shape::IntList,
                    Shape::Str => Shape::StrList,
                    _ => unsupported(),
                },
                _ => unsupported(),
            }
        }
        _ => unsupported(),
    }
}

fn type_text(ty: &Type) -> String {
    quote::quote!(#ty).to_string().replace(' ', "")
}
