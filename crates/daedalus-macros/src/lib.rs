//! Procedural macros for Daedalus endpoints.
//!
//! `#[derive(Bind)]` turns field annotations into a static descriptor table
//! implementing `daedalus_bind::Bindable`. Binding then happens at request
//! time by walking that table; no reflection is involved.
//!
//! # Attributes
//!
//! | Attribute                         | Reads from                    |
//! |-----------------------------------|-------------------------------|
//! | `#[bind(header = "key,opts")]`    | request header `key`          |
//! | `#[bind(query = "key,opts")]`     | query parameter `key`         |
//! | `#[bind(path = "key,opts")]`      | path parameter `{key}`        |
//! | `#[bind(json)]`                   | the whole JSON request body   |
//!
//! Options follow the key, comma separated: `default=<value>` and
//! `required=<bool>`. When a field names several sources, the path value
//! wins over the query value, which wins over the header value.
//!
//! # Example
//!
//! ```rust,ignore
//! use daedalus::prelude::*;
//!
//! #[derive(Default, Bind)]
//! struct GetPokemon {
//!     #[bind(query = "name,required=true")]
//!     name: String,
//!     #[bind(query = "type,default=plant")]
//!     kind: String,
//!     #[bind(header = "x-limit,default=10")]
//!     limit: u32,
//! }
//! ```
//!
//! The generated code refers to `::daedalus_bind`, so the deriving crate
//! depends on `daedalus-bind` directly.

mod bind;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `daedalus_bind::Bindable` for a struct with named fields.
///
/// Only annotated fields are bound; everything else is left to `Default`
/// and to the endpoint's Enrich stage. Field types are classified as
/// `bool`, integer primitives, `String`, `Vec<integer>` and `Vec<String>`.
/// Any other type compiles, but binding a non-empty value into it fails
/// with a server fault.
///
/// At most one field may carry `#[bind(json)]`. Its type must implement
/// `serde::Deserialize` and `Default`; an empty body leaves it untouched.
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    bind::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
