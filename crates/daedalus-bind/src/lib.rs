//! # Daedalus Bind
//!
//! Declarative request binding and response strategy.
//!
//! An endpoint type annotates its fields with the request channel that
//! supplies them; `#[derive(Bind)]` (from `daedalus-macros`) turns those
//! annotations into a static [`FieldBinding`] table. At request time
//! [`bind`] walks the table:
//!
//! 1. read the raw value from the header, query string or path parameters,
//! 2. apply the option chain (`default=…`, `required=…`) left to right,
//! 3. skip empty optional values,
//! 4. coerce into the field's [`ValueShape`] and assign.
//!
//! A field marked `#[bind(json)]` then receives the decoded request body.
//!
//! | Failure | Status |
//! |---------|--------|
//! | missing required value | 400 |
//! | unparseable value, out-of-range integer | 400 |
//! | malformed JSON body | 400 |
//! | unknown or malformed option | 500 |
//! | unsupported field type | 500 |
//!
//! The [`response`] module turns Execute results into responses through the
//! [`PlainText`] or [`Json`] serializer.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod binder;
pub mod coerce;
mod context;
mod descriptor;
mod error;
pub mod json;
pub mod options;
pub mod response;

pub use binder::bind;
pub use coerce::{CoerceError, Value, ValueShape};
pub use context::{BindContext, BindContextBuilder};
pub use descriptor::{unsupported, Assign, Bindable, FieldBinding};
pub use error::{BindError, BindErrorKind, BindSource};
pub use response::{respond, Encode, Encoded, Format, Json, PlainText, Reply};
