//! Field descriptor tables.
//!
//! Every bindable endpoint type exposes a static slice of [`FieldBinding`]s,
//! normally generated by `#[derive(Bind)]`. The table is built at compile
//! time and shared by every request for that endpoint; nothing is inspected
//! at runtime beyond walking the slice.

use std::fmt;

use crate::coerce::{CoerceError, Value, ValueShape};
use crate::error::{BindError, BindSource};

/// Setter that writes a coerced value into one field.
pub type Assign<T> = fn(&mut T, Value) -> Result<(), CoerceError>;

/// How one field is bound.
pub struct FieldBinding<T> {
    /// Field name in the endpoint type.
    pub field: &'static str,
    /// Channel the value is read from.
    pub source: BindSource,
    /// Header name, query key or path parameter name.
    pub key: &'static str,
    /// Raw option chain, e.g. `default=plant,required=true`.
    pub options: &'static str,
    /// Target shape of the field.
    pub shape: ValueShape,
    /// Setter for the field.
    pub assign: Assign<T>,
}

impl<T> fmt::Debug for FieldBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("source", &self.source)
            .field("key", &self.key)
            .field("options", &self.options)
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

/// A type whose fields can be populated from a request.
///
/// Derive it with `#[derive(Bind)]`:
///
/// ```ignore
/// #[derive(Default, Bind)]
/// struct GetPokemon {
///     #[bind(query = "name,required=true")]
///     name: String,
///     #[bind(query = "type,default=plant")]
///     kind: String,
/// }
/// ```
pub trait Bindable: Sized + 'static {
    /// Descriptor table, in declaration order.
    const BINDINGS: &'static [FieldBinding<Self>];

    /// Decodes the request body into the instance's JSON body field.
    ///
    /// Types without a JSON body ignore the body.
    fn overlay_body(&mut self, body: &[u8]) -> Result<(), BindError> {
        let _ = body;
        Ok(())
    }
}

/// Setter used for fields whose type has no coercion. Never reached in
/// practice: coercion rejects [`ValueShape::Unsupported`] first.
pub fn unsupported<T>(_: &mut T, _: Value) -> Result<(), CoerceError> {
    Err(CoerceError::ShapeMismatch)
}
