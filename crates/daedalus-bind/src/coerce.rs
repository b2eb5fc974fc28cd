//! Value coercion from raw request strings.
//!
//! [`coerce`] turns a resolved, non-empty raw string into a [`Value`] of the
//! field's [`ValueShape`]. Generated setters then narrow the value into the
//! concrete field type through the `into_*` accessors.

use std::fmt;

use thiserror::Error;

use crate::options::parse_bool;

/// Target shape of a bound field, decided from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// `bool`
    Bool,
    /// Any primitive integer type.
    Int,
    /// `String`
    Str,
    /// `Vec` of a primitive integer type.
    IntList,
    /// `Vec<String>`
    StrList,
    /// Anything else; carries the declared type for diagnostics.
    Unsupported(&'static str),
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "boolean"),
            Self::Int => write!(f, "integer"),
            Self::Str => write!(f, "string"),
            Self::IntList => write!(f, "list of integers"),
            Self::StrList => write!(f, "list of strings"),
            Self::Unsupported(ty) => write!(f, "unsupported type `{ty}`"),
        }
    }
}

/// A coerced value, prior to narrowing into the field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// Trimmed string.
    Str(String),
    /// Integer list.
    IntList(Vec<i64>),
    /// String list with each element trimmed.
    StrList(Vec<String>),
}

/// Why a raw string could not become a field value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// The string is not a valid token for the shape.
    #[error("expected {expected}")]
    Invalid {
        /// Human name of the expected shape.
        expected: &'static str,
    },
    /// One list element is not a valid integer.
    #[error("expected list of integers, element '{element}' is not an integer")]
    InvalidElement {
        /// The offending element, trimmed.
        element: String,
    },
    /// The integer does not fit the field's type.
    #[error("value out of range")]
    OutOfRange,
    /// The field's type has no coercion.
    #[error("unsupported type `{0}`")]
    Unsupported(&'static str),
    /// The setter received a value of another shape.
    #[error("value shape does not match the field")]
    ShapeMismatch,
}

impl CoerceError {
    /// Returns `true` for failures caused by the request rather than the
    /// endpoint declaration.
    #[must_use]
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            Self::Invalid { .. } | Self::InvalidElement { .. } | Self::OutOfRange
        )
    }
}

/// Coerces a raw string into `shape`.
///
/// ```
/// use daedalus_bind::coerce::{coerce, Value, ValueShape};
///
/// assert_eq!(coerce("1, 2,3", ValueShape::IntList), Ok(Value::IntList(vec![1, 2, 3])));
/// assert!(coerce("1,x,3", ValueShape::IntList).is_err());
/// assert_eq!(coerce("TRUE", ValueShape::Bool), Ok(Value::Bool(true)));
/// ```
pub fn coerce(raw: &str, shape: ValueShape) -> Result<Value, CoerceError> {
    let raw = raw.trim();
    match shape {
        ValueShape::Bool => parse_bool(raw)
            .map(Value::Bool)
            .ok_or(CoerceError::Invalid { expected: "boolean" }),
        ValueShape::Int => parse_int(raw)
            .map(Value::Int)
            .ok_or(CoerceError::Invalid { expected: "integer" }),
        ValueShape::Str => Ok(Value::Str(raw.to_string())),
        ValueShape::IntList => raw
            .split(',')
            .map(|element| {
                let element = element.trim();
                parse_int(element).ok_or_else(|| CoerceError::InvalidElement {
                    element: element.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::IntList),
        ValueShape::StrList => Ok(Value::StrList(
            raw.split(',').map(|e| e.trim().to_string()).collect(),
        )),
        ValueShape::Unsupported(ty) => Err(CoerceError::Unsupported(ty)),
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

impl Value {
    /// Extracts a boolean.
    pub fn into_bool(self) -> Result<bool, CoerceError> {
        match self {
            Self::Bool(b) => Ok(b),
            _ => Err(CoerceError::ShapeMismatch),
        }
    }

    /// Extracts an integer narrowed to `N`.
    pub fn into_int<N: TryFrom<i64>>(self) -> Result<N, CoerceError> {
        match self {
            Self::Int(n) => N::try_from(n).map_err(|_| CoerceError::OutOfRange),
            _ => Err(CoerceError::ShapeMismatch),
        }
    }

    /// Extracts a string.
    pub fn into_string(self) -> Result<String, CoerceError> {
        match self {
            Self::Str(s) => Ok(s),
            _ => Err(CoerceError::ShapeMismatch),
        }
    }

    /// Extracts an integer list, narrowing every element to `N`.
    pub fn into_int_list<N: TryFrom<i64>>(self) -> Result<Vec<N>, CoerceError> {
        match self {
            Self::IntList(items) => items
                .into_iter()
                .map(|n| N::try_from(n).map_err(|_| CoerceError::OutOfRange))
                .collect(),
            _ => Err(CoerceError::ShapeMismatch),
        }
    }

    /// Extracts a string list.
    pub fn into_string_list(self) -> Result<Vec<String>, CoerceError> {
        match self {
            Self::StrList(items) => Ok(items),
            _ => Err(CoerceError::ShapeMismatch),
        }
    }
}
