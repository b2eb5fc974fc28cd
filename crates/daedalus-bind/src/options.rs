//! Binding option chains.
//!
//! The text after the key in a binding annotation is a comma-separated list
//! of `name=argument` options. The whole chain is validated before any option
//! is applied, then options run left to right against the raw value:
//!
//! - `default=<value>` substitutes `<value>` when the current value is empty,
//! - `required=<bool>` fails when it is `true` and the current value is empty.
//!
//! ```
//! use daedalus_bind::options::{resolve, Resolved};
//!
//! assert_eq!(resolve("", "default=plant").unwrap(), Resolved::Value("plant"));
//! assert_eq!(resolve("fire", "default=plant").unwrap(), Resolved::Value("fire"));
//! assert_eq!(resolve("", "").unwrap(), Resolved::Empty);
//! ```

/// One parsed option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOption<'a> {
    /// Substitute the argument when the value is empty.
    Default(&'a str),
    /// Fail when the value is empty and the flag is set.
    Required(bool),
}

/// Result of applying a chain to a raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<'a> {
    /// A non-empty value to coerce.
    Value(&'a str),
    /// No value; the field keeps its zero value.
    Empty,
}

/// Why a chain could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionError<'a> {
    /// The annotation is defective; carries the offending option text.
    Malformed(&'a str),
    /// A `required` option found an empty value.
    MissingRequired,
}

/// Parses an option chain. An empty chain has no options.
pub fn parse(chain: &str) -> Result<Vec<BindOption<'_>>, OptionError<'_>> {
    if chain.is_empty() {
        return Ok(Vec::new());
    }
    chain.split(',').map(parse_one).collect()
}

fn parse_one(option: &str) -> Result<BindOption<'_>, OptionError<'_>> {
    let (name, arg) = option.split_once('=').ok_or(OptionError::Malformed(option))?;
    match name.trim() {
        "default" => Ok(BindOption::Default(arg)),
        "required" => parse_bool(arg)
            .map(BindOption::Required)
            .ok_or(OptionError::Malformed(option)),
        _ => Err(OptionError::Malformed(option)),
    }
}

/// Applies `chain` to `raw` (already trimmed by the caller).
pub fn resolve<'a>(raw: &'a str, chain: &'a str) -> Result<Resolved<'a>, OptionError<'a>> {
    let mut current = raw;
    for option in parse(chain)? {
        match option {
            BindOption::Default(fallback) if current.is_empty() => {
                current = fallback;
            }
            BindOption::Required(true) if current.is_empty() => {
                return Err(OptionError::MissingRequired);
            }
            _ => {}
        }
    }

    if current.is_empty() {
        Ok(Resolved::Empty)
    } else {
        Ok(Resolved::Value(current))
    }
}

/// Case-insensitive boolean tokens: `1`/`0`, `t`/`f`, `true`/`false`.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}
