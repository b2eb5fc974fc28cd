//! The request binder.

use crate::coerce::{coerce, CoerceError, ValueShape};
use crate::context::BindContext;
use crate::descriptor::{Bindable, FieldBinding};
use crate::error::BindError;
use crate::options::{self, OptionError, Resolved};

/// Populates `target` from `ctx`.
///
/// Every field's option chain is checked first, so a malformed option is
/// reported even when the request would also fail on another field. Fields
/// are then bound in declaration order. For each field the raw value is
/// read from its channel and trimmed, the option chain is applied, and a
/// non-empty result is coerced and assigned. Empty optional values leave the
/// field untouched. After all fields bind, the JSON body (if the type
/// declares one) is decoded. The first failure stops binding.
pub fn bind<T: Bindable>(ctx: &BindContext, target: &mut T) -> Result<(), BindError> {
    validate_options::<T>()?;
    for binding in T::BINDINGS {
        bind_field(ctx, target, binding)?;
    }
    target.overlay_body(ctx.body())
}

fn validate_options<T: Bindable>() -> Result<(), BindError> {
    for binding in T::BINDINGS {
        if let Err(OptionError::Malformed(option)) = options::parse(binding.options) {
            return Err(BindError::malformed_option(binding.source, binding.field, option));
        }
    }
    Ok(())
}

fn bind_field<T>(
    ctx: &BindContext,
    target: &mut T,
    binding: &FieldBinding<T>,
) -> Result<(), BindError> {
    let raw = ctx.lookup(binding.source, binding.key).unwrap_or_default();
    let raw = raw.trim();

    let resolved = match options::resolve(raw, binding.options) {
        Ok(Resolved::Empty) => return Ok(()),
        Ok(Resolved::Value(value)) => value,
        Err(OptionError::MissingRequired) => {
            return Err(BindError::missing(binding.source, binding.field, binding.key));
        }
        Err(OptionError::Malformed(option)) => {
            return Err(BindError::malformed_option(binding.source, binding.field, option));
        }
    };

    let value = coerce(resolved, binding.shape).map_err(|err| classify(binding, &err))?;
    (binding.assign)(target, value).map_err(|err| classify(binding, &err))
}

fn classify<T>(binding: &FieldBinding<T>, err: &CoerceError) -> BindError {
    match err {
        CoerceError::Unsupported(ty) => BindError::unsupported_type(binding.source, binding.field, ty),
        CoerceError::ShapeMismatch => {
            let ty = match binding.shape {
                ValueShape::Unsupported(ty) => ty,
                _ => "unknown",
            };
            BindError::unsupported_type(binding.source, binding.field, ty)
        }
        caller => BindError::invalid_value(binding.source, binding.field, binding.key, caller),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::Value;
    use crate::error::{BindErrorKind, BindSource};
    use daedalus_core::FaultKind;

    #[derive(Debug, Default)]
    struct Lookup {
        name: String,
        kind: String,
        limit: u8,
        ids: Vec<i32>,
        verbose: bool,
    }

    impl Bindable for Lookup {
        const BINDINGS: &'static [FieldBinding<Self>] = &[
            FieldBinding {
                field: "name",
                source: BindSource::Query,
                key: "name",
                options: "required=true",
                shape: ValueShape::Str,
                assign: |t, v| {
                    t.name = v.into_string()?;
                    Ok(())
                },
            },
            FieldBinding {
                field: "kind",
                source: BindSource::Query,
                key: "type",
                options: "default=plant",
                shape: ValueShape::Str,
                assign: |t, v| {
                    t.kind = v.into_string()?;
                    Ok(())
                },
            },
            FieldBinding {
                field: "limit",
                source: BindSource::Header,
                key: "x-limit",
                options: "",
                shape: ValueShape::Int,
                assign: |t, v| {
                    t.limit = v.into_int()?;
                    Ok(())
                },
            },
            FieldBinding {
                field: "ids",
                source: BindSource::Query,
                key: "ids",
                options: "",
                shape: ValueShape::IntList,
                assign: |t, v| {
                    t.ids = v.into_int_list()?;
                    Ok(())
                },
            },
            FieldBinding {
                field: "verbose",
                source: BindSource::Query,
                key: "verbose",
                options: "default=false",
                shape: ValueShape::Bool,
                assign: |t, v| {
                    t.verbose = v.into_bool()?;
                    Ok(())
                },
            },
        ];
    }

    struct Defective {
        ratio: u32,
    }

    impl Bindable for Defective {
        const BINDINGS: &'static [FieldBinding<Self>] = &[FieldBinding {
            field: "ratio",
            source: BindSource::Query,
            key: "ratio",
            options: "required=sometimes",
            shape: ValueShape::Int,
            assign: |t, v| {
                t.ratio = v.into_int()?;
                Ok(())
            },
        }];
    }

    #[derive(Default)]
    struct LateDefect {
        a: String,
        b: String,
    }

    impl Bindable for LateDefect {
        const BINDINGS: &'static [FieldBinding<Self>] = &[
            FieldBinding {
                field: "a",
                source: BindSource::Query,
                key: "a",
                options: "required=true",
                shape: ValueShape::Str,
                assign: |t, v| {
                    t.a = v.into_string()?;
                    Ok(())
                },
            },
            FieldBinding {
                field: "b",
                source: BindSource::Query,
                key: "b",
                options: "colour=red",
                shape: ValueShape::Str,
                assign: |t, v| {
                    t.b = v.into_string()?;
                    Ok(())
                },
            },
        ];
    }

    #[derive(Default)]
    struct Greeting {
        name: String,
    }

    impl Bindable for Greeting {
        const BINDINGS: &'static [FieldBinding<Self>] = &[FieldBinding {
            field: "name",
            source: BindSource::Header,
            key: "x-name",
            options: "required=true",
            shape: ValueShape::Str,
            assign: |t, v| {
                t.name = v.into_string()?;
                Ok(())
            },
        }];
    }

    struct Unsupported;

    impl Bindable for Unsupported {
        const BINDINGS: &'static [FieldBinding<Self>] = &[FieldBinding {
            field: "ratio",
            source: BindSource::Query,
            key: "ratio",
            options: "",
            shape: ValueShape::Unsupported("f64"),
            assign: crate::descriptor::unsupported,
        }];
    }

    fn bind_query(query: &str) -> Result<Lookup, BindError> {
        let ctx = BindContext::builder().uri(&format!("/pokemon?{query}")).build();
        let mut target = Lookup::default();
        bind(&ctx, &mut target).map(|()| target)
    }

    #[test]
    fn test_binds_all_channels() {
        let ctx = BindContext::builder()
            .uri("/pokemon?name=%20bulbasaur%20&ids=1,%202,3&verbose=TRUE")
            .header("x-limit", "12")
            .build();
        let mut target = Lookup::default();
        bind(&ctx, &mut target).unwrap();

        assert_eq!(target.name, "bulbasaur");
        assert_eq!(target.kind, "plant");
        assert_eq!(target.limit, 12);
        assert_eq!(target.ids, vec![1, 2, 3]);
        assert!(target.verbose);
    }

    #[test]
    fn test_absent_optional_keeps_zero_value() {
        let target = bind_query("name=pikachu").unwrap();
        assert_eq!(target.limit, 0);
        assert!(target.ids.is_empty());
        assert!(!target.verbose);
    }

    #[test]
    fn test_missing_required_is_400_naming_key() {
        let err = bind_query("type=fire").unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::MissingRequired);
        assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "missing required query parameter: name");
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let err = bind_query("name=%20%20").unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::MissingRequired);
    }

    #[test]
    fn test_bad_list_element_fails_whole_field() {
        let err = bind_query("name=a&ids=1,x,3").unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::InvalidValue);
        assert_eq!(err.field(), "ids");
        assert!(err.message().contains("'x'"));
    }

    #[test]
    fn test_out_of_range_is_caller_fault() {
        let ctx = BindContext::builder()
            .uri("/pokemon?name=a")
            .header("x-limit", "300")
            .build();
        let err = bind(&ctx, &mut Lookup::default()).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::InvalidValue);
        assert_eq!(err.message(), "invalid header parameter 'x-limit': value out of range");
    }

    #[test]
    fn test_malformed_option_is_server_fault() {
        let ctx = BindContext::builder().uri("/?ratio=2").build();
        let err = bind(&ctx, &mut Defective { ratio: 0 }).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::MalformedOption);
        assert_eq!(err.kind().fault(), FaultKind::Server);
    }

    #[test]
    fn test_malformed_option_on_later_field_wins_over_missing_value() {
        let ctx = BindContext::builder().uri("/").build();
        let mut target = LateDefect::default();
        let err = bind(&ctx, &mut target).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::MalformedOption);
        assert_eq!(err.field(), "b");
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(target.a.is_empty());
    }

    #[test]
    fn test_non_ascii_header_binds_as_string() {
        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::HeaderName::from_static("x-name"),
            http::HeaderValue::from_bytes(" café ".as_bytes()).unwrap(),
        );
        let ctx = BindContext::new(
            http::Method::GET,
            http::Uri::from_static("/"),
            headers,
            bytes::Bytes::new(),
            daedalus_router::Params::new(),
        );
        let mut target = Greeting::default();
        bind(&ctx, &mut target).unwrap();
        assert_eq!(target.name, "café");
    }

    #[test]
    fn test_unsupported_type_only_fails_when_value_present() {
        let empty = BindContext::builder().uri("/").build();
        assert!(bind(&empty, &mut Unsupported).is_ok());

        let present = BindContext::builder().uri("/?ratio=0.5").build();
        let err = bind(&present, &mut Unsupported).unwrap_err();
        assert_eq!(err.kind(), BindErrorKind::UnsupportedType);
        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_first_failure_stops_binding() {
        // `name` is missing, so the malformed `ids` is never reached.
        let err = bind_query("ids=nope").unwrap_err();
        assert_eq!(err.field(), "name");
    }

    #[test]
    fn test_assign_value_shapes() {
        let mut target = Lookup::default();
        (Lookup::BINDINGS[1].assign)(&mut target, Value::Str("water".into())).unwrap();
        assert_eq!(target.kind, "water");
    }
}
