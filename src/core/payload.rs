//! Log message payloads
//!
//! A payload is the serialized form of whatever the caller logged plus the
//! plain string form used when the serialized form carries no information
//! (an error type serializes to `{}`, for instance).

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Plain string form of an object that carries no display text
const OBJECT_LABEL: &str = "Object";

#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    value: Value,
    display: Option<String>,
}

impl Payload {
    /// Payload from any serializable value
    ///
    /// The value's type name is kept as its plain string form. Values that
    /// fail to serialize are treated as an empty structure.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        let value = serde_json::to_value(value).unwrap_or_else(|_| Value::Object(Default::default()));
        Self {
            value,
            display: Some(short_type_name::<T>().to_string()),
        }
    }

    /// Payload from a serializable value with an explicit string form
    pub fn json_with_display<T: Serialize + ?Sized>(value: &T, display: impl Into<String>) -> Self {
        Self {
            display: Some(display.into()),
            ..Self::json(value)
        }
    }

    /// Payload for an error: no structure, the `Display` text is the message
    pub fn error(err: &(dyn std::error::Error + '_)) -> Self {
        Self {
            value: Value::Object(Default::default()),
            display: Some(err.to_string()),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            value: Value::String(text.into()),
            display: None,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Whether the serialized form is the empty object
    pub fn is_empty_structure(&self) -> bool {
        matches!(&self.value, Value::Object(map) if map.is_empty())
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.value, Value::Object(_) | Value::Array(_))
    }

    /// Plain string form: the explicit display text, else the value itself.
    /// Objects without display text never render as `{...}`.
    pub fn primitive_string(&self) -> String {
        match (&self.display, &self.value) {
            (Some(display), _) => display.clone(),
            (None, Value::String(s)) => s.clone(),
            (None, Value::Object(_)) => OBJECT_LABEL.to_string(),
            (None, other) => other.to_string(),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::String(s) => f.write_str(s),
            Value::Object(_) | Value::Array(_) if !self.is_empty_structure() => {
                write!(f, "{}", self.value)
            }
            Value::Object(_) | Value::Array(_) => f.write_str(&self.primitive_string()),
            other => write!(f, "{}", other),
        }
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::text(text)
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::text(text)
    }
}

impl From<&String> for Payload {
    fn from(text: &String) -> Self {
        Payload::text(text.as_str())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self {
            value,
            display: None,
        }
    }
}

impl From<fmt::Arguments<'_>> for Payload {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Payload::text(args.to_string())
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Self {
                        value: Value::from(value),
                        display: None,
                    }
                }
            }
        )*
    };
}

impl_from_primitive!(bool, i32, i64, u32, u64, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Empty {}

    #[derive(Serialize)]
    struct Order {
        id: u32,
        total: f64,
    }

    #[test]
    fn test_empty_struct_uses_type_name() {
        let payload = Payload::json(&Empty {});
        assert!(payload.is_empty_structure());
        assert_eq!(payload.primitive_string(), "Empty");
        assert_eq!(payload.to_string(), "Empty");
    }

    #[test]
    fn test_error_payload() {
        let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "broker down");
        let payload = Payload::error(&err);
        assert!(payload.is_empty_structure());
        assert_eq!(payload.primitive_string(), "broker down");
    }

    #[test]
    fn test_structured_payload() {
        let payload = Payload::json(&Order { id: 7, total: 12.5 });
        assert!(payload.is_structured());
        assert!(!payload.is_empty_structure());
        assert_eq!(payload.value(), &json!({"id": 7, "total": 12.5}));
    }

    #[test]
    fn test_primitive_payloads() {
        assert_eq!(Payload::from("ready").to_string(), "ready");
        assert_eq!(Payload::from(42i64).to_string(), "42");
        assert_eq!(Payload::from(true).to_string(), "true");
        assert!(!Payload::from(1.5f64).is_structured());
    }

    #[test]
    fn test_bare_empty_object_has_plain_form() {
        let payload = Payload::from(json!({}));
        assert!(payload.is_empty_structure());
        assert_eq!(payload.primitive_string(), "Object");
        assert_eq!(payload.to_string(), "Object");
    }

    #[test]
    fn test_empty_array_is_not_empty_structure() {
        let payload = Payload::from(json!([]));
        assert!(!payload.is_empty_structure());
        assert!(payload.is_structured());
    }
}
