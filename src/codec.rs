//! # Payload codec: boundary conversion between wire arguments and domain values.
//!
//! Inbound messages arrive as an ordered sequence of loosely-typed JSON values.
//! This module converts them in two directions of strictness:
//!
//! - [`to_structured`] wraps the raw sequence in a traversable
//!   [`serde_json::Value`] without validation. It always succeeds; the
//!   [`Structured::usable`] flag is reserved for future payload validation and
//!   is currently always `true`. Callers honor the flag (guard-and-drop) but
//!   must not rely on a `false` value being produced today.
//! - [`decode_typed`] takes the **first** element of the sequence and reparses
//!   it into a concrete record type. Failures are per-message and recoverable:
//!   the caller drops the message and moves on.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::CodecError;

/// Result of wrapping raw wire arguments into a traversable value.
#[derive(Clone, Debug)]
pub struct Structured {
    /// The raw argument sequence as a JSON array.
    pub value: Value,
    /// Reserved validation status. Currently always `true`.
    pub usable: bool,
}

/// Wraps the raw argument sequence in a generic traversable JSON value.
///
/// Never fails. The returned [`Structured::usable`] flag is reserved for
/// future validation; dispatch drops the message if it is ever `false`.
pub fn to_structured(raw: &[Value]) -> Structured {
    Structured {
        value: Value::Array(raw.to_vec()),
        usable: true,
    }
}

/// Decodes the first wire argument into a concrete record type.
///
/// # Errors
/// - [`CodecError::Empty`] when `raw` has no elements.
/// - [`CodecError::Shape`] when the first element does not match `T`'s schema.
///
/// Both are recoverable, per-message failures: the caller must drop the
/// message, never treat this as fatal.
pub fn decode_typed<T: DeserializeOwned>(raw: &[Value]) -> Result<T, CodecError> {
    let first = raw.first().ok_or(CodecError::Empty)?;
    Ok(serde_json::from_value(first.clone())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Point {
        lat: f64,
        lng: f64,
    }

    #[test]
    fn test_structured_wraps_args_in_array() {
        let raw = vec![json!({"a": 1}), json!("b")];
        let s = to_structured(&raw);
        assert!(s.usable);
        assert_eq!(s.value, json!([{"a": 1}, "b"]));
    }

    #[test]
    fn test_structured_empty_args_still_usable() {
        let s = to_structured(&[]);
        assert!(s.usable);
        assert_eq!(s.value, json!([]));
    }

    #[test]
    fn test_decode_typed_first_element() {
        let raw = vec![json!({"lat": 1.0, "lng": 2.0}), json!("ignored")];
        let p: Point = decode_typed(&raw).unwrap();
        assert_eq!(p, Point { lat: 1.0, lng: 2.0 });
    }

    #[test]
    fn test_decode_typed_empty_is_error() {
        let err = decode_typed::<Point>(&[]).unwrap_err();
        assert!(matches!(err, CodecError::Empty));
    }

    #[test]
    fn test_decode_typed_shape_mismatch_is_error() {
        let raw = vec![json!({"lat": "not a number"})];
        let err = decode_typed::<Point>(&raw).unwrap_err();
        assert!(matches!(err, CodecError::Shape(_)));
    }
}
