//! Error types for patch validation.

use thiserror::Error;

/// Result type alias for fallible patch construction.
pub type PatchResult<T> = Result<T, PatchError>;

/// Errors produced when untyped JSON is promoted into a typed patch.
///
/// The tree walker and the combinators never fail: mismatched shapes
/// produce the documented degenerate outputs instead. Validation exists
/// only at the `Value` to [`Patch`](crate::Patch) conversion boundary.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The root of a patch must be a JSON object.
    #[error("patch root must be an object, found {found}")]
    InvalidPatchShape {
        /// JSON type name of the rejected value.
        found: &'static str,
    },
}

impl PatchError {
    /// Create an invalid patch shape error.
    #[inline]
    pub fn invalid_shape(found: &'static str) -> Self {
        PatchError::InvalidPatchShape { found }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_shape_message() {
        let err = PatchError::invalid_shape("array");
        assert_eq!(err.to_string(), "patch root must be an object, found array");
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type_name(&json!(null)), "null");
        assert_eq!(value_type_name(&json!(true)), "boolean");
        assert_eq!(value_type_name(&json!(1.5)), "number");
        assert_eq!(value_type_name(&json!("s")), "string");
        assert_eq!(value_type_name(&json!([])), "array");
        assert_eq!(value_type_name(&json!({})), "object");
    }
}
