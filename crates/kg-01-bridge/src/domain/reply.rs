//! Decoded success payloads.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{ApiError, ApiResult};

/// Fallback text when the server rejects a call without saying why.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A payload whose `success` flag was true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Operation-specific fields (`keys`, `expire_date`, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Reply {
    /// Classify a raw payload.
    ///
    /// `success: false` (or missing) becomes `ApiError::Application` carrying
    /// the server message; a payload that is not an object is `Decode`.
    pub fn from_payload(payload: Value) -> ApiResult<Self> {
        if !payload.is_object() {
            return Err(ApiError::Decode(format!(
                "expected an object, got {}",
                kind_of(&payload)
            )));
        }

        let reply: Reply =
            serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;

        if !reply.success {
            let message = reply
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            return Err(ApiError::Application { message });
        }

        Ok(reply)
    }

    /// Raw field access.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    /// String field, if present and a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(Value::as_str)
    }

    /// Decode an optional field into `T`.
    pub fn decode_field<T: DeserializeOwned>(&self, name: &str) -> ApiResult<Option<T>> {
        self.field(name)
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| ApiError::Decode(format!("field '{name}': {e}")))
            })
            .transpose()
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_keeps_extra_fields() {
        let reply = Reply::from_payload(json!({
            "success": true,
            "expire_date": "2026-01-01"
        }))
        .unwrap();
        assert_eq!(reply.str_field("expire_date"), Some("2026-01-01"));
        assert!(reply.message.is_none());
    }

    #[test]
    fn test_rejection_carries_message() {
        let err = Reply::from_payload(json!({"success": false, "message": "Invalid secret"}))
            .unwrap_err();
        assert_eq!(err, ApiError::application("Invalid secret"));
    }

    #[test]
    fn test_rejection_without_message() {
        let err = Reply::from_payload(json!({"success": false})).unwrap_err();
        assert_eq!(err, ApiError::application(UNKNOWN_ERROR));

        // Missing flag reads as a rejection too
        let err = Reply::from_payload(json!({"keys": []})).unwrap_err();
        assert_eq!(err, ApiError::application(UNKNOWN_ERROR));
    }

    #[test]
    fn test_non_object_is_decode_error() {
        assert!(matches!(
            Reply::from_payload(json!([1, 2])),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            Reply::from_payload(json!({"success": "yes"})),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_field() {
        let reply = Reply::from_payload(json!({"success": true, "count": 3, "gone": null})).unwrap();
        assert_eq!(reply.decode_field::<u32>("count"), Ok(Some(3)));
        assert_eq!(reply.decode_field::<u32>("gone"), Ok(None));
        assert_eq!(reply.decode_field::<u32>("missing"), Ok(None));
        assert!(reply.decode_field::<String>("count").is_err());
    }
}
