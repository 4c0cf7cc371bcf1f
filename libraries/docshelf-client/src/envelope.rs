//! Response normalization for the two shapes the server speaks.
//!
//! Document routes reply with a uniform `{success, data, error}`
//! envelope; legacy routes (login, users, ping) reply with bare
//! payloads. Every response funnels through [`normalize`] so callers
//! only ever see the inner payload and a single error vocabulary.

use crate::error::{ClientError, Result};
use serde_json::{Map, Value};

/// Decode a response body. Anything that is not valid JSON, including
/// an empty body, decodes to `Value::Null`.
pub(crate) fn parse_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or(Value::Null)
}

/// Unwrap a decoded response body.
///
/// An object whose `success` key is a JSON boolean is an envelope: on
/// a 2xx status with `success == true` its `data` value comes back
/// (missing `data` becomes null), otherwise the best message the body
/// offers becomes the error. An object with a `success` key of any
/// other type is not an envelope. Non-envelope payloads pass through
/// untouched on 2xx and fail with the generic status message
/// otherwise.
pub(crate) fn normalize(status: u16, payload: Value) -> Result<Value> {
    let ok = (200..300).contains(&status);

    match payload {
        Value::Object(mut map) => match map.get("success") {
            Some(&Value::Bool(success)) => {
                if ok && success {
                    Ok(map.remove("data").unwrap_or(Value::Null))
                } else {
                    Err(envelope_error(&map, status))
                }
            }
            _ => {
                if ok {
                    Ok(Value::Object(map))
                } else {
                    Err(ClientError::RequestFailed(status))
                }
            }
        },
        payload => {
            if ok {
                Ok(payload)
            } else {
                Err(ClientError::RequestFailed(status))
            }
        }
    }
}

fn envelope_error(map: &Map<String, Value>, status: u16) -> ClientError {
    match error_message(map) {
        Some(message) => ClientError::Backend(message),
        None => ClientError::RequestFailed(status),
    }
}

/// Pull the most specific human-readable message out of a failed
/// envelope. Checked in order: `error.message`, `error` as a bare
/// string, `detail` as a string, the `msg` of the first entry of a
/// `detail` array (validation errors arrive as `[{loc, msg, type}]`),
/// then any other non-null `detail` stringified.
fn error_message(map: &Map<String, Value>) -> Option<String> {
    if let Some(Value::String(message)) = map.get("error").and_then(|e| e.get("message")) {
        return Some(message.clone());
    }

    if let Some(Value::String(message)) = map.get("error") {
        return Some(message.clone());
    }

    match map.get("detail") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Array(entries)) => {
            if let Some(Value::String(msg)) = entries.first().and_then(|entry| entry.get("msg")) {
                Some(msg.clone())
            } else {
                serde_json::to_string(entries).ok()
            }
        }
        Some(Value::Null) | None => None,
        Some(other) => serde_json::to_string(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("Expected object, got: {:?}", other),
        }
    }

    #[test]
    fn test_parse_body_empty_is_null() {
        assert_eq!(parse_body(""), Value::Null);
    }

    #[test]
    fn test_parse_body_garbage_is_null() {
        assert_eq!(parse_body("<html>502 Bad Gateway</html>"), Value::Null);
    }

    #[test]
    fn test_parse_body_valid_json() {
        assert_eq!(
            parse_body(r#"{"message": "pong"}"#),
            json!({ "message": "pong" })
        );
    }

    #[test]
    fn test_envelope_success_unwraps_data() {
        let result = normalize(200, json!({ "success": true, "data": { "items": [] } }));
        assert_eq!(result.unwrap(), json!({ "items": [] }));
    }

    #[test]
    fn test_envelope_success_without_data_is_null() {
        let result = normalize(200, json!({ "success": true }));
        assert_eq!(result.unwrap(), Value::Null);
    }

    #[test]
    fn test_envelope_failure_wins_over_2xx_status() {
        // A 200 with success: false is still a failure
        let result = normalize(
            200,
            json!({ "success": false, "error": { "message": "bad creds" } }),
        );

        match result.unwrap_err() {
            ClientError::Backend(msg) => assert_eq!(msg, "bad creds"),
            e => panic!("Expected Backend error, got: {:?}", e),
        }
    }

    #[test]
    fn test_envelope_non_2xx_is_failure_even_when_success_true() {
        let result = normalize(502, json!({ "success": true, "data": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_non_boolean_success_is_raw() {
        // "success" must be a boolean to count as an envelope
        let payload = json!({ "success": "yes", "data": 42 });
        let result = normalize(200, payload.clone());
        assert_eq!(result.unwrap(), payload);
    }

    #[test]
    fn test_raw_passthrough() {
        let payload = json!({ "access_token": "abc", "token_type": "bearer" });
        let result = normalize(200, payload.clone());
        assert_eq!(result.unwrap(), payload);
    }

    #[test]
    fn test_raw_non_2xx_is_generic() {
        // Raw bodies never contribute a message, even when they have one
        let result = normalize(400, json!({ "detail": "Incorrect username or password" }));

        match result.unwrap_err() {
            ClientError::RequestFailed(400) => {}
            e => panic!("Expected RequestFailed(400), got: {:?}", e),
        }
    }

    #[test]
    fn test_null_payload_non_2xx_is_generic() {
        let result = normalize(500, Value::Null);

        match result.unwrap_err() {
            ClientError::RequestFailed(500) => {}
            e => panic!("Expected RequestFailed(500), got: {:?}", e),
        }
    }

    #[test]
    fn test_message_priority_error_message_first() {
        let map = object(json!({
            "error": { "message": "from error.message" },
            "detail": "from detail"
        }));
        assert_eq!(error_message(&map).as_deref(), Some("from error.message"));
    }

    #[test]
    fn test_message_error_as_string() {
        let map = object(json!({ "error": "plain error string" }));
        assert_eq!(error_message(&map).as_deref(), Some("plain error string"));
    }

    #[test]
    fn test_message_detail_string() {
        let map = object(json!({ "error": null, "detail": "detail string" }));
        assert_eq!(error_message(&map).as_deref(), Some("detail string"));
    }

    #[test]
    fn test_message_detail_array_first_msg() {
        let map = object(json!({
            "detail": [
                { "loc": ["body", "file"], "msg": "field required", "type": "value_error" },
                { "loc": ["body", "other"], "msg": "ignored", "type": "value_error" }
            ]
        }));
        assert_eq!(error_message(&map).as_deref(), Some("field required"));
    }

    #[test]
    fn test_message_detail_array_without_msg_is_stringified() {
        let map = object(json!({ "detail": [{ "code": 42 }] }));
        assert_eq!(error_message(&map).as_deref(), Some(r#"[{"code":42}]"#));
    }

    #[test]
    fn test_message_detail_object_is_stringified() {
        let map = object(json!({ "detail": { "code": "UPLOAD_FAILED" } }));
        assert_eq!(
            error_message(&map).as_deref(),
            Some(r#"{"code":"UPLOAD_FAILED"}"#)
        );
    }

    #[test]
    fn test_message_null_detail_falls_back_to_status() {
        let map = object(json!({ "success": false, "data": null, "error": null, "detail": null }));
        assert_eq!(error_message(&map), None);

        let result = normalize(500, Value::Object(map));
        match result.unwrap_err() {
            ClientError::RequestFailed(500) => {}
            e => panic!("Expected RequestFailed(500), got: {:?}", e),
        }
    }

    #[test]
    fn test_envelope_failure_message_at_any_status() {
        for status in [200, 401, 422, 500] {
            let result = normalize(
                status,
                json!({ "success": false, "error": { "message": "bad creds" } }),
            );
            match result.unwrap_err() {
                ClientError::Backend(msg) => assert_eq!(msg, "bad creds"),
                e => panic!("Expected Backend error at {}, got: {:?}", status, e),
            }
        }
    }
}
