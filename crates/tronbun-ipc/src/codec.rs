//! Wire codec: request parsing and response encoding.
//!
//! Inbound frames are `{"method": str, "id": str, "params": obj?}`.
//! Outbound responses are `{"type":"response","id":…,"result":…}` or
//! `{"type":"response","id":…,"error":…}`.

use std::borrow::Cow;

use serde::Serialize;
use serde_json::{Map, Value};
use tronbun_config::IpcConfig;

use crate::errors::{FrameError, FrameRejection};

/// Id used when a response cannot be tied to a request: pre-parse
/// rejections and dispatcher timeouts.
pub const UNKNOWN_ID: &str = "unknown";

/// Size ceilings applied to inbound frames.
///
/// Both limits count the terminator the way the peer library does, so the
/// longest accepted field is `max_field_length - 1` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_command_length: usize,
    pub max_field_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self::from_config(&IpcConfig::default())
    }
}

impl Limits {
    pub fn from_config(config: &IpcConfig) -> Self {
        Self {
            max_command_length: config.max_command_length,
            max_field_length: config.max_field_length,
        }
    }

    /// Longest accepted line, newline excluded.
    pub fn max_line(&self) -> usize {
        self.max_command_length.saturating_sub(1)
    }

    fn field_fits(&self, value: &str) -> bool {
        value.len() < self.max_field_length
    }

    fn command_fits(&self, value: &str) -> bool {
        value.len() < self.max_command_length
    }
}

// =============================================================================
// REQUEST
// =============================================================================

/// A parsed inbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    /// Opaque; echoed back verbatim and never interpreted.
    pub id: String,
    /// The `params` subtree. An absent `params` is an empty object.
    pub params: Value,
}

impl Request {
    /// Parse one frame (without its trailing newline).
    pub fn parse(line: &str, limits: &Limits) -> Result<Self, FrameError> {
        let value = parse_lenient(line)?;

        let Value::Object(mut object) = value else {
            return Err(FrameError::new(FrameRejection::NotAnObject));
        };

        // The id is read first so later rejections can still be correlated.
        let id = match object.remove("id") {
            Some(Value::String(id)) if limits.field_fits(&id) => Some(id),
            Some(Value::String(_)) => {
                return Err(FrameError::new(FrameRejection::IdTooLong));
            }
            _ => None,
        };

        let method = match object.remove("method") {
            Some(Value::String(method)) if limits.field_fits(&method) => method,
            Some(Value::String(_)) => return Err(reject(FrameRejection::MethodTooLong, id)),
            _ => return Err(reject(FrameRejection::MissingMethod, id)),
        };

        let Some(id) = id else {
            return Err(FrameError::new(FrameRejection::MissingId));
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(params) => {
                let fits = serde_json::to_string(&params)
                    .map(|text| limits.command_fits(&text))
                    .unwrap_or(false);
                if !fits {
                    return Err(FrameError::with_id(FrameRejection::ParamsTooLong, id));
                }
                params
            }
        };

        Ok(Self { method, id, params })
    }
}

fn reject(reason: FrameRejection, id: Option<String>) -> FrameError {
    FrameError { id, reason }
}

/// Parse JSON, retrying once with unknown string escapes (`\q`) kept as
/// literal text instead of failing the whole frame.
fn parse_lenient(line: &str) -> Result<Value, FrameError> {
    match serde_json::from_str(line) {
        Ok(value) => Ok(value),
        Err(_) => {
            let repaired = escape_unknown_sequences(line);
            if matches!(repaired, Cow::Borrowed(_)) {
                return Err(FrameError::new(FrameRejection::NotJson));
            }
            serde_json::from_str(&repaired).map_err(|_| FrameError::new(FrameRejection::NotJson))
        }
    }
}

/// Double the backslash of every escape sequence JSON does not define.
fn escape_unknown_sequences(text: &str) -> Cow<'_, str> {
    let needs_repair = text
        .as_bytes()
        .windows(2)
        .any(|w| w[0] == b'\\' && !is_json_escape(w[1]));
    if !needs_repair {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some(&next) if next.is_ascii() && is_json_escape(next as u8) => {
                out.push('\\');
                out.push(next);
                chars.next();
            }
            _ => out.push_str("\\\\"),
        }
    }
    Cow::Owned(out)
}

fn is_json_escape(b: u8) -> bool {
    matches!(b, b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' | b'u')
}

// =============================================================================
// RESPONSE
// =============================================================================

/// What a handler answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `"result":"true"`.
    Ack,
    /// `"result":"true"` or `"result":"false"`.
    Bool(bool),
    /// A scalar string result, wrapped as a JSON string literal.
    Text(String),
    /// A raw JSON result (object, array, number, boolean or null).
    Json(Value),
    /// `"error":…`; supersedes any result.
    Error(String),
}

impl Reply {
    pub fn error(err: impl std::fmt::Display) -> Self {
        Self::Error(err.to_string())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

#[derive(Serialize)]
struct ResponseFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Cow<'a, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

/// Encode a response frame body (no trailing newline).
pub fn encode_response(id: &str, reply: &Reply) -> String {
    let (result, error) = match reply {
        Reply::Ack => (Some(Cow::Owned(Value::from("true"))), None),
        Reply::Bool(ok) => (
            Some(Cow::Owned(Value::from(if *ok { "true" } else { "false" }))),
            None,
        ),
        Reply::Text(text) => (Some(Cow::Owned(Value::from(text.as_str()))), None),
        Reply::Json(value) => (Some(Cow::Borrowed(value)), None),
        Reply::Error(message) => (None, Some(message.as_str())),
    };

    let frame = ResponseFrame {
        kind: "response",
        id,
        result,
        error,
    };
    // Serializing a struct of strings and `Value`s cannot fail.
    serde_json::to_string(&frame).unwrap_or_default()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(line: &str) -> Result<Request, FrameError> {
        Request::parse(line, &Limits::default())
    }

    // -- Parsing --

    #[test]
    fn parses_method_id_and_params() {
        let req = parse(r#"{"method":"set_title","id":"1","params":{"title":"Hello"}}"#).unwrap();
        assert_eq!(req.method, "set_title");
        assert_eq!(req.id, "1");
        assert_eq!(req.params, json!({"title": "Hello"}));
    }

    #[test]
    fn absent_params_is_empty_object() {
        let req = parse(r#"{"method":"terminate","id":"2"}"#).unwrap();
        assert_eq!(req.params, json!({}));
    }

    #[test]
    fn nested_params_are_kept_whole() {
        let req = parse(
            r#"{"method":"tray_set_menu","id":"m","params":{"menu":[{"id":"a","label":"A"}]}}"#,
        )
        .unwrap();
        assert_eq!(req.params["menu"][0]["label"], "A");
    }

    #[test]
    fn rejects_non_json() {
        let err = parse("not json").unwrap_err();
        assert_eq!(err.reason, FrameRejection::NotJson);
        assert!(err.id.is_none());
    }

    #[test]
    fn rejects_non_object() {
        let err = parse(r#"["set_title","1"]"#).unwrap_err();
        assert_eq!(err.reason, FrameRejection::NotAnObject);
    }

    #[test]
    fn rejects_missing_or_non_string_method_with_recovered_id() {
        let err = parse(r#"{"id":"5","params":{}}"#).unwrap_err();
        assert_eq!(err.reason, FrameRejection::MissingMethod);
        assert_eq!(err.id.as_deref(), Some("5"));

        let err = parse(r#"{"method":42,"id":"6"}"#).unwrap_err();
        assert_eq!(err.reason, FrameRejection::MissingMethod);
        assert_eq!(err.id.as_deref(), Some("6"));
    }

    #[test]
    fn rejects_missing_or_non_string_id() {
        let err = parse(r#"{"method":"set_title"}"#).unwrap_err();
        assert_eq!(err.reason, FrameRejection::MissingId);
        assert!(err.id.is_none());

        let err = parse(r#"{"method":"set_title","id":7}"#).unwrap_err();
        assert_eq!(err.reason, FrameRejection::MissingId);
    }

    #[test]
    fn method_of_255_accepted_256_rejected() {
        let ok = format!(r#"{{"method":"{}","id":"1"}}"#, "m".repeat(255));
        assert_eq!(parse(&ok).unwrap().method.len(), 255);

        let too_long = format!(r#"{{"method":"{}","id":"1"}}"#, "m".repeat(256));
        let err = parse(&too_long).unwrap_err();
        assert_eq!(err.reason, FrameRejection::MethodTooLong);
        assert_eq!(err.id.as_deref(), Some("1"));
    }

    #[test]
    fn id_of_255_accepted_256_rejected() {
        let ok = format!(r#"{{"method":"x","id":"{}"}}"#, "i".repeat(255));
        assert_eq!(parse(&ok).unwrap().id.len(), 255);

        let too_long = format!(r#"{{"method":"x","id":"{}"}}"#, "i".repeat(256));
        let err = parse(&too_long).unwrap_err();
        assert_eq!(err.reason, FrameRejection::IdTooLong);
        assert!(err.id.is_none());
    }

    #[test]
    fn field_length_counts_unescaped_bytes() {
        // 254 'a' plus one escaped newline = 255 bytes after unescaping.
        let method = format!("{}\\n", "a".repeat(254));
        let line = format!(r#"{{"method":"{method}","id":"1"}}"#);
        assert_eq!(parse(&line).unwrap().method.len(), 255);
    }

    #[test]
    fn oversized_params_are_rejected_not_truncated() {
        let limits = Limits {
            max_command_length: 64,
            max_field_length: 256,
        };
        let line = format!(
            r#"{{"method":"eval","id":"9","params":{{"js":"{}"}}}}"#,
            "x".repeat(80)
        );
        let err = Request::parse(&line, &limits).unwrap_err();
        assert_eq!(err.reason, FrameRejection::ParamsTooLong);
        assert_eq!(err.id.as_deref(), Some("9"));
    }

    #[test]
    fn unknown_escapes_pass_through_literally() {
        let req = parse(r#"{"method":"set_title","id":"1","params":{"title":"a\qb"}}"#).unwrap();
        assert_eq!(req.params["title"], "a\\qb");
    }

    #[test]
    fn known_escapes_are_reversed() {
        let req =
            parse(r#"{"method":"eval","id":"1","params":{"js":"a\n\t\r\\\"\/b"}}"#).unwrap();
        assert_eq!(req.params["js"], "a\n\t\r\\\"/b");
    }

    #[test]
    fn unicode_escapes_and_surrogates_round_trip() {
        let req =
            parse(r#"{"method":"set_title","id":"1","params":{"title":"caf\u00e9 \ud83d\ude00"}}"#)
                .unwrap();
        assert_eq!(req.params["title"], "café 😀");
    }

    #[test]
    fn id_is_not_interpreted() {
        let req = parse(r#"{"method":"x","id":"{\"nested\":1}"}"#).unwrap();
        assert_eq!(req.id, r#"{"nested":1}"#);
    }

    // -- Encoding --

    #[test]
    fn ack_response_wraps_true_as_string() {
        assert_eq!(
            encode_response("1", &Reply::Ack),
            r#"{"type":"response","id":"1","result":"true"}"#
        );
    }

    #[test]
    fn bool_response() {
        assert_eq!(
            encode_response("t", &Reply::Bool(false)),
            r#"{"type":"response","id":"t","result":"false"}"#
        );
    }

    #[test]
    fn json_response_is_raw() {
        assert_eq!(
            encode_response("r1", &Reply::Json(json!({"ok": true}))),
            r#"{"type":"response","id":"r1","result":{"ok":true}}"#
        );
    }

    #[test]
    fn error_response() {
        assert_eq!(
            encode_response("x", &Reply::error(crate::CommandError::UnknownMethod)),
            r#"{"type":"response","id":"x","error":"Unknown method"}"#
        );
    }

    #[test]
    fn response_escapes_hostile_id() {
        let frame = encode_response("a\"b\n", &Reply::Ack);
        let parsed: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["id"], "a\"b\n");
        assert!(!frame.contains('\n'));
    }

    #[test]
    fn json_result_preserves_key_order() {
        let value: Value = serde_json::from_str(r#"{"z":1,"a":2}"#).unwrap();
        assert_eq!(
            encode_response("o", &Reply::Json(value)),
            r#"{"type":"response","id":"o","result":{"z":1,"a":2}}"#
        );
    }
}
