//! WebView event types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLoadState {
    /// Navigation has started.
    Started,
    /// Page has fully loaded.
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// A message posted by the bridge scripts through `window.ipc.postMessage`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageMessage {
    /// `__bunwebview_invoke(seq, request)`; `seq` is empty for `send`.
    Invoke {
        #[serde(default)]
        seq: String,
        #[serde(default)]
        req: Value,
    },
    /// A call to a function exposed with `bind(name)`.
    Bind {
        name: String,
        seq: String,
        #[serde(default)]
        req: Value,
    },
    /// Right-click at client coordinates while a context menu is installed.
    ContextMenu { x: f64, y: f64 },
}

impl PageMessage {
    /// Parse a raw postMessage body. Anything unrecognised is `None`.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// The bridge passes the invoke request as JSON text; the peer gets it as
/// an object. Text that is not JSON is passed on as a string.
pub fn request_value(req: Value) -> Value {
    match req {
        Value::String(text) => serde_json::from_str(&text).unwrap_or(Value::String(text)),
        other => other,
    }
}

/// Events emitted by the WebView, drained by the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum WebViewEvent {
    /// Page load state changed. Carries the URL.
    PageLoad { state: PageLoadState, url: String },
    /// A bridge message was received from the page.
    Message(PageMessage),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_invoke() {
        let raw = r#"{"kind":"invoke","seq":"B","req":"{\"type\":\"invoke\",\"channel\":\"ping\",\"data\":{\"n\":1},\"id\":\"B\"}"}"#;
        let Some(PageMessage::Invoke { seq, req }) = PageMessage::from_json(raw) else {
            panic!("expected invoke");
        };
        assert_eq!(seq, "B");
        assert_eq!(
            request_value(req),
            json!({"type": "invoke", "channel": "ping", "data": {"n": 1}, "id": "B"})
        );
    }

    #[test]
    fn send_has_empty_seq() {
        let raw = r#"{"kind":"invoke","seq":"","req":"{\"type\":\"send\",\"channel\":\"log\"}"}"#;
        let msg = PageMessage::from_json(raw).unwrap();
        assert!(matches!(msg, PageMessage::Invoke { ref seq, .. } if seq.is_empty()));
    }

    #[test]
    fn parses_bind_and_context_menu() {
        let msg = PageMessage::from_json(r#"{"kind":"bind","name":"greet","seq":"b1","req":["world"]}"#);
        assert_eq!(
            msg,
            Some(PageMessage::Bind {
                name: "greet".into(),
                seq: "b1".into(),
                req: json!(["world"]),
            })
        );

        let msg = PageMessage::from_json(r#"{"kind":"context_menu","x":10,"y":20.5}"#);
        assert_eq!(msg, Some(PageMessage::ContextMenu { x: 10.0, y: 20.5 }));
    }

    #[test]
    fn rejects_unknown_or_malformed() {
        assert_eq!(PageMessage::from_json("not json"), None);
        assert_eq!(PageMessage::from_json(r#"{"kind":"other"}"#), None);
        assert_eq!(PageMessage::from_json(r#"{"kind":"bind","name":"x"}"#), None);
    }

    #[test]
    fn request_value_keeps_non_json_text() {
        assert_eq!(request_value(json!("plain")), json!("plain"));
        assert_eq!(request_value(json!({"a": 1})), json!({"a": 1}));
        assert_eq!(request_value(Value::Null), Value::Null);
    }
}
