//! Unsolicited frames: everything the helpers write without a request.

use serde::Serialize;
use serde_json::Value;

/// Bound-function name the in-page bridge calls through.
pub const INVOKE_BINDING: &str = "__bunwebview_invoke";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A tray menu item was activated.
    #[serde(rename = "menu_click")]
    MenuClick { data: MenuClickData },

    /// A webview context-menu item was selected.
    #[serde(rename = "context_menu_click")]
    ContextMenuClick { id: String },

    /// The page called `tronbun.invoke` or `tronbun.send`.
    #[serde(rename = "ipc:call")]
    IpcCall { id: String, seq: String, req: Value },

    /// The page called a function exposed with `bind(name)`.
    #[serde(rename = "bind_callback")]
    BindCallback { id: String, seq: String, req: Value },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuClickData {
    #[serde(rename = "menuId")]
    pub menu_id: String,
}

impl Event {
    pub fn menu_click(menu_id: impl Into<String>) -> Self {
        Self::MenuClick {
            data: MenuClickData {
                menu_id: menu_id.into(),
            },
        }
    }

    pub fn context_menu_click(id: impl Into<String>) -> Self {
        Self::ContextMenuClick { id: id.into() }
    }

    pub fn ipc_call(seq: impl Into<String>, req: Value) -> Self {
        Self::IpcCall {
            id: INVOKE_BINDING.to_string(),
            seq: seq.into(),
            req,
        }
    }

    pub fn bind_callback(name: impl Into<String>, seq: impl Into<String>, req: Value) -> Self {
        Self::BindCallback {
            id: name.into(),
            seq: seq.into(),
            req,
        }
    }

    /// The wire `type` string.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MenuClick { .. } => "menu_click",
            Self::ContextMenuClick { .. } => "context_menu_click",
            Self::IpcCall { .. } => "ipc:call",
            Self::BindCallback { .. } => "bind_callback",
        }
    }

    /// Frame body, without the trailing newline.
    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn menu_click_shape() {
        assert_eq!(
            Event::menu_click("quit").encode(),
            r#"{"type":"menu_click","data":{"menuId":"quit"}}"#
        );
    }

    #[test]
    fn context_menu_click_shape() {
        assert_eq!(
            Event::context_menu_click("copy").encode(),
            r#"{"type":"context_menu_click","id":"copy"}"#
        );
    }

    #[test]
    fn ipc_call_embeds_request_object() {
        let req = json!({"type": "invoke", "channel": "ping", "data": {"n": 1}, "id": "B"});
        assert_eq!(
            Event::ipc_call("B", req).encode(),
            r#"{"type":"ipc:call","id":"__bunwebview_invoke","seq":"B","req":{"type":"invoke","channel":"ping","data":{"n":1},"id":"B"}}"#
        );
    }

    #[test]
    fn bind_callback_shape() {
        let event = Event::bind_callback("greet", "3", json!(["world"]));
        assert_eq!(event.kind(), "bind_callback");
        assert_eq!(
            event.encode(),
            r#"{"type":"bind_callback","id":"greet","seq":"3","req":["world"]}"#
        );
    }

    #[test]
    fn names_are_escaped() {
        let line = Event::context_menu_click("a\"b\n").encode();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["id"], "a\"b\n");
    }
}
