//! The in-page side of the bridge.
//!
//! Messages flow in both directions:
//! - **Page -> host**: `window.ipc.postMessage(JSON.stringify({kind, ...}))`,
//!   picked up by the webview's IPC handler (see [`PageMessage`]).
//! - **Host -> page**: `evaluate_script` calling `window.__tronbun_return`,
//!   which settles the promise a page call is waiting on.
//!
//! [`PageMessage`]: crate::PageMessage

use serde_json::Value;

/// Installed as an initialization script, so it runs on every page.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    if (window.__tronbun_return) return;

    var calls = {};
    var counter = 0;
    window._bunwebview_pending = window._bunwebview_pending || {};

    function post(message) {
        window.ipc.postMessage(JSON.stringify(message));
    }

    function settle(pending, status, result) {
        if (status === 0) {
            pending.resolve(result);
        } else {
            pending.reject(new Error(typeof result === 'string' ? result : JSON.stringify(result)));
        }
    }

    window.__tronbun_return = function(seq, status, result) {
        var pending = calls[seq] || window._bunwebview_pending[seq];
        delete calls[seq];
        delete window._bunwebview_pending[seq];
        if (pending) settle(pending, status, result);
    };

    window.__tronbun_bind = function(name) {
        window[name] = function() {
            var args = Array.prototype.slice.call(arguments);
            var seq = 'b' + (++counter) + '-' + Math.random().toString(36).substring(2);
            return new Promise(function(resolve, reject) {
                calls[seq] = { resolve: resolve, reject: reject };
                post({ kind: 'bind', name: name, seq: seq, req: args });
            });
        };
    };

    window.__tronbun_unbind = function(name) {
        delete window[name];
    };

    window.__bunwebview_invoke = function(seq, request) {
        post({ kind: 'invoke', seq: seq, req: request });
    };

    window.tronbun = {
        invoke: function(channel, data) {
            return new Promise(function(resolve, reject) {
                var id = Math.random().toString(36).substring(2);
                window._bunwebview_pending[id] = { resolve: resolve, reject: reject };
                window.__bunwebview_invoke(id, JSON.stringify({
                    type: 'invoke',
                    channel: channel,
                    data: data,
                    id: id
                }));
            });
        },
        send: function(channel, data) {
            window.__bunwebview_invoke('', JSON.stringify({
                type: 'send',
                channel: channel,
                data: data
            }));
        }
    };

    window.bunwebview_receive = function(message) {
        try {
            var data = JSON.parse(message);
            if (data.type === 'ipc:response' && data.id) {
                window.__tronbun_return(data.id, 0, data.result);
            } else if (data.type === 'ipc:error' && data.id) {
                window.__tronbun_return(data.id, 1, data.error);
            }
        } catch (e) {
            console.error('Failed to process IPC message:', e);
        }
    };
})();
"#;

/// Route right-clicks to the host while a context menu is installed.
pub const CONTEXT_MENU_SCRIPT: &str = r#"
(function() {
    if (window.__tronbun_context_menu) {
        window.__tronbun_context_menu.enabled = true;
        return;
    }
    var state = { enabled: true };
    window.__tronbun_context_menu = state;
    window.addEventListener('contextmenu', function(e) {
        if (!state.enabled) return;
        e.preventDefault();
        e.stopPropagation();
        window.ipc.postMessage(JSON.stringify({
            kind: 'context_menu',
            x: e.clientX,
            y: e.clientY
        }));
    }, true);
})();
"#;

/// Hand right-clicks back to the engine's default menu.
pub const CONTEXT_MENU_CLEAR_SCRIPT: &str =
    "if (window.__tronbun_context_menu) { window.__tronbun_context_menu.enabled = false; }";

/// Result a bound function resolves with once its event is emitted.
pub const BIND_ACK: &str = r#"{"status":"success"}"#;

fn js_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

/// Expose `name` to the page as a function.
pub fn js_bind(name: &str) -> String {
    format!("window.__tronbun_bind({});", js_string(name))
}

pub fn js_unbind(name: &str) -> String {
    format!("window.__tronbun_unbind({});", js_string(name))
}

/// Settle the page call waiting on `seq`. Status `0` resolves with
/// `result`; anything else rejects.
pub fn js_return(seq: &str, status: i32, result: &Value) -> String {
    let result = serde_json::to_string(result).unwrap_or_else(|_| "null".to_string());
    format!("window.__tronbun_return({}, {status}, {result});", js_string(seq))
}

/// Apply `opacity` to the page root.
pub fn js_set_opacity(opacity: f64) -> String {
    format!("document.documentElement.style.opacity = '{opacity}';")
}

/// Make the page background see-through (or restore it).
pub fn js_set_transparent(transparent: bool) -> String {
    let value = if transparent { "transparent" } else { "" };
    format!(
        "document.documentElement.style.background = '{value}'; \
         if (document.body) document.body.style.background = '{value}';"
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn init_script_defines_public_api() {
        for name in [
            "window.tronbun",
            "invoke:",
            "send:",
            "window._bunwebview_pending",
            "window.bunwebview_receive",
            "window.__bunwebview_invoke",
            "window.__tronbun_return",
            "window.__tronbun_bind",
        ] {
            assert!(BRIDGE_INIT_SCRIPT.contains(name), "missing {name}");
        }
    }

    #[test]
    fn init_script_posts_kinds_the_host_parses() {
        assert!(BRIDGE_INIT_SCRIPT.contains("kind: 'invoke'"));
        assert!(BRIDGE_INIT_SCRIPT.contains("kind: 'bind'"));
        assert!(CONTEXT_MENU_SCRIPT.contains("kind: 'context_menu'"));
    }

    #[test]
    fn bind_names_are_quoted() {
        assert_eq!(js_bind("greet"), r#"window.__tronbun_bind("greet");"#);
        assert_eq!(
            js_unbind("it's \"odd\""),
            r#"window.__tronbun_unbind("it's \"odd\"");"#
        );
    }

    #[test]
    fn return_embeds_raw_json() {
        assert_eq!(
            js_return("B", 0, &json!({"ok": true})),
            r#"window.__tronbun_return("B", 0, {"ok":true});"#
        );
        assert_eq!(
            js_return("7", 1, &json!("nope")),
            r#"window.__tronbun_return("7", 1, "nope");"#
        );
    }

    #[test]
    fn bind_ack_is_json() {
        let parsed: Value = serde_json::from_str(BIND_ACK).unwrap();
        assert_eq!(parsed["status"], "success");
    }

    #[test]
    fn opacity_script() {
        assert_eq!(
            js_set_opacity(0.5),
            "document.documentElement.style.opacity = '0.5';"
        );
    }
}
