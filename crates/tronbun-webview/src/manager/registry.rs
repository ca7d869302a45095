use std::collections::BTreeSet;

use crate::bridge::{self, CONTEXT_MENU_SCRIPT};

/// Page-scoped state the host re-applies after every page load: user
/// `init` scripts, bound function stubs, context-menu interception and
/// page styling.
#[derive(Debug, Clone, Default)]
pub struct ScriptRegistry {
    init_scripts: Vec<String>,
    bindings: BTreeSet<String>,
    context_menu: bool,
    transparent: bool,
    opacity: Option<f64>,
    /// The current document has finished loading and had its replay.
    page_loaded: bool,
}

impl ScriptRegistry {
    /// Register a user script. Returns `true` when it should also run on
    /// the current document; otherwise the next replay covers it.
    pub fn add_init(&mut self, js: &str) -> bool {
        self.init_scripts.push(js.to_string());
        self.page_loaded
    }

    pub fn page_started(&mut self) {
        self.page_loaded = false;
    }

    /// Mark the document loaded and return what to replay on it.
    pub fn page_finished(&mut self) -> String {
        self.page_loaded = true;
        self.replay_script()
    }

    /// Returns `false` if `name` was already bound.
    pub fn bind(&mut self, name: &str) -> bool {
        self.bindings.insert(name.to_string())
    }

    /// Returns `false` if `name` was not bound.
    pub fn unbind(&mut self, name: &str) -> bool {
        self.bindings.remove(name)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }

    pub fn set_context_menu(&mut self, installed: bool) {
        self.context_menu = installed;
    }

    pub fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = (opacity < 1.0).then_some(opacity);
    }

    /// Everything to run on a freshly loaded page, in registration order
    /// for user scripts. Empty when there is nothing to replay.
    pub fn replay_script(&self) -> String {
        let mut parts: Vec<String> = self.init_scripts.clone();
        parts.extend(self.bindings.iter().map(|name| bridge::js_bind(name)));
        if self.context_menu {
            parts.push(CONTEXT_MENU_SCRIPT.to_string());
        }
        if self.transparent {
            parts.push(bridge::js_set_transparent(true));
        }
        if let Some(opacity) = self.opacity {
            parts.push(bridge::js_set_opacity(opacity));
        }
        parts.join("\n")
    }
}

// =============================================================================
// TESTS
// =============================================================================
