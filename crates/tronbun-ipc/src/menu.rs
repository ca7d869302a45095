//! Menu-item schema shared by `tray_set_menu` and `window_set_context_menu`.
//!
//! Parsing is deliberately forgiving: unknown `type` strings become normal
//! items, missing flags take their defaults, and non-object entries are
//! skipped. Only a `menu` that is not an array at all is an error.

use serde_json::Value;

use crate::errors::CommandError;

/// Items kept per menu level; extra entries are dropped.
pub const MAX_MENU_ITEMS: usize = 32;

const MAX_TEXT: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuItemKind {
    #[default]
    Normal,
    Separator,
    Checkbox,
    Submenu,
}

impl MenuItemKind {
    fn parse(s: &str) -> Self {
        match s {
            "separator" => Self::Separator,
            "checkbox" => Self::Checkbox,
            "submenu" => Self::Submenu,
            _ => Self::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    pub kind: MenuItemKind,
    pub enabled: bool,
    pub checked: bool,
    pub accelerator: Option<String>,
    /// Children of a `submenu` item. Empty for every other kind.
    pub submenu: Vec<MenuItem>,
}

impl Default for MenuItem {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            kind: MenuItemKind::Normal,
            enabled: true,
            checked: false,
            accelerator: None,
            submenu: Vec::new(),
        }
    }
}

impl MenuItem {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = |key: &str| {
            obj.get(key)
                .and_then(Value::as_str)
                .filter(|s| s.len() < MAX_TEXT)
                .map(str::to_owned)
        };

        let kind = text("type")
            .map(|t| MenuItemKind::parse(&t))
            .unwrap_or_default();
        let submenu = match (kind, obj.get("submenu")) {
            (MenuItemKind::Submenu, Some(Value::Array(items))) => parse_items(items),
            _ => Vec::new(),
        };

        Some(Self {
            id: text("id").unwrap_or_default(),
            label: text("label").unwrap_or_default(),
            kind,
            enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(true),
            checked: obj.get("checked").and_then(Value::as_bool).unwrap_or(false),
            accelerator: text("accelerator").filter(|a| !a.is_empty()),
            submenu,
        })
    }
}

fn parse_items(items: &[Value]) -> Vec<MenuItem> {
    items
        .iter()
        .take(MAX_MENU_ITEMS)
        .filter_map(MenuItem::from_value)
        .collect()
}

/// Parse a `menu` param value. Anything but an array is `Invalid menu format`.
pub fn parse_menu(value: Option<&Value>) -> Result<Vec<MenuItem>, CommandError> {
    match value {
        Some(Value::Array(items)) => Ok(parse_items(items)),
        _ => Err(CommandError::InvalidMenu),
    }
}

// =============================================================================
// TESTS
// =============================================================================
