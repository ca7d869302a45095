//! Static method table.
//!
//! Every method name the helpers understand maps to one [`Method`], and
//! every [`Method`] belongs to one [`Namespace`]. A helper serves the
//! namespaces its [`CommandTarget`](crate::CommandTarget) exposes; the
//! rest answer `Unknown method`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Webview,
    Window,
    Tray,
    Bridge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    // Webview
    SetTitle,
    SetSize,
    Navigate,
    SetHtml,
    Eval,
    Init,
    Bind,
    Unbind,
    Terminate,
    GetWindow,
    GetVersion,

    // Window control
    SetTransparent,
    SetOpaque,
    EnableBlur,
    RemoveDecorations,
    AddDecorations,
    SetAlwaysOnTop,
    SetOpacity,
    SetResizable,
    SetPosition,
    Center,
    Minimize,
    Maximize,
    Restore,
    Hide,
    Show,
    SetContextMenu,
    ClearContextMenu,

    // Tray
    TraySetIcon,
    TraySetTooltip,
    TraySetMenu,
    TrayShowNotification,
    TrayDestroy,

    // Bridge
    IpcResponse,
}

const TABLE: &[(&str, Method)] = &[
    ("set_title", Method::SetTitle),
    ("set_size", Method::SetSize),
    ("navigate", Method::Navigate),
    ("set_html", Method::SetHtml),
    ("eval", Method::Eval),
    ("init", Method::Init),
    ("bind", Method::Bind),
    ("unbind", Method::Unbind),
    ("terminate", Method::Terminate),
    ("get_window", Method::GetWindow),
    ("get_version", Method::GetVersion),
    ("window_set_transparent", Method::SetTransparent),
    ("window_set_opaque", Method::SetOpaque),
    ("window_enable_blur", Method::EnableBlur),
    ("window_remove_decorations", Method::RemoveDecorations),
    ("window_add_decorations", Method::AddDecorations),
    ("window_set_always_on_top", Method::SetAlwaysOnTop),
    ("window_set_opacity", Method::SetOpacity),
    ("window_set_resizable", Method::SetResizable),
    ("window_set_position", Method::SetPosition),
    ("window_center", Method::Center),
    ("window_minimize", Method::Minimize),
    ("window_maximize", Method::Maximize),
    ("window_restore", Method::Restore),
    ("window_hide", Method::Hide),
    ("window_show", Method::Show),
    ("window_set_context_menu", Method::SetContextMenu),
    ("window_clear_context_menu", Method::ClearContextMenu),
    ("tray_set_icon", Method::TraySetIcon),
    ("tray_set_tooltip", Method::TraySetTooltip),
    ("tray_set_menu", Method::TraySetMenu),
    ("tray_show_notification", Method::TrayShowNotification),
    ("tray_destroy", Method::TrayDestroy),
    ("ipc:response", Method::IpcResponse),
];

impl Method {
    pub fn parse(name: &str) -> Option<Self> {
        TABLE
            .iter()
            .find(|(entry, _)| *entry == name)
            .map(|(_, method)| *method)
    }

    pub fn as_str(self) -> &'static str {
        TABLE
            .iter()
            .find(|(_, method)| *method == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }

    pub fn namespace(self) -> Namespace {
        use Method::*;
        match self {
            SetTitle | SetSize | Navigate | SetHtml | Eval | Init | Bind | Unbind | Terminate
            | GetWindow | GetVersion => Namespace::Webview,
            SetTransparent | SetOpaque | EnableBlur | RemoveDecorations | AddDecorations
            | SetAlwaysOnTop | SetOpacity | SetResizable | SetPosition | Center | Minimize
            | Maximize | Restore | Hide | Show | SetContextMenu | ClearContextMenu => {
                Namespace::Window
            }
            TraySetIcon | TraySetTooltip | TraySetMenu | TrayShowNotification | TrayDestroy => {
                Namespace::Tray
            }
            IpcResponse => Namespace::Bridge,
        }
    }

    /// Every method, in table order.
    pub fn all() -> impl Iterator<Item = Method> {
        TABLE.iter().map(|(_, method)| *method)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TESTS
// =============================================================================
