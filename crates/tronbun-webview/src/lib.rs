//! The webview helper's native surface.
//!
//! Wraps `wry` and a `winit` window to provide:
//! - The in-page bridge (`window.tronbun.invoke` / `send`) and bound functions
//! - Page-to-host messages over `window.ipc.postMessage`
//! - Native right-click menus through `muda`
//! - The `WebviewOps` / `WindowOps` implementations the broker drives

pub mod bridge;
pub mod context_menu;
pub mod events;
pub mod manager;

pub use context_menu::{ContextMenuHost, NativeContextMenu};
pub use events::{PageLoadState, PageMessage, WebViewEvent};
pub use manager::{WebViewConfig, WebViewHost};
