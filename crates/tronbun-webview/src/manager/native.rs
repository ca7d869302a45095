use wry::raw_window_handle::RawWindowHandle;

/// Format the platform's native window (or view) handle for the peer.
pub fn format_handle(raw: RawWindowHandle) -> Option<String> {
    let value: u64 = match raw {
        RawWindowHandle::Win32(h) => h.hwnd.get() as u64,
        RawWindowHandle::AppKit(h) => h.ns_view.as_ptr() as usize as u64,
        RawWindowHandle::Xlib(h) => h.window as u64,
        RawWindowHandle::Xcb(h) => h.window.get() as u64,
        RawWindowHandle::Wayland(h) => h.surface.as_ptr() as usize as u64,
        _ => return None,
    };
    Some(format!("{value:#x}"))
}
