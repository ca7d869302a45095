//! Native surfaces behind the helpers: tray icon, menus, icons,
//! notifications, and the GTK pump the Linux backends need.

pub mod event_pump;
pub mod icon;
pub mod menu;
pub mod notifications;
pub mod tray;

pub use icon::{default_icon, load_png, RgbaImage};
pub use menu::build_menu;
pub use notifications::notify;
pub use tray::TrayHost;
