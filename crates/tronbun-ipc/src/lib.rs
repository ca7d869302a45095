//! The stdio IPC broker shared by the webview and tray helpers.
//!
//! Data flow:
//! - **stdin → main thread**: [`reader`] reads newline-delimited frames,
//!   [`codec`] parses them into [`Request`]s, and [`dispatch`] hands each
//!   one to the GUI main loop, waiting (bounded) for it to complete.
//! - **main thread**: [`Broker::execute`] looks the method up in the
//!   [`router`] table and runs it against the helper's [`CommandTarget`].
//! - **→ stdout**: every response and every unsolicited [`Event`] goes
//!   through one [`FrameWriter`], which keeps frames whole.
//!
//! Nothing here touches a GUI toolkit; the helpers plug in through the
//! traits in [`commands`].

pub mod broker;
pub mod codec;
pub mod commands;
pub mod dispatch;
pub mod errors;
pub mod events;
pub mod framing;
pub mod menu;
pub mod params;
pub mod reader;
pub mod router;
pub mod writer;

pub use broker::Broker;
pub use codec::{Limits, Reply, Request, UNKNOWN_ID};
pub use commands::{
    CommandTarget, SizeHint, TrayOps, VersionInfo, WebviewOps, WindowOps, WireLimits,
};
pub use dispatch::{DispatchOutcome, DispatchRecord, Dispatcher, MainLoop};
pub use errors::{CommandError, DispatchError, FrameError, FrameRejection, ToolkitError};
pub use events::{Event, INVOKE_BINDING};
pub use menu::{MenuItem, MenuItemKind, MAX_MENU_ITEMS};
pub use params::Params;
pub use reader::{spawn_reader, ReaderLoop};
pub use router::{Method, Namespace};
pub use writer::{FrameWriter, MemorySink};
