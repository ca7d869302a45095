//! Broker error types.
//!
//! The `Display` strings of [`FrameError`] and [`CommandError`] are the
//! exact `error` values the peer sees on the wire.

/// A frame that could not be turned into a [`Request`](crate::Request).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid command format")]
pub struct FrameError {
    /// The request id, when it could still be read from the frame.
    pub id: Option<String>,
    /// Why the frame was rejected. Logged, never sent.
    pub reason: FrameRejection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRejection {
    NotJson,
    NotAnObject,
    MissingMethod,
    MissingId,
    MethodTooLong,
    IdTooLong,
    ParamsTooLong,
    LineTooLong,
    InvalidUtf8,
}

impl FrameError {
    pub fn new(reason: FrameRejection) -> Self {
        Self { id: None, reason }
    }

    pub fn with_id(reason: FrameRejection, id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            reason,
        }
    }
}

/// A failure reported by a GUI toolkit call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ToolkitError(pub String);

impl ToolkitError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// A request that parsed but could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown method")]
    UnknownMethod,

    #[error("WebView error: {0}")]
    Toolkit(#[from] ToolkitError),

    #[error("Invalid menu format")]
    InvalidMenu,
}

/// The main loop is gone; nothing can be dispatched any more.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("main loop closed")]
    LoopClosed,
}
