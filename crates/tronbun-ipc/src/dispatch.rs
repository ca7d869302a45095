//! Reader-thread to main-thread handoff.
//!
//! The reader wraps each request in a [`DispatchRecord`], hands it to the
//! helper's [`MainLoop`] and waits on a single-shot channel for the main
//! thread to finish with it. A record that outlives the wait is still
//! executed; its response then arrives after the timeout frame.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender};
use std::time::Duration;

use crate::codec::Request;
use crate::errors::DispatchError;

/// One in-flight request, owned by whichever side holds it.
#[derive(Debug)]
pub struct DispatchRecord {
    pub request: Request,
    completion: SyncSender<()>,
}

impl DispatchRecord {
    pub fn new(request: Request) -> (Self, Receiver<()>) {
        let (completion, done) = mpsc::sync_channel(1);
        (
            Self {
                request,
                completion,
            },
            done,
        )
    }

    /// Tell the waiting reader the response has been written.
    pub fn complete(self) {
        // The reader may have given up already; nobody is left to tell.
        let _ = self.completion.try_send(());
    }
}

/// The GUI main loop, seen from the reader thread.
pub trait MainLoop: Send {
    /// Queue `record` to run on the main thread, in order.
    fn enqueue(&self, record: DispatchRecord) -> Result<(), DispatchError>;

    /// Ask the main loop to exit.
    fn shutdown(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    TimedOut,
    /// The main loop is gone, or dropped the record unexecuted.
    Closed,
}

pub struct Dispatcher<L> {
    main_loop: L,
    timeout: Duration,
}

impl<L: MainLoop> Dispatcher<L> {
    pub fn new(main_loop: L, timeout: Duration) -> Self {
        Self { main_loop, timeout }
    }

    pub fn main_loop(&self) -> &L {
        &self.main_loop
    }

    /// Run `request` on the main thread and wait for it, up to the timeout.
    pub fn dispatch(&self, request: Request) -> DispatchOutcome {
        let (record, done) = DispatchRecord::new(request);
        if self.main_loop.enqueue(record).is_err() {
            return DispatchOutcome::Closed;
        }
        match done.recv_timeout(self.timeout) {
            Ok(()) => DispatchOutcome::Completed,
            Err(RecvTimeoutError::Timeout) => DispatchOutcome::TimedOut,
            Err(RecvTimeoutError::Disconnected) => DispatchOutcome::Closed,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
