//! The single stdout path.
//!
//! Every frame is written whole under one lock: the reader thread's error
//! responses, the main thread's responses and GUI-callback events never
//! interleave mid-line.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::codec::{encode_response, Reply};
use crate::events::Event;

type Sink = Box<dyn Write + Send>;

#[derive(Clone)]
pub struct FrameWriter {
    inner: Arc<Mutex<Sink>>,
}

impl std::fmt::Debug for FrameWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameWriter").finish_non_exhaustive()
    }
}

impl FrameWriter {
    pub fn new(sink: impl Write + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(sink))),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// A writer backed by an in-memory buffer, plus a handle to read it.
    pub fn memory() -> (Self, MemorySink) {
        let sink = MemorySink::default();
        (Self::new(sink.clone()), sink)
    }

    pub fn respond(&self, id: &str, reply: &Reply) {
        self.send(&encode_response(id, reply));
    }

    pub fn emit(&self, event: &Event) {
        tracing::debug!(kind = event.kind(), "emitting event");
        self.send(&event.encode());
    }

    /// Write one frame body followed by `\n`, then flush.
    pub fn write_frame(&self, body: &str) -> io::Result<()> {
        let mut frame = Vec::with_capacity(body.len() + 1);
        frame.extend_from_slice(body.as_bytes());
        frame.push(b'\n');

        let mut sink = self.lock();
        sink.write_all(&frame)?;
        sink.flush()
    }

    fn send(&self, body: &str) {
        if let Err(e) = self.write_frame(body) {
            // The peer is gone; the reader sees EOF and shuts the helper down.
            tracing::warn!(error = %e, "failed to write frame");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Sink> {
        // A panic mid-write cannot leave a partial frame behind: the whole
        // frame goes out in one `write_all`.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Shared in-memory byte buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink(Arc<Mutex<Vec<u8>>>);

impl MemorySink {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(|p| p.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Complete frames written so far.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::thread;

    #[test]
    fn frames_end_with_exactly_one_newline() {
        let (writer, sink) = FrameWriter::memory();
        writer.respond("1", &Reply::Ack);
        writer.emit(&Event::menu_click("quit"));
        assert_eq!(
            sink.contents(),
            "{\"type\":\"response\",\"id\":\"1\",\"result\":\"true\"}\n\
             {\"type\":\"menu_click\",\"data\":{\"menuId\":\"quit\"}}\n"
        );
    }

    #[test]
    fn concurrent_frames_do_not_interleave() {
        let (writer, sink) = FrameWriter::memory();
        let big = "x".repeat(4096);

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let writer = writer.clone();
                let big = big.clone();
                thread::spawn(move || {
                    for i in 0..50 {
                        writer.respond(&format!("{t}-{i}"), &Reply::Text(big.clone()));
                        writer.emit(&Event::context_menu_click(format!("{t}/{i}")));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 8 * 50 * 2);
        for line in lines {
            let parsed: Value = serde_json::from_str(&line).expect("whole frame");
            assert!(parsed["type"].is_string());
        }
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_surface_from_write_frame_only() {
        let writer = FrameWriter::new(Broken);
        assert!(writer.write_frame("{}").is_err());
        // respond/emit swallow the error after logging it.
        writer.respond("1", &Reply::Ack);
    }
}
