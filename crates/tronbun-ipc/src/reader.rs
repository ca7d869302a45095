//! Stdin reader loop.
//!
//! Runs on its own thread. Each non-empty line is parsed here, so malformed
//! frames are answered without a round trip through the main loop; good
//! requests are dispatched and waited on one at a time.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tronbun_config::IpcConfig;

use crate::codec::{Limits, Reply, Request, UNKNOWN_ID};
use crate::dispatch::{DispatchOutcome, Dispatcher, MainLoop};
use crate::errors::{FrameError, FrameRejection};
use crate::framing::{read_frame, Frame};
use crate::writer::FrameWriter;

const TIMEOUT_ERROR: &str = "Command timeout";

pub struct ReaderLoop<L> {
    dispatcher: Dispatcher<L>,
    writer: FrameWriter,
    limits: Limits,
    shutdown: Arc<AtomicBool>,
}

impl<L: MainLoop> ReaderLoop<L> {
    pub fn new(main_loop: L, writer: FrameWriter, config: &IpcConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(main_loop, config.dispatch_timeout()),
            writer,
            limits: Limits::from_config(config),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set once the reader has stopped and asked the main loop to exit.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Read frames until EOF, a read error, or the main loop going away.
    pub fn run<R: BufRead>(self, mut input: R) {
        let max_line = self.limits.max_line();
        loop {
            let frame = match read_frame(&mut input, max_line) {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!("stdin closed");
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stdin read failed");
                    break;
                }
            };

            let line = match frame {
                Frame::Line(line) if line.is_empty() => continue,
                Frame::Line(line) => line,
                Frame::Oversized(len) => {
                    tracing::warn!(len, "frame exceeds command limit");
                    self.reject(&FrameError::new(FrameRejection::LineTooLong));
                    continue;
                }
                Frame::InvalidUtf8 => {
                    self.reject(&FrameError::new(FrameRejection::InvalidUtf8));
                    continue;
                }
            };

            if !self.handle_line(&line) {
                tracing::info!("main loop closed, reader stopping");
                break;
            }
        }

        self.shutdown.store(true, Ordering::SeqCst);
        self.dispatcher.main_loop().shutdown();
    }

    /// Returns `false` once the main loop is gone.
    fn handle_line(&self, line: &str) -> bool {
        let request = match Request::parse(line, &self.limits) {
            Ok(request) => request,
            Err(e) => {
                self.reject(&e);
                return true;
            }
        };

        tracing::debug!(id = %request.id, method = %request.method, len = line.len(), "dispatching");
        match self.dispatcher.dispatch(request) {
            DispatchOutcome::Completed => true,
            DispatchOutcome::TimedOut => {
                tracing::warn!("command timed out");
                self.writer
                    .respond(UNKNOWN_ID, &Reply::Error(TIMEOUT_ERROR.to_string()));
                true
            }
            DispatchOutcome::Closed => false,
        }
    }

    fn reject(&self, err: &FrameError) {
        tracing::warn!(reason = ?err.reason, id = ?err.id, "rejected frame");
        let id = err.id.as_deref().unwrap_or(UNKNOWN_ID);
        self.writer.respond(id, &Reply::error(err));
    }
}

/// Start the reader on a named background thread, reading process stdin.
pub fn spawn_reader<L: MainLoop + 'static>(reader: ReaderLoop<L>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("tronbun-stdin".into())
        .spawn(move || reader.run(io::stdin().lock()))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::Broker;
    use crate::commands::{CommandTarget, WebviewOps};
    use crate::commands::{SizeHint, VersionInfo};
    use crate::dispatch::DispatchRecord;
    use crate::errors::{DispatchError, ToolkitError};
    use serde_json::Value;
    use std::io::Cursor;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::Duration;

    // =========================================================================
    // Fake main loop: a worker thread that executes records in order.
    // =========================================================================

    enum Msg {
        Run(DispatchRecord),
        Stop,
    }

    struct ThreadLoop {
        tx: Mutex<mpsc::Sender<Msg>>,
    }

    impl MainLoop for ThreadLoop {
        fn enqueue(&self, record: DispatchRecord) -> Result<(), DispatchError> {
            self.tx
                .lock()
                .unwrap()
                .send(Msg::Run(record))
                .map_err(|_| DispatchError::LoopClosed)
        }

        fn shutdown(&self) {
            let _ = self.tx.lock().unwrap().send(Msg::Stop);
        }
    }

    #[derive(Default)]
    struct Page {
        title: String,
        slow: Duration,
    }

    impl WebviewOps for Page {
        fn set_title(&mut self, title: &str) -> Result<(), ToolkitError> {
            std::thread::sleep(self.slow);
            self.title = title.to_string();
            Ok(())
        }
        fn set_size(&mut self, _: i32, _: i32, _: SizeHint) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn navigate(&mut self, _: &str) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn set_html(&mut self, _: &str) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn eval(&mut self, _: &str) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn init(&mut self, _: &str) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn bind(&mut self, _: &str) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn unbind(&mut self, _: &str) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn terminate(&mut self) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn native_window(&self) -> Result<String, ToolkitError> {
            Ok("0x1".into())
        }
        fn version(&self) -> VersionInfo {
            VersionInfo {
                major: 0,
                minor: 0,
                patch: 0,
                number: "0.0.0".into(),
                engine: "fake".into(),
                limits: Limits::default().into(),
            }
        }
        fn resolve_bridge(&mut self, _: &str, _: &Value, _: Option<&str>) -> Result<(), ToolkitError> {
            Ok(())
        }
    }

    impl CommandTarget for Page {
        fn webview(&mut self) -> Option<&mut dyn WebviewOps> {
            Some(self)
        }
    }

    /// Feed `input` through a reader backed by a worker "main loop" and
    /// return every frame written, once the worker has stopped.
    fn run(input: &str, config: IpcConfig, slow: Duration) -> Vec<Value> {
        let (writer, sink) = FrameWriter::memory();
        let (tx, rx) = mpsc::channel();
        let broker = Broker::new(writer.clone(), Limits::from_config(&config));

        let worker = std::thread::spawn(move || {
            let mut page = Page {
                slow,
                ..Default::default()
            };
            while let Ok(Msg::Run(record)) = rx.recv() {
                broker.execute(record, &mut page);
            }
        });

        let reader = ReaderLoop::new(ThreadLoop { tx: Mutex::new(tx) }, writer, &config);
        let flag = reader.shutdown_flag();
        reader.run(Cursor::new(input.as_bytes().to_vec()));
        assert!(flag.load(Ordering::SeqCst));
        worker.join().unwrap();

        sink.lines()
            .iter()
            .map(|l| serde_json::from_str(l).expect("frame is json"))
            .collect()
    }

    fn fast(input: &str) -> Vec<Value> {
        run(input, IpcConfig::default(), Duration::ZERO)
    }

    #[test]
    fn title_set_scenario() {
        let out = fast("{\"method\":\"set_title\",\"id\":\"1\",\"params\":{\"title\":\"Hello\"}}\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["type"], "response");
        assert_eq!(out[0]["id"], "1");
        assert_eq!(out[0]["result"], "true");
    }

    #[test]
    fn unknown_method_scenario() {
        let out = fast("{\"method\":\"nope\",\"id\":\"x\",\"params\":{}}\n");
        assert_eq!(out[0]["id"], "x");
        assert_eq!(out[0]["error"], "Unknown method");
    }

    #[test]
    fn malformed_frames_use_unknown_id_unless_recoverable() {
        let out = fast("garbage\n{\"id\":\"7\"}\n");
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], "unknown");
        assert_eq!(out[0]["error"], "Invalid command format");
        assert_eq!(out[1]["id"], "7");
        assert_eq!(out[1]["error"], "Invalid command format");
    }

    #[test]
    fn empty_lines_are_ignored() {
        let out = fast("\n\n{\"method\":\"get_window\",\"id\":\"w\"}\n\n");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["result"], "0x1");
    }

    #[test]
    fn every_request_gets_one_response_in_order() {
        let input: String = (0..20)
            .map(|i| format!("{{\"method\":\"set_title\",\"id\":\"{i}\",\"params\":{{\"title\":\"t{i}\"}}}}\n"))
            .collect();
        let out = fast(&input);
        let ids: Vec<_> = out.iter().map(|f| f["id"].as_str().unwrap().to_string()).collect();
        let expected: Vec<_> = (0..20).map(|i| i.to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn oversized_line_is_rejected_and_reading_continues() {
        let config = IpcConfig {
            max_command_length: 128,
            ..IpcConfig::default()
        };
        let input = format!(
            "{{\"method\":\"eval\",\"id\":\"big\",\"params\":{{\"js\":\"{}\"}}}}\n{{\"method\":\"get_window\",\"id\":\"ok\"}}\n",
            "x".repeat(200)
        );
        let out = run(&input, config, Duration::ZERO);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], "unknown");
        assert_eq!(out[0]["error"], "Invalid command format");
        assert_eq!(out[1]["id"], "ok");
    }

    /// An `eval` frame exactly `len` bytes long, newline excluded.
    fn eval_line(id: &str, len: usize) -> String {
        let head = format!("{{\"method\":\"eval\",\"id\":\"{id}\",\"params\":{{\"js\":\"");
        let tail = "\"}}";
        let pad = len - head.len() - tail.len();
        let line = format!("{head}{}{tail}", "x".repeat(pad));
        assert_eq!(line.len(), len);
        line
    }

    #[test]
    fn default_command_limit_boundary() {
        let limit = IpcConfig::default().max_command_length;
        let input = format!(
            "{}\n{}\n",
            eval_line("fits", limit - 1),
            eval_line("over", limit)
        );
        let out = fast(&input);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], "fits");
        assert_eq!(out[0]["result"], "true");
        assert_eq!(out[1]["id"], "unknown");
        assert_eq!(out[1]["error"], "Invalid command format");
    }

    #[test]
    fn slow_handler_times_out_then_responds_late() {
        let config = IpcConfig {
            dispatch_timeout_ms: 20,
            ..IpcConfig::default()
        };
        let out = run(
            "{\"method\":\"set_title\",\"id\":\"slow\",\"params\":{\"title\":\"x\"}}\n",
            config,
            Duration::from_millis(200),
        );
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["id"], "unknown");
        assert_eq!(out[0]["error"], "Command timeout");
        assert_eq!(out[1]["id"], "slow");
        assert_eq!(out[1]["result"], "true");
    }

    #[test]
    fn eof_requests_shutdown() {
        let out = fast("");
        assert!(out.is_empty());
    }

    #[test]
    fn closed_main_loop_stops_reader() {
        struct Gone;
        impl MainLoop for Gone {
            fn enqueue(&self, _: DispatchRecord) -> Result<(), DispatchError> {
                Err(DispatchError::LoopClosed)
            }
            fn shutdown(&self) {}
        }

        let (writer, sink) = FrameWriter::memory();
        let reader = ReaderLoop::new(Gone, writer, &IpcConfig::default());
        reader.run(Cursor::new(
            b"{\"method\":\"a\",\"id\":\"1\"}\n{\"method\":\"b\",\"id\":\"2\"}\n".to_vec(),
        ));
        assert!(sink.lines().is_empty());
    }
}
