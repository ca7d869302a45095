//! Main-thread side of request handling.

use crate::codec::{encode_response, Limits};
use crate::commands::{self, CommandTarget};
use crate::dispatch::DispatchRecord;
use crate::events::Event;
use crate::writer::FrameWriter;

/// Owned by the helper's main loop. Executes dispatched records and emits
/// GUI-callback events.
#[derive(Debug, Clone)]
pub struct Broker {
    writer: FrameWriter,
    limits: Limits,
}

impl Broker {
    pub fn new(writer: FrameWriter, limits: Limits) -> Self {
        Self { writer, limits }
    }

    pub fn writer(&self) -> &FrameWriter {
        &self.writer
    }

    /// Run one record against `target`, write its response, then release
    /// the waiting reader.
    pub fn execute(&self, record: DispatchRecord, target: &mut dyn CommandTarget) {
        let request = &record.request;
        tracing::debug!(id = %request.id, method = %request.method, "executing");

        let reply = commands::execute(request, target, &self.limits);
        if reply.is_error() {
            tracing::debug!(id = %request.id, method = %request.method, ?reply, "command failed");
        }
        let frame = encode_response(&request.id, &reply);
        if let Err(e) = self.writer.write_frame(&frame) {
            tracing::warn!(id = %request.id, error = %e, "failed to write response");
        }

        record.complete();
    }

    pub fn emit(&self, event: &Event) {
        self.writer.emit(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Request;
    use crate::commands::TrayOps;
    use crate::errors::ToolkitError;
    use crate::menu::MenuItem;
    use serde_json::{json, Value};

    #[derive(Default)]
    struct Tray {
        tooltip: String,
    }

    impl TrayOps for Tray {
        fn set_icon(&mut self, _: &str) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn set_tooltip(&mut self, tooltip: &str) -> Result<(), ToolkitError> {
            self.tooltip = tooltip.to_string();
            Ok(())
        }
        fn set_menu(&mut self, _: Vec<MenuItem>) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn show_notification(&mut self, _: &str, _: &str) -> Result<(), ToolkitError> {
            Ok(())
        }
        fn destroy(&mut self) -> Result<(), ToolkitError> {
            Ok(())
        }
    }

    impl CommandTarget for Tray {
        fn tray(&mut self) -> Option<&mut dyn TrayOps> {
            Some(self)
        }
    }

    fn record(method: &str, id: &str, params: Value) -> (DispatchRecord, std::sync::mpsc::Receiver<()>) {
        DispatchRecord::new(Request {
            method: method.into(),
            id: id.into(),
            params,
        })
    }

    #[test]
    fn writes_response_before_completing() {
        let (writer, sink) = FrameWriter::memory();
        let broker = Broker::new(writer, Limits::default());
        let mut tray = Tray::default();

        let (rec, done) = record("tray_set_tooltip", "t1", json!({"tooltip": "Hi"}));
        broker.execute(rec, &mut tray);

        assert!(done.try_recv().is_ok());
        assert_eq!(tray.tooltip, "Hi");
        assert_eq!(
            sink.lines(),
            vec![r#"{"type":"response","id":"t1","result":"true"}"#]
        );
    }

    #[test]
    fn menu_scenario() {
        let (writer, sink) = FrameWriter::memory();
        let broker = Broker::new(writer, Limits::default());
        let mut tray = Tray::default();

        let (rec, _done) = record(
            "tray_set_menu",
            "m1",
            json!({"menu": [{"id": "quit", "label": "Quit", "type": "normal"}]}),
        );
        broker.execute(rec, &mut tray);
        broker.emit(&Event::menu_click("quit"));

        assert_eq!(
            sink.lines(),
            vec![
                r#"{"type":"response","id":"m1","result":"true"}"#,
                r#"{"type":"menu_click","data":{"menuId":"quit"}}"#,
            ]
        );
    }

    #[test]
    fn unknown_method_response() {
        let (writer, sink) = FrameWriter::memory();
        let broker = Broker::new(writer, Limits::default());

        let (rec, _done) = record("nope", "x", json!({}));
        broker.execute(rec, &mut Tray::default());

        assert_eq!(
            sink.lines(),
            vec![r#"{"type":"response","id":"x","error":"Unknown method"}"#]
        );
    }
}
