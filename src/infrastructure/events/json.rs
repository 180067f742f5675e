//! JSON Event Sink
//!
//! Outputs provision events as NDJSON for automation.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{ProvisionEvent, ProvisionEventSink};

/// Event sink that writes one JSON object per line
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
        }
    }

    /// JSON sink over a custom writer (tests)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }
}

impl ProvisionEventSink for JsonEventSink {
    fn on_event(&self, event: ProvisionEvent) {
        let Ok(line) = serde_json::to_string(&event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}
