//! Provision Event Port
//!
//! Observable interface for a provisioning run. Progress reporting, the
//! NDJSON stream and test recorders all plug in here.

use serde::Serialize;

use crate::domain::value_objects::{EnvironmentDescriptor, Profile};

/// Event emitted during a provisioning or TLS run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProvisionEvent {
    /// Run started
    Started {
        command: String,
        total_steps: usize,
    },

    /// Environment detected
    Detected {
        environment: EnvironmentDescriptor,
        branch: String,
    },

    /// Profile fixed for this run
    ProfileSelected { profile: Profile },

    /// A numbered step began
    StepStarted {
        index: usize,
        total: usize,
        title: String,
    },

    /// A numbered step finished
    StepFinished {
        index: usize,
        total: usize,
        title: String,
        ok: bool,
    },

    /// One attempt of a fallback cascade finished
    AttemptFinished {
        label: String,
        exit_code: i32,
        succeeded: bool,
    },

    /// Non-fatal problem worth surfacing
    Warning { message: String },

    /// TLS state machine moved
    TlsTransition { from: String, to: String },

    /// Run completed
    Completed { success: bool, summary_path: Option<String> },
}

/// Trait for receiving provision events
///
/// Implementations:
/// - `ConsoleEventSink`: `[i/n] title ... done` lines on stdout
/// - `JsonEventSink`: NDJSON event stream
/// - `NoopEventSink`: silent operation
pub trait ProvisionEventSink: Send + Sync {
    /// Handle a provision event
    fn on_event(&self, event: ProvisionEvent);

    /// Whether the sink wants per-attempt events
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl ProvisionEventSink for NoopEventSink {
    fn on_event(&self, _event: ProvisionEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingEventSink {
        events: Arc<Mutex<Vec<ProvisionEvent>>>,
    }

    impl ProvisionEventSink for RecordingEventSink {
        fn on_event(&self, event: ProvisionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingEventSink {
            events: events.clone(),
        };

        sink.on_event(ProvisionEvent::Started {
            command: "provision".into(),
            total_steps: 6,
        });
        sink.on_event(ProvisionEvent::Warning {
            message: "activation failed".into(),
        });

        assert_eq!(events.lock().unwrap().len(), 2);
    }

    #[test]
    fn events_serialize_with_tag() {
        let json = serde_json::to_string(&ProvisionEvent::StepStarted {
            index: 1,
            total: 6,
            title: "Detect environment".into(),
        })
        .unwrap();
        assert!(json.contains(r#""event":"step_started""#));
        assert!(json.contains(r#""title":"Detect environment""#));
    }

    #[test]
    fn noop_sink_wants_no_details() {
        assert!(!NoopEventSink.wants_detailed_events());
    }
}
