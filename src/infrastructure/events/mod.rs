//! Event Sink Implementations
//!
//! - JsonEventSink: NDJSON output for automation
//! - ConsoleEventSink: `[i/n] title ... done` progress lines

mod console;
mod json;

pub use console::ConsoleEventSink;
pub use json::JsonEventSink;
