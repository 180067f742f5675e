//! Numbered step reporting
//!
//! The step counter is a value owned by one run, handed to each phase.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{NoopEventSink, ProvisionEvent, ProvisionEventSink};
use crate::error::ProvisionResult;

pub struct ProgressReporter {
    sink: Arc<dyn ProvisionEventSink>,
    index: usize,
    total: usize,
    current: Option<String>,
}

impl ProgressReporter {
    pub fn new(sink: Arc<dyn ProvisionEventSink>, total: usize) -> Self {
        Self {
            sink,
            index: 0,
            total,
            current: None,
        }
    }

    pub fn silent(total: usize) -> Self {
        Self::new(Arc::new(NoopEventSink), total)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn emit(&self, event: ProvisionEvent) {
        self.sink.on_event(event);
    }

    pub fn wants_detail(&self) -> bool {
        self.sink.wants_detailed_events()
    }

    /// Open the next numbered step
    pub fn begin(&mut self, title: &str) {
        self.index += 1;
        self.current = Some(title.to_string());
        info!("[{}/{}] {}", self.index, self.total, title);
        self.emit(ProvisionEvent::StepStarted {
            index: self.index,
            total: self.total,
            title: title.to_string(),
        });
    }

    /// Close the open step
    pub fn finish(&mut self, ok: bool) {
        let Some(title) = self.current.take() else {
            return;
        };
        if ok {
            info!("[{}/{}] {} done", self.index, self.total, title);
        } else {
            warn!("[{}/{}] {} did not complete", self.index, self.total, title);
        }
        self.emit(ProvisionEvent::StepFinished {
            index: self.index,
            total: self.total,
            title,
            ok,
        });
    }

    /// Run `f` as one numbered step; an error closes the step as failed
    pub fn step<T>(
        &mut self,
        title: &str,
        f: impl FnOnce(&mut Self) -> ProvisionResult<T>,
    ) -> ProvisionResult<T> {
        self.begin(title);
        let result = f(self);
        self.finish(result.is_ok());
        result
    }

    /// Surface a non-fatal problem
    pub fn warn(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.emit(ProvisionEvent::Warning { message });
    }
}
