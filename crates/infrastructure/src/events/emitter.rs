use sinkhole_application::ports::EventSink;
use std::sync::Arc;
use tracing::{debug, enabled, Level};

/// Cheap, cloneable handle for engine events.
///
/// Every event is mirrored to `tracing` at debug level. With no sink and
/// debug disabled, `emit_with` never builds the message.
#[derive(Clone, Default)]
pub struct EventEmitter {
    sink: Option<Arc<dyn EventSink>>,
}

impl EventEmitter {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn emit(&self, message: &str) {
        debug!(target: "sinkhole::events", "{}", message);
        if let Some(sink) = &self.sink {
            sink.emit(message);
        }
    }

    /// Lazily formatted variant for the per-query path.
    #[inline]
    pub fn emit_with<F>(&self, build: F)
    where
        F: FnOnce() -> String,
    {
        if self.sink.is_none() && !enabled!(target: "sinkhole::events", Level::DEBUG) {
            return;
        }
        self.emit(&build());
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
