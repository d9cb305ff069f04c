//! Per-invocation context handed to the copy phases

use pkgrecipe_events::{EventEmitter, EventSender};

/// Where a phase reports its progress
///
/// A silent context drops every event; hosts that want progress pass the
/// sending half of an event channel.
#[derive(Debug, Clone, Default)]
pub struct PhaseContext {
    event_sender: Option<EventSender>,
    correlation_id: Option<String>,
}

impl PhaseContext {
    /// Context that reports nowhere
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(event_sender: EventSender) -> Self {
        Self {
            event_sender: Some(event_sender),
            correlation_id: None,
        }
    }

    /// Stamp every emitted event with `id`
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }
}

impl EventEmitter for PhaseContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }

    fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
