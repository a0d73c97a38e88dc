//! Event system: the injected logging capability and its broadcast implementation.

pub mod publisher;
pub mod sink;

pub use publisher::EventPublisher;
pub use sink::{EventKind, EventSink, LogEvent, TracingSink};
