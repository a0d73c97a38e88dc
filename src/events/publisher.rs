use super::sink::{EventSink, LogEvent};
use crate::config::EventsConfig;
use tokio::sync::broadcast;

/// Broadcast publisher for lifecycle events
///
/// Implements [`EventSink`], so it can be injected anywhere a sink is expected and
/// observed through [`EventPublisher::subscribe`].
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<LogEvent>,
}

impl EventPublisher {
    /// Create a new event publisher with the specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Create a publisher sized from configuration
    pub fn from_config(config: &EventsConfig) -> Self {
        Self::new(config.channel_capacity)
    }

    /// Publish an event to every current subscriber
    ///
    /// Returns the number of subscribers that received it; publishing with nobody
    /// listening is not an error.
    pub fn publish(&self, event: LogEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<LogEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl EventSink for EventPublisher {
    fn log_event(&self, event: LogEvent) {
        self.publish(event);
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(crate::constants::defaults::EVENT_CHANNEL_CAPACITY)
    }
}
