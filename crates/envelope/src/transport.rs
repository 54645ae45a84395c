//! The event transport port.

use async_trait::async_trait;

use crate::{Event, TransportError};

/// Delivers events to a downstream sink.
///
/// The source service depends only on this trait, so the concrete transport
/// can be swapped (HTTP today) or replaced by an in-memory fake in tests.
#[async_trait]
pub trait EventTransport: Send + Sync {
    /// Sends a single event. Returns once the sink has acknowledged it.
    async fn send(&self, event: &Event) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{Envelope, EventType, SourceUri};

    struct Recording(Arc<Mutex<Vec<Event>>>);

    #[async_trait]
    impl EventTransport for Recording {
        async fn send(&self, event: &Event) -> Result<(), TransportError> {
            self.0.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_transport_is_usable_as_trait_object() {
        let sent = Arc::new(Mutex::new(Vec::new()));
        let transport: Arc<dyn EventTransport> = Arc::new(Recording(sent.clone()));

        let event = Event::new(
            EventType::new("dev.example").unwrap(),
            SourceUri::new("https://example.com").unwrap(),
            Envelope::new("test", "payload"),
        );
        transport.send(&event).await.unwrap();

        assert_eq!(sent.lock().unwrap().as_slice(), &[event]);
    }
}
