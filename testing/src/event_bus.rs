//! In-memory event publisher for tests.

use async_trait::async_trait;
use slotwise_core::event::SerializedEvent;
use slotwise_core::event_bus::{EventBusError, EventPublisher};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Records published events instead of talking to a broker.
///
/// Can be switched into a failing mode to exercise the fire-and-forget
/// handling in the orchestrator (a publish failure must not fail the
/// booking).
#[derive(Debug, Default)]
pub struct InMemoryEventPublisher {
    published: Mutex<Vec<(String, SerializedEvent)>>,
    fail: AtomicBool,
}

impl InMemoryEventPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent publish fail.
    pub fn fail_publishes(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Everything published so far as `(topic, event)` pairs.
    pub async fn published(&self) -> Vec<(String, SerializedEvent)> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, topic: &str, event: &SerializedEvent) -> Result<(), EventBusError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(EventBusError::PublishFailed {
                topic: topic.to_string(),
                reason: "publisher switched to failing mode".to_string(),
            });
        }
        self.published
            .lock()
            .await
            .push((topic.to_string(), event.clone()));
        Ok(())
    }
}
