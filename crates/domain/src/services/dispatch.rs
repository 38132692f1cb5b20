//! Message dispatch abstraction.
//!
//! Reminder notifications leave the service through this seam. Production
//! wires a chat webhook behind it; tests and local development use the
//! recording mock.

use std::sync::Mutex;

/// Outbound delivery of a rendered message.
#[async_trait::async_trait]
pub trait MessageDispatch: Send + Sync {
    /// Deliver one message. The text is final; dispatchers never rewrite it.
    async fn post_message(&self, text: &str) -> anyhow::Result<()>;
}

/// Mock dispatcher for development and testing.
///
/// Records every message instead of sending it.
#[derive(Debug, Default)]
pub struct MockMessageDispatch {
    sent: Mutex<Vec<String>>,
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockMessageDispatch {
    /// Create a new mock dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock dispatcher that simulates failures.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Messages delivered so far, in order.
    pub fn sent_messages(&self) -> Vec<String> {
        self.sent.lock().expect("dispatch mock lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl MessageDispatch for MockMessageDispatch {
    async fn post_message(&self, text: &str) -> anyhow::Result<()> {
        if self.simulate_failure {
            tracing::warn!("Mock message dispatch simulating failure");
            anyhow::bail!("simulated dispatch failure");
        }

        tracing::info!(chars = text.len(), "Mock: Would post message");
        self.sent
            .lock()
            .expect("dispatch mock lock poisoned")
            .push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_dispatch_records_messages() {
        let dispatch = MockMessageDispatch::new();

        dispatch.post_message("first").await.unwrap();
        dispatch.post_message("second").await.unwrap();

        assert_eq!(dispatch.sent_messages(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_mock_dispatch_failure_records_nothing() {
        let dispatch = MockMessageDispatch::failing();

        assert!(dispatch.post_message("lost").await.is_err());
        assert!(dispatch.sent_messages().is_empty());
    }
}
