//! Best-effort live push to subscribers.
//!
//! Every freshly ingested record is offered to the configured
//! [`PushTransport`] before it is windowed. Pushes are fire-and-forget:
//! a failed push is logged by the feed and never fails ingestion.

use parking_lot::RwLock;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

/// Error returned by a failed push.
#[derive(Debug, Error)]
#[error("push failed: {message}")]
pub struct PushError {
    /// Description of the failure.
    pub message: String,
}

impl PushError {
    /// Creates a push error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fans a formatted payload out to subscribed listeners, keyed by stream
/// name.
///
/// Implementations must not block the ingestion path; delivery is
/// best-effort and unacknowledged.
pub trait PushTransport: Send + Sync {
    /// Publishes a payload to the named stream.
    ///
    /// # Errors
    ///
    /// Returns a [`PushError`] when the payload could not be handed to
    /// the transport. The caller treats this as a logged warning, not a
    /// failure.
    fn publish(&self, stream: &str, payload: &str) -> Result<(), PushError>;
}

/// In-process channel-based push transport.
///
/// Subscribers receive each published payload on an `mpsc` channel.
/// Disconnected subscribers are dropped on the next publish.
#[derive(Debug, Default)]
pub struct ChannelPush {
    subscribers: RwLock<Vec<Sender<String>>>,
}

impl ChannelPush {
    /// Creates a push transport with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to all future publishes.
    pub fn subscribe(&self) -> Receiver<String> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.write().push(tx);
        rx
    }

    /// Returns the number of connected subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }
}

impl PushTransport for ChannelPush {
    fn publish(&self, _stream: &str, payload: &str) -> Result<(), PushError> {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|tx| tx.send(payload.to_owned()).is_ok());
        Ok(())
    }
}
