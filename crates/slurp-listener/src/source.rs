use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ListenerError;

/// Source of raw relay frames.
#[async_trait]
pub trait FeedSource: Send {
    /// Establish (or re-establish) the subscription
    async fn connect(&mut self) -> Result<(), ListenerError>;

    /// Wait for the next frame. [`ListenerError::Closed`] ends the listener;
    /// any other error triggers a reconnect.
    async fn recv(&mut self) -> Result<Bytes, ListenerError>;

    /// Drop the subscription. Safe to call when not connected.
    async fn disconnect(&mut self);
}
