//! Live EDDN relay over a ZeroMQ SUB socket.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};
use zeromq::{Socket, SocketRecv, SubSocket};

use crate::error::ListenerError;
use crate::source::FeedSource;

pub const DEFAULT_RELAY_URL: &str = "tcp://eddn.edcd.io:9500";

/// Subscribes to every topic on the relay. Each relay message is a single
/// zlib-compressed JSON frame.
pub struct ZmqRelay {
    url: String,
    socket: Option<SubSocket>,
}

impl ZmqRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            socket: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for ZmqRelay {
    fn default() -> Self {
        Self::new(DEFAULT_RELAY_URL)
    }
}

#[async_trait]
impl FeedSource for ZmqRelay {
    async fn connect(&mut self) -> Result<(), ListenerError> {
        self.disconnect().await;

        let mut socket = SubSocket::new();
        socket
            .connect(&self.url)
            .await
            .map_err(|e| ListenerError::ConnectionFailed(format!("{}: {}", self.url, e)))?;
        socket
            .subscribe("")
            .await
            .map_err(|e| ListenerError::ConnectionFailed(format!("subscribe: {}", e)))?;

        info!(url = %self.url, "Subscribed to relay");
        self.socket = Some(socket);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Bytes, ListenerError> {
        let socket = self.socket.as_mut().ok_or(ListenerError::NotConnected)?;
        let message = socket
            .recv()
            .await
            .map_err(|e| ListenerError::Receive(e.to_string()))?;
        message
            .get(0)
            .cloned()
            .ok_or_else(|| ListenerError::Receive("empty relay message".to_string()))
    }

    async fn disconnect(&mut self) {
        if let Some(socket) = self.socket.take() {
            for e in socket.close().await {
                debug!(error = %e, "Error while closing relay socket");
            }
            debug!(url = %self.url, "Relay socket closed");
        }
    }
}
