//! In-process frame source backed by a tokio channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::error::ListenerError;
use crate::source::FeedSource;

/// Frames pushed into the paired sender come out of [`FeedSource::recv`].
/// Dropping every sender closes the feed.
pub struct ChannelSource {
    rx: mpsc::Receiver<Bytes>,
    connects: Arc<AtomicUsize>,
}

impl ChannelSource {
    pub fn new(capacity: usize) -> (Self, mpsc::Sender<Bytes>) {
        let (tx, rx) = mpsc::channel(capacity);
        (
            Self {
                rx,
                connects: Arc::new(AtomicUsize::new(0)),
            },
            tx,
        )
    }

    /// Number of times `connect` has been called
    pub fn connect_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.connects)
    }
}

#[async_trait]
impl FeedSource for ChannelSource {
    async fn connect(&mut self) -> Result<(), ListenerError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn recv(&mut self) -> Result<Bytes, ListenerError> {
        self.rx.recv().await.ok_or(ListenerError::Closed)
    }

    async fn disconnect(&mut self) {}
}
