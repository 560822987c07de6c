//! slurp-listener: EDDN relay subscription
//!
//! [`FeedSource`] abstracts where raw frames come from ([`ZmqRelay`] for the
//! live relay, [`ChannelSource`] for embedding and tests). [`Listener`] drives
//! a source: receive timeout, reconnect with backoff, cooperative stop.

pub mod channel;
pub mod error;
pub mod listener;
pub mod source;
pub mod zmq;

pub use channel::ChannelSource;
pub use error::ListenerError;
pub use listener::{Listener, ListenerConfig, ListenerStats};
pub use source::FeedSource;
pub use zmq::{ZmqRelay, DEFAULT_RELAY_URL};
