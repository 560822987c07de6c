use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListenerError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    #[error("receive failed: {0}")]
    Receive(String),
    #[error("not connected")]
    NotConnected,
    /// The source has no more frames and never will.
    #[error("feed closed")]
    Closed,
}
