use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("zlib inflate failed: {0}")]
    Inflate(#[source] std::io::Error),

    #[error("invalid JSON envelope: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("{schema} payload rejected: {source}")]
    Schema {
        schema: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
