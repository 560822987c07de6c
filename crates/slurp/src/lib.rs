//! slurp: EDDN relay listener
//!
//! Wires the relay [`Listener`](slurp_listener::Listener) to the dock and
//! stock summaries: decoded frames are dispatched by schema, summaries are
//! saved on their countdowns and a top-trades report is printed as markets
//! arrive.

pub mod app;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod stats;

pub use app::App;
pub use config::Config;
pub use error::ConfigError;
pub use metrics::Metrics;
