//! slurp-summary: incremental station and price summaries
//!
//! Two summaries are maintained from the EDDN stream:
//! - a station directory ([`DockSummary`]) fed by journal dock sightings
//! - per-commodity best buy/sell rankings ([`StockSummary`]) fed by market
//!   snapshots and filtered against the directory
//!
//! Both are owned by their handler, mutated from a single ingestion path and
//! persisted as whole JSON files.

pub mod config;
pub mod countdown;
pub mod dock;
pub mod error;
pub mod model;
pub mod ranking;
pub mod report;
pub mod stock;
pub mod storage;

pub use config::{CmdLineConfig, DockConfig, StockConfig};
pub use countdown::SaveCountdown;
pub use dock::DockHandler;
pub use error::SummaryError;
pub use model::{distance, station_key, CostSnapshot, DockSummary, Station, StationLookup, StockSummary};
pub use ranking::{Commodity, RankLimits};
pub use report::Report;
pub use stock::{AcceptanceFilter, StockHandler, UpdateOutcome};

pub type Result<T> = std::result::Result<T, SummaryError>;
