//! `https://eddn.edcd.io/schemas/journal/1` travel-log events

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::Header;

pub const DOCKED: &str = "Docked";
pub const LOCATION: &str = "Location";

#[derive(Debug, Clone, Deserialize)]
pub struct JournalV1 {
    pub header: Header,
    pub message: JournalMessage,
}

/// Journal event body. The game's field names are PascalCase with a few
/// exceptions (`event`, `timestamp`, `...LS`, `...ID`), so each is renamed
/// explicitly.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalMessage {
    pub event: String,
    #[serde(rename = "StarPos")]
    pub star_pos: [f64; 3],
    #[serde(rename = "StarSystem")]
    pub system_name: String,
    #[serde(rename = "SystemAddress")]
    pub system_address: u64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "DistFromStarLS")]
    pub dist_from_star_ls: Option<f64>,
    #[serde(rename = "MarketID")]
    pub market_id: Option<u64>,
    #[serde(rename = "StationAllegiance")]
    pub station_allegiance: Option<String>,
    #[serde(rename = "StationName")]
    pub station_name: Option<String>,
    #[serde(rename = "StationType")]
    pub station_type: Option<String>,
}

impl JournalMessage {
    /// Station name when this event places the commander at a dock.
    ///
    /// Only `Docked` and `Location` events with a non-empty station name
    /// count; a `Location` in open space carries no station.
    pub fn dock_sighting(&self) -> Option<&str> {
        match self.event.as_str() {
            DOCKED | LOCATION => self.station_name.as_deref().filter(|s| !s.is_empty()),
            _ => None,
        }
    }
}
