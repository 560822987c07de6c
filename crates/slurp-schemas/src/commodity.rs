//! `https://eddn.edcd.io/schemas/commodity/3` market snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Header;

#[derive(Debug, Clone, Deserialize)]
pub struct CommodityV3 {
    pub header: Header,
    pub message: MarketMessage,
}

/// Every commodity traded at one station at one instant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketMessage {
    pub system_name: String,
    pub station_name: String,
    pub market_id: u64,
    pub timestamp: DateTime<Utc>,
    pub commodities: Vec<CommodityObservation>,
    pub economies: Option<Vec<Economy>>,
    pub prohibited: Option<Vec<String>>,
    pub horizons: Option<bool>,
    pub odyssey: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityObservation {
    pub name: String,
    pub mean_price: i64,
    /// 0 when the station does not sell this commodity
    pub buy_price: i64,
    pub stock: i64,
    pub stock_bracket: Bracket,
    /// 0 when the station does not buy this commodity
    pub sell_price: i64,
    pub demand: i64,
    pub demand_bracket: Bracket,
    pub status_flags: Option<Vec<String>>,
}

/// Supply/demand bracket: 0-3, or `""` when the game omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bracket {
    Level(u8),
    Blank(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Economy {
    pub name: String,
    pub proportion: f64,
}
