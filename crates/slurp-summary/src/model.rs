//! Summary data model and its persisted JSON shape.

use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use slurp_schemas::{format_timestamp, CommodityObservation, JournalMessage};

use crate::ranking::Commodity;

/// Directory key for a dock: `"<system>/<station>"`.
pub fn station_key(system: &str, station: &str) -> String {
    format!("{}/{}", system, station)
}

/// Straight-line distance between two galactic positions.
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Latest known facts about a dock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(default)]
    pub market_id: Option<u64>,
    pub star_pos: [f64; 3],
    pub station_name: String,
    #[serde(default)]
    pub station_type: Option<String>,
    pub system_address: u64,
    pub system_name: String,
    pub timestamp: String,
    #[serde(default)]
    pub dist_from_star_ls: Option<f64>,
    #[serde(default)]
    pub station_allegiance: Option<String>,
}

impl Station {
    pub fn from_journal(message: &JournalMessage) -> Self {
        Self {
            market_id: message.market_id,
            star_pos: message.star_pos,
            station_name: message.station_name.clone().unwrap_or_default(),
            station_type: message.station_type.clone(),
            system_address: message.system_address,
            system_name: message.system_name.clone(),
            timestamp: format_timestamp(&message.timestamp),
            dist_from_star_ls: message.dist_from_star_ls,
            station_allegiance: message.station_allegiance.clone(),
        }
    }

    pub fn key(&self) -> String {
        station_key(&self.system_name, &self.station_name)
    }

    /// An empty type string counts as unknown.
    pub fn has_type(&self) -> bool {
        self.station_type.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// One commodity's trade terms at one station, enriched with the station's
/// directory entry as it was when the market message arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSnapshot {
    pub system_name: String,
    pub station_name: String,
    pub timestamp: String,
    pub buy_price: i64,
    pub stock: i64,
    pub sell_price: i64,
    pub demand: i64,
    #[serde(default)]
    pub market_id: Option<u64>,
    #[serde(default)]
    pub star_pos: Option<[f64; 3]>,
    #[serde(default)]
    pub station_type: Option<String>,
    #[serde(default)]
    pub system_address: Option<u64>,
    #[serde(default)]
    pub dist_from_star_ls: Option<f64>,
    #[serde(default)]
    pub station_allegiance: Option<String>,
}

impl CostSnapshot {
    pub fn observed_at(station: &Station, observation: &CommodityObservation, timestamp: &str) -> Self {
        Self {
            system_name: station.system_name.clone(),
            station_name: station.station_name.clone(),
            timestamp: timestamp.to_string(),
            buy_price: observation.buy_price,
            stock: observation.stock,
            sell_price: observation.sell_price,
            demand: observation.demand,
            market_id: station.market_id,
            star_pos: Some(station.star_pos),
            station_type: station.station_type.clone(),
            system_address: Some(station.system_address),
            dist_from_star_ls: station.dist_from_star_ls,
            station_allegiance: station.station_allegiance.clone(),
        }
    }

    pub fn same_station(&self, other: &CostSnapshot) -> bool {
        self.system_name == other.system_name && self.station_name == other.station_name
    }

    /// Distance to another snapshot's station, when both positions are known.
    pub fn distance_to(&self, other: &CostSnapshot) -> Option<f64> {
        match (&self.star_pos, &other.star_pos) {
            (Some(a), Some(b)) => Some(distance(a, b)),
            _ => None,
        }
    }
}

/// Read-only access to the station directory.
pub trait StationLookup {
    fn station(&self, system: &str, station: &str) -> Option<&Station>;
}

/// Station directory, keyed by [`station_key`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DockSummary {
    #[serde(default)]
    pub stations: BTreeMap<String, Station>,
}

impl DockSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl StationLookup for DockSummary {
    fn station(&self, system: &str, station: &str) -> Option<&Station> {
        self.stations.get(&station_key(system, station))
    }
}

/// Best-price rankings for every commodity seen so far.
///
/// Keyed by lowercase commodity name; the map is both the storage and the
/// lookup index. Persisted as a `commodities` list in key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockSummary {
    commodities: BTreeMap<String, Commodity>,
}

impl StockSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commodities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commodities.is_empty()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Commodity> {
        self.commodities.get(&name.to_lowercase())
    }

    /// Case-insensitive lookup, creating an empty entry (with `name` as the
    /// display name) on first sight.
    pub fn get_or_insert(&mut self, name: &str) -> &mut Commodity {
        self.commodities
            .entry(name.to_lowercase())
            .or_insert_with(|| Commodity::new(name))
    }

    /// Adds a commodity unless one with the same lowercase name exists.
    /// Returns whether it was added.
    pub fn insert(&mut self, commodity: Commodity) -> bool {
        let key = commodity.name.to_lowercase();
        if self.commodities.contains_key(&key) {
            return false;
        }
        self.commodities.insert(key, commodity);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &Commodity> {
        self.commodities.values()
    }
}

impl FromIterator<Commodity> for StockSummary {
    fn from_iter<I: IntoIterator<Item = Commodity>>(iter: I) -> Self {
        let mut summary = StockSummary::new();
        for commodity in iter {
            summary.insert(commodity);
        }
        summary
    }
}

impl Serialize for StockSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let commodities: Vec<&Commodity> = self.iter().collect();
        let mut state = serializer.serialize_struct("StockSummary", 1)?;
        state.serialize_field("commodities", &commodities)?;
        state.end()
    }
}

#[derive(Deserialize)]
struct StockSummaryFile {
    #[serde(default)]
    commodities: Vec<Commodity>,
}

impl<'de> Deserialize<'de> for StockSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let file = StockSummaryFile::deserialize(deserializer)?;
        Ok(file.commodities.into_iter().collect())
    }
}
