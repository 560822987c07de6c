//! Summary settings. Every field has a default so a config file only needs
//! the values it changes.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Station types whose markets are worth ranking. Planetary ports, Odyssey
/// settlements and fleet carriers are left out.
pub const DEFAULT_STATION_TYPES: [&str; 7] = [
    "Ocellus",
    "Coriolis",
    "Orbis",
    "Outpost",
    "AsteroidBase",
    "MegaShip",
    "Bernal",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StockConfig {
    pub file_path: PathBuf,
    /// Market messages between autosaves
    pub autosave_wait: u32,
    /// Entries kept per best-buy / best-sale list
    pub max_best: usize,
    pub min_stock: i64,
    pub min_demand: i64,
    pub acceptable_station_types: Vec<String>,
    /// Reference point for the distance ceiling (galactic coordinates, ly)
    pub origin_coords: [f64; 3],
    /// Light years from `origin_coords`
    pub max_from_origin: f64,
    /// Light seconds from the system's arrival star
    pub max_from_sun: f64,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("stockfile.json"),
            autosave_wait: 100,
            max_best: 5,
            min_stock: 500,
            min_demand: 1,
            acceptable_station_types: DEFAULT_STATION_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            origin_coords: [0.0, 0.0, 0.0],
            max_from_origin: 500.0,
            max_from_sun: 1000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    pub file_path: PathBuf,
    /// Journal dock sightings between autosaves
    pub autosave_wait: u32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from("dockfile.json"),
            autosave_wait: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmdLineConfig {
    /// Market messages between report printouts
    pub print_wait: u32,
    /// Marker appended to a station type in the report, keyed by the
    /// lowercase type name (e.g. `orbis: "*"`)
    pub station_highlights: HashMap<String, String>,
}

impl Default for CmdLineConfig {
    fn default() -> Self {
        Self {
            print_wait: 10,
            station_highlights: HashMap::new(),
        }
    }
}
