//! Station directory maintenance from journal dock sightings.

use slurp_schemas::{JournalMessage, JournalV1};
use tracing::{debug, info};

use crate::config::DockConfig;
use crate::countdown::SaveCountdown;
use crate::model::{station_key, DockSummary, Station, StationLookup};

pub struct DockHandler {
    summary: DockSummary,
    countdown: SaveCountdown,
}

impl DockHandler {
    pub fn new(config: &DockConfig, summary: DockSummary) -> Self {
        info!(
            stations = summary.len(),
            autosave_wait = config.autosave_wait,
            "Dock handler ready"
        );
        Self {
            summary,
            countdown: SaveCountdown::new(config.autosave_wait),
        }
    }

    /// Record a dock sighting. Returns true when the directory is due to be
    /// saved.
    ///
    /// New docks are added. A dock whose type is still unknown is replaced
    /// with the newer details; a dock with a known type is left alone.
    pub fn update(&mut self, journal: &JournalV1) -> bool {
        let message = &journal.message;
        match message.station_name.as_deref().filter(|s| !s.is_empty()) {
            Some(station) => self.record_sighting(message, station),
            None => debug!(
                system = %message.system_name,
                event = %message.event,
                "Journal event without a station"
            ),
        }
        self.countdown.tick()
    }

    fn record_sighting(&mut self, message: &JournalMessage, station: &str) {
        let key = station_key(&message.system_name, station);
        match self.summary.stations.get(&key) {
            None => {
                debug!(key = %key, station_type = ?message.station_type, "New dock entry");
                self.summary.stations.insert(key, Station::from_journal(message));
            }
            Some(existing) if !existing.has_type() => {
                info!(
                    key = %key,
                    station_type = ?message.station_type,
                    "Updating partial dock entry"
                );
                self.summary.stations.insert(key, Station::from_journal(message));
            }
            Some(_) => {}
        }
    }

    pub fn station(&self, system: &str, station: &str) -> Option<&Station> {
        self.summary.station(system, station)
    }

    pub fn summary(&self) -> &DockSummary {
        &self.summary
    }

    pub fn into_summary(self) -> DockSummary {
        self.summary
    }
}

impl StationLookup for DockHandler {
    fn station(&self, system: &str, station: &str) -> Option<&Station> {
        self.summary.station(system, station)
    }
}
