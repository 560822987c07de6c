//! Best buy/sell price maintenance from market snapshots.

use std::collections::HashSet;

use slurp_schemas::{format_timestamp, CommodityV3, MarketMessage};
use tracing::{debug, info, trace};

use crate::config::StockConfig;
use crate::countdown::SaveCountdown;
use crate::model::{distance, CostSnapshot, Station, StationLookup, StockSummary};
use crate::ranking::RankLimits;

/// Which stations' markets may enter the rankings.
#[derive(Debug, Clone)]
pub struct AcceptanceFilter {
    station_types: HashSet<String>,
    origin: [f64; 3],
    max_from_origin: f64,
    max_from_sun: f64,
}

impl AcceptanceFilter {
    pub fn new(config: &StockConfig) -> Self {
        Self {
            station_types: config.acceptable_station_types.iter().cloned().collect(),
            origin: config.origin_coords,
            max_from_origin: config.max_from_origin,
            max_from_sun: config.max_from_sun,
        }
    }

    /// Type must be allow-listed, the system close enough to the origin and
    /// the station's distance from its star known and within the ceiling.
    pub fn accepts(&self, station: &Station) -> bool {
        let type_ok = station
            .station_type
            .as_deref()
            .is_some_and(|t| self.station_types.contains(t));

        type_ok
            && distance(&station.star_pos, &self.origin) <= self.max_from_origin
            && station
                .dist_from_star_ls
                .is_some_and(|ls| ls <= self.max_from_sun)
    }
}

/// What happened to the observations of one market message.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub ranked: usize,
    pub unknown_station: usize,
    pub filtered: usize,
}

pub struct StockHandler {
    filter: AcceptanceFilter,
    limits: RankLimits,
    summary: StockSummary,
    countdown: SaveCountdown,
    last_outcome: UpdateOutcome,
}

impl StockHandler {
    pub fn new(config: &StockConfig, summary: StockSummary) -> Self {
        info!(
            commodities = summary.len(),
            autosave_wait = config.autosave_wait,
            max_best = config.max_best,
            max_from_origin = config.max_from_origin,
            max_from_sun = config.max_from_sun,
            "Stock handler ready"
        );
        Self {
            filter: AcceptanceFilter::new(config),
            limits: RankLimits {
                max_best: config.max_best,
                min_stock: config.min_stock,
                min_demand: config.min_demand,
            },
            summary,
            countdown: SaveCountdown::new(config.autosave_wait),
            last_outcome: UpdateOutcome::default(),
        }
    }

    /// Fold a market snapshot into the rankings. Returns true when the
    /// summary is due to be saved.
    pub fn update(&mut self, market: &CommodityV3, directory: &impl StationLookup) -> bool {
        self.last_outcome = self.apply(&market.message, directory);
        debug!(
            system = %market.message.system_name,
            station = %market.message.station_name,
            ranked = self.last_outcome.ranked,
            unknown_station = self.last_outcome.unknown_station,
            filtered = self.last_outcome.filtered,
            "Market snapshot applied"
        );
        self.countdown.tick()
    }

    fn apply(&mut self, message: &MarketMessage, directory: &impl StationLookup) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();
        let timestamp = format_timestamp(&message.timestamp);
        let station = directory.station(&message.system_name, &message.station_name);

        for observation in &message.commodities {
            let commodity = self.summary.get_or_insert(&observation.name);

            let Some(station) = station else {
                outcome.unknown_station += 1;
                continue;
            };
            if !self.filter.accepts(station) {
                outcome.filtered += 1;
                continue;
            }

            let snapshot = CostSnapshot::observed_at(station, observation, &timestamp);
            commodity.rank_buy(&snapshot, &self.limits);
            commodity.rank_sale(&snapshot, &self.limits);
            outcome.ranked += 1;
        }

        if station.is_none() {
            trace!(
                system = %message.system_name,
                station = %message.station_name,
                "Market for unknown station dropped"
            );
        }
        outcome
    }

    pub fn last_outcome(&self) -> UpdateOutcome {
        self.last_outcome
    }

    pub fn summary(&self) -> &StockSummary {
        &self.summary
    }

    pub fn into_summary(self) -> StockSummary {
        self.summary
    }
}
