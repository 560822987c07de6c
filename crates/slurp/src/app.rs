//! Frame dispatch: decoded relay messages into the summaries.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use slurp_schemas::{decode, CommodityV3, FeedMessage, JournalV1};
use slurp_summary::storage::{load_docks, load_stock, save_docks, save_stock};
use slurp_summary::{DockHandler, DockSummary, Report, StockHandler, StockSummary, SummaryError};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::metrics::{Metrics, SUMMARY_DOCK, SUMMARY_STOCK};
use crate::stats::FeedStats;

/// Frames between feed statistics log lines
const STATS_LOG_EVERY: u64 = 1000;

/// Owns both summaries and everything that reacts to a frame. Reports are
/// written to `out`.
pub struct App<W: Write> {
    docks: DockHandler,
    stock: StockHandler,
    report: Report,
    stats: FeedStats,
    metrics: Arc<Metrics>,
    dock_path: PathBuf,
    stock_path: PathBuf,
    print_wait: u32,
    markets_seen: u64,
    out: W,
}

impl<W: Write> App<W> {
    /// Load both summaries from the configured files (missing files start
    /// empty) and build the handlers.
    pub fn load(config: &Config, metrics: Arc<Metrics>, out: W) -> Result<Self, SummaryError> {
        let docks = load_docks(&config.dock.file_path)?;
        let stock = load_stock(&config.stock.file_path)?;
        Ok(Self::new(config, docks, stock, metrics, out))
    }

    pub fn new(
        config: &Config,
        docks: DockSummary,
        stock: StockSummary,
        metrics: Arc<Metrics>,
        out: W,
    ) -> Self {
        let app = Self {
            docks: DockHandler::new(&config.dock, docks),
            stock: StockHandler::new(&config.stock, stock),
            report: Report::new(&config.cmd_line),
            stats: FeedStats::new(),
            metrics,
            dock_path: config.dock.file_path.clone(),
            stock_path: config.stock.file_path.clone(),
            print_wait: config.cmd_line.print_wait,
            markets_seen: 0,
            out,
        };
        app.update_gauges();
        app
    }

    /// Decode and dispatch one raw relay frame. Undecodable frames are
    /// logged and counted, never fatal.
    pub fn handle_frame(&mut self, raw: &[u8]) {
        match decode(raw) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                warn!(error = %e, bytes = raw.len(), "Dropping undecodable frame");
                self.stats.record_decode_error();
                self.metrics.decode_errors.inc();
            }
        }

        if self.stats.total() % STATS_LOG_EVERY == 0 {
            self.stats.log();
        }
    }

    pub fn handle_message(&mut self, message: FeedMessage) {
        let schema_ref = message.schema_ref().to_string();
        self.stats.record_schema(&schema_ref);
        self.metrics
            .frames_received
            .with_label_values(&[schema_ref.as_str()])
            .inc();

        match message {
            FeedMessage::Commodity(market) => self.on_market(&market),
            FeedMessage::Journal(journal) => self.on_journal(&journal),
            FeedMessage::Other { schema_ref } => {
                debug!(schema = %schema_ref, "Ignoring schema");
            }
        }
    }

    fn on_market(&mut self, market: &CommodityV3) {
        info!(
            uploader = %market.header.uploader_id,
            system = %market.message.system_name,
            station = %market.message.station_name,
            commodities = market.message.commodities.len(),
            "Market update"
        );

        if self.stock.update(market, &self.docks) {
            self.save_stock();
        }
        self.update_gauges();

        self.markets_seen += 1;
        if self.print_wait > 0 && self.markets_seen % u64::from(self.print_wait) == 0 {
            self.print_report();
        }
    }

    fn on_journal(&mut self, journal: &JournalV1) {
        let message = &journal.message;
        self.stats.record_journal_event(&message.event);

        let Some(station) = message.dock_sighting() else {
            return;
        };
        info!(
            uploader = %journal.header.uploader_id,
            system = %message.system_name,
            station = %station,
            station_type = message.station_type.as_deref().unwrap_or("?"),
            event = %message.event,
            "Dock sighting"
        );

        if self.docks.update(journal) {
            self.save_docks();
        }
        self.update_gauges();
    }

    fn print_report(&mut self) {
        let text = self.report.render_top_trades(self.stock.summary(), Utc::now());
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write report");
        }
    }

    /// Returns whether the save succeeded. A failed save keeps the in-memory
    /// summary; the next countdown signal retries.
    pub fn save_stock(&mut self) -> bool {
        match save_stock(&self.stock_path, self.stock.summary()) {
            Ok(()) => {
                self.metrics.saves.with_label_values(&[SUMMARY_STOCK]).inc();
                true
            }
            Err(e) => {
                error!(error = %e, path = %self.stock_path.display(), "Failed to save stock summary");
                self.metrics.save_failures.with_label_values(&[SUMMARY_STOCK]).inc();
                false
            }
        }
    }

    /// See [`App::save_stock`].
    pub fn save_docks(&mut self) -> bool {
        match save_docks(&self.dock_path, self.docks.summary()) {
            Ok(()) => {
                self.metrics.saves.with_label_values(&[SUMMARY_DOCK]).inc();
                true
            }
            Err(e) => {
                error!(error = %e, path = %self.dock_path.display(), "Failed to save dock summary");
                self.metrics.save_failures.with_label_values(&[SUMMARY_DOCK]).inc();
                false
            }
        }
    }

    /// Final save of both summaries and a last statistics line.
    pub fn shutdown(&mut self) {
        let docks_saved = self.save_docks();
        let stock_saved = self.save_stock();
        self.stats.log();
        info!(docks_saved, stock_saved, "Summaries flushed");
    }

    fn update_gauges(&self) {
        self.metrics
            .known_stations
            .set(self.docks.summary().len() as i64);
        self.metrics
            .tracked_commodities
            .set(self.stock.summary().len() as i64);
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }

    pub fn docks(&self) -> &DockHandler {
        &self.docks
    }

    pub fn stock(&self) -> &StockHandler {
        &self.stock
    }

    pub fn output(&self) -> &W {
        &self.out
    }
}
