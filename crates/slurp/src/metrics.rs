use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

pub const LABEL_SCHEMA: &str = "schema";
pub const LABEL_SUMMARY: &str = "summary";

pub const SUMMARY_DOCK: &str = "dock";
pub const SUMMARY_STOCK: &str = "stock";

pub struct Metrics {
    pub registry: Registry,
    pub frames_received: IntCounterVec,
    pub decode_errors: IntCounter,
    pub saves: IntCounterVec,
    pub save_failures: IntCounterVec,
    pub known_stations: IntGauge,
    pub tracked_commodities: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let frames_received = IntCounterVec::new(
            Opts::new("slurp_frames_received_total", "Relay frames decoded, by schema"),
            &[LABEL_SCHEMA],
        )?;
        let decode_errors = IntCounter::new(
            "slurp_decode_errors_total",
            "Relay frames that could not be inflated or parsed",
        )?;
        let saves = IntCounterVec::new(
            Opts::new("slurp_summary_saves_total", "Successful summary saves"),
            &[LABEL_SUMMARY],
        )?;
        let save_failures = IntCounterVec::new(
            Opts::new("slurp_summary_save_failures_total", "Failed summary saves"),
            &[LABEL_SUMMARY],
        )?;
        let known_stations =
            IntGauge::new("slurp_known_stations", "Stations in the dock directory")?;
        let tracked_commodities =
            IntGauge::new("slurp_tracked_commodities", "Commodities in the stock summary")?;

        registry.register(Box::new(frames_received.clone()))?;
        registry.register(Box::new(decode_errors.clone()))?;
        registry.register(Box::new(saves.clone()))?;
        registry.register(Box::new(save_failures.clone()))?;
        registry.register(Box::new(known_stations.clone()))?;
        registry.register(Box::new(tracked_commodities.clone()))?;

        Ok(Self {
            registry,
            frames_received,
            decode_errors,
            saves,
            save_failures,
            known_stations,
            tracked_commodities,
        })
    }

    /// Prometheus text exposition of every registered metric.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
