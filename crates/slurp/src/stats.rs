//! Counts of what the relay is sending.

use std::collections::BTreeMap;

use tracing::info;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FeedStats {
    pub by_schema: BTreeMap<String, u64>,
    pub by_journal_event: BTreeMap<String, u64>,
    pub decode_errors: u64,
}

impl FeedStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_schema(&mut self, schema_ref: &str) {
        *self.by_schema.entry(schema_ref.to_string()).or_insert(0) += 1;
    }

    pub fn record_journal_event(&mut self, event: &str) {
        *self.by_journal_event.entry(event.to_string()).or_insert(0) += 1;
    }

    pub fn record_decode_error(&mut self) {
        self.decode_errors += 1;
    }

    /// Frames seen, decodable or not
    pub fn total(&self) -> u64 {
        self.by_schema.values().sum::<u64>() + self.decode_errors
    }

    pub fn log(&self) {
        info!(
            total = self.total(),
            decode_errors = self.decode_errors,
            schemas = ?self.by_schema,
            journal_events = ?self.by_journal_event,
            "Feed statistics"
        );
    }
}
