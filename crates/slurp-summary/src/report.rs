//! Plain-text digest of the most profitable trades in the summary.

use std::collections::HashMap;
use std::fmt::{self, Write};

use chrono::{DateTime, Duration, Utc};

use crate::config::CmdLineConfig;
use crate::model::{CostSnapshot, StockSummary};
use crate::ranking::Commodity;

/// Commodities shown per report
pub const TOP_TRADES: usize = 5;

/// Step used to separate equal spreads
const SPREAD_NUDGE: f64 = 0.001;

/// Ranks commodities by `best sale - best buy`, highest first.
///
/// Equal spreads are made unique by nudging later ones down by
/// [`SPREAD_NUDGE`], so ties fall in summary iteration order.
pub fn top_trades(summary: &StockSummary) -> Vec<(f64, &Commodity)> {
    let mut trades: Vec<(f64, &Commodity)> = Vec::new();
    for commodity in summary.iter() {
        let (Some(buy), Some(sale)) = (commodity.best_buys.first(), commodity.best_sales.first())
        else {
            continue;
        };
        let mut spread = (sale.sell_price - buy.buy_price) as f64;
        while trades.iter().any(|(taken, _)| *taken == spread) {
            spread -= SPREAD_NUDGE;
        }
        trades.push((spread, commodity));
    }

    trades.sort_by(|a, b| b.0.total_cmp(&a.0));
    trades.truncate(TOP_TRADES);
    trades
}

pub struct Report {
    highlights: HashMap<String, String>,
}

impl Report {
    pub fn new(config: &CmdLineConfig) -> Self {
        Self {
            highlights: config
                .station_highlights
                .iter()
                .map(|(station_type, marker)| (station_type.to_lowercase(), marker.clone()))
                .collect(),
        }
    }

    pub fn render_top_trades(&self, summary: &StockSummary, now: DateTime<Utc>) -> String {
        let mut out = String::new();
        // fmt::Write for String never fails
        let _ = self.write_top_trades(&mut out, summary, now);
        out
    }

    fn write_top_trades(
        &self,
        out: &mut String,
        summary: &StockSummary,
        now: DateTime<Utc>,
    ) -> fmt::Result {
        writeln!(out, "{:=^99}-", now.format("%Y-%m-%dT%H:%M:%S").to_string())?;

        for (spread, commodity) in top_trades(summary) {
            let buy_from = &commodity.best_buys[0];
            let sell_to = &commodity.best_sales[0];
            writeln!(
                out,
                "{} (profit per unit: {:.3}, distance: {} ly):",
                commodity.name.to_uppercase(),
                spread,
                format_distance(buy_from.distance_to(sell_to)),
            )?;

            for buy in &commodity.best_buys {
                self.write_entry(out, "Buy at ", buy.buy_price, buy, sell_to, now)?;
            }
            for sale in &commodity.best_sales {
                self.write_entry(out, "Sell at", sale.sell_price, sale, buy_from, now)?;
            }
            writeln!(out, "{}", "-".repeat(100))?;
        }
        Ok(())
    }

    fn write_entry(
        &self,
        out: &mut String,
        label: &str,
        price: i64,
        entry: &CostSnapshot,
        opposite: &CostSnapshot,
        now: DateTime<Utc>,
    ) -> fmt::Result {
        let station_type = entry.station_type.as_deref().unwrap_or("?");
        writeln!(
            out,
            "  {} {:>7} {:^25} / {:^25} ({:^12}){:<2} {:>8} ly {:>8} ls  {}",
            label,
            price,
            entry.system_name,
            entry.station_name,
            station_type,
            self.highlight(station_type),
            format_distance(entry.distance_to(opposite)),
            entry
                .dist_from_star_ls
                .map(|ls| format!("{:.0}", ls))
                .unwrap_or_else(|| "?".to_string()),
            format_age(&entry.timestamp, now),
        )
    }

    fn highlight(&self, station_type: &str) -> &str {
        self.highlights
            .get(&station_type.to_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn format_distance(distance: Option<f64>) -> String {
    distance
        .map(|d| format!("{:.2}", d))
        .unwrap_or_else(|| "?".to_string())
}

/// Age of an observation as `Nd HHh MMm SSs`; `?` if the timestamp does not
/// parse.
pub fn format_age(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(observed) = DateTime::parse_from_rfc3339(timestamp) else {
        return "?".to_string();
    };
    let age = (now - observed.with_timezone(&Utc)).max(Duration::zero());
    let secs = age.num_seconds();
    format!(
        "{}d {:02}h {:02}m {:02}s",
        secs / 86_400,
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60,
        secs % 60
    )
}
