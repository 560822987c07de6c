//! Bounded best-price lists per commodity.

use serde::{Deserialize, Serialize};

use crate::model::CostSnapshot;

/// Size and threshold limits applied when ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankLimits {
    pub max_best: usize,
    pub min_stock: i64,
    pub min_demand: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity {
    pub name: String,
    /// Cheapest first
    #[serde(default)]
    pub best_buys: Vec<CostSnapshot>,
    /// Best paying first
    #[serde(default)]
    pub best_sales: Vec<CostSnapshot>,
}

impl Commodity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            best_buys: Vec::new(),
            best_sales: Vec::new(),
        }
    }

    /// Ranks a snapshot as a place to buy. Any earlier entry for the same
    /// station is dropped even when the new one does not qualify. Returns
    /// whether the snapshot made the list.
    pub fn rank_buy(&mut self, snapshot: &CostSnapshot, limits: &RankLimits) -> bool {
        let qualifies = snapshot.buy_price != 0 && snapshot.stock >= limits.min_stock;
        rank(
            &mut self.best_buys,
            snapshot,
            qualifies,
            |existing| snapshot.buy_price < existing.buy_price,
            limits.max_best,
        )
    }

    /// Ranks a snapshot as a place to sell; see [`Commodity::rank_buy`].
    pub fn rank_sale(&mut self, snapshot: &CostSnapshot, limits: &RankLimits) -> bool {
        let qualifies = snapshot.sell_price != 0 && snapshot.demand >= limits.min_demand;
        rank(
            &mut self.best_sales,
            snapshot,
            qualifies,
            |existing| snapshot.sell_price > existing.sell_price,
            limits.max_best,
        )
    }
}

/// Supersede, then insert before the first entry the snapshot strictly beats
/// (ties keep their order, newcomer last) and cut back to `max_best`.
fn rank(
    list: &mut Vec<CostSnapshot>,
    snapshot: &CostSnapshot,
    qualifies: bool,
    beats: impl Fn(&CostSnapshot) -> bool,
    max_best: usize,
) -> bool {
    list.retain(|existing| !existing.same_station(snapshot));
    if !qualifies {
        return false;
    }

    let at = list
        .iter()
        .position(|existing| beats(existing))
        .unwrap_or(list.len());
    list.insert(at, snapshot.clone());
    list.truncate(max_best);
    at < max_best
}
