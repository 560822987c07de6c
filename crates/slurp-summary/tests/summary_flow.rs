//! End-to-end flows through the dock and stock handlers, fed with decoded
//! EDDN payloads.

use serde_json::json;
use slurp_schemas::{decode_json, CommodityV3, FeedMessage, JournalV1};
use slurp_summary::storage::{load_docks, load_stock, save_docks, save_stock};
use slurp_summary::{DockConfig, DockHandler, DockSummary, StockConfig, StockHandler, StockSummary};
use tempfile::TempDir;

fn header() -> serde_json::Value {
    json!({"uploaderID": "cmdr", "softwareName": "test", "softwareVersion": "1.0"})
}

fn docked(system: &str, station: &str, station_type: &str, pos: [f64; 3], ls: f64) -> JournalV1 {
    let frame = json!({
        "$schemaRef": "https://eddn.edcd.io/schemas/journal/1",
        "header": header(),
        "message": {
            "event": "Docked",
            "StarPos": pos,
            "StarSystem": system,
            "SystemAddress": 1234,
            "timestamp": "2024-03-01T09:00:00Z",
            "DistFromStarLS": ls,
            "MarketID": 42,
            "StationName": station,
            "StationType": station_type
        }
    });
    match decode_json(frame.to_string().as_bytes()).unwrap() {
        FeedMessage::Journal(journal) => journal,
        other => panic!("expected journal, got {}", other.schema_ref()),
    }
}

fn market(system: &str, station: &str, items: &[(&str, i64, i64, i64, i64)]) -> CommodityV3 {
    let commodities: Vec<serde_json::Value> = items
        .iter()
        .map(|(name, buy, stock, sell, demand)| {
            json!({
                "name": name, "meanPrice": 100,
                "buyPrice": buy, "stock": stock, "stockBracket": 2,
                "sellPrice": sell, "demand": demand, "demandBracket": ""
            })
        })
        .collect();
    let frame = json!({
        "$schemaRef": "https://eddn.edcd.io/schemas/commodity/3",
        "header": header(),
        "message": {
            "systemName": system,
            "stationName": station,
            "marketId": 42,
            "timestamp": "2024-03-01T10:00:00Z",
            "commodities": commodities
        }
    });
    match decode_json(frame.to_string().as_bytes()).unwrap() {
        FeedMessage::Commodity(market) => market,
        other => panic!("expected commodity, got {}", other.schema_ref()),
    }
}

fn handlers() -> (DockHandler, StockHandler) {
    (
        DockHandler::new(&DockConfig::default(), DockSummary::new()),
        StockHandler::new(&StockConfig::default(), StockSummary::new()),
    )
}

#[test]
fn test_market_for_unknown_station_only_creates_commodity() {
    let (docks, mut stock) = handlers();

    stock.update(&market("Abc", "Base1", &[("Widget", 100, 1000, 0, 0)]), &docks);

    let widget = stock.summary().get("widget").unwrap();
    assert_eq!(widget.name, "Widget");
    assert!(widget.best_buys.is_empty());
    assert!(widget.best_sales.is_empty());
    assert_eq!(stock.last_outcome().unknown_station, 1);
}

#[test]
fn test_market_at_accepted_outpost_is_ranked() {
    let (mut docks, mut stock) = handlers();
    docks.update(&docked("Abc", "Base1", "Outpost", [10.0, 0.0, 0.0], 100.0));

    stock.update(&market("Abc", "Base1", &[("Widget", 100, 1000, 0, 0)]), &docks);

    let widget = stock.summary().get("Widget").unwrap();
    assert_eq!(widget.best_buys.len(), 1);
    let entry = &widget.best_buys[0];
    assert_eq!(entry.buy_price, 100);
    assert_eq!(entry.station_type.as_deref(), Some("Outpost"));
    assert_eq!(entry.star_pos, Some([10.0, 0.0, 0.0]));
    assert_eq!(entry.dist_from_star_ls, Some(100.0));
    assert_eq!(entry.timestamp, "2024-03-01T10:00:00Z");
    assert!(widget.best_sales.is_empty());
}

#[test]
fn test_same_station_update_replaces_entry() {
    let (mut docks, mut stock) = handlers();
    docks.update(&docked("Abc", "Base1", "Outpost", [10.0, 0.0, 0.0], 100.0));

    stock.update(&market("Abc", "Base1", &[("Widget", 100, 1000, 0, 0)]), &docks);
    stock.update(&market("Abc", "Base1", &[("Widget", 50, 1000, 0, 0)]), &docks);

    let buys = &stock.summary().get("Widget").unwrap().best_buys;
    assert_eq!(buys.len(), 1);
    assert_eq!(buys[0].buy_price, 50);
}

#[test]
fn test_filtered_station_changes_nothing() {
    let (mut docks, mut stock) = handlers();
    docks.update(&docked("Far", "Away", "Orbis", [900.0, 0.0, 0.0], 100.0));
    docks.update(&docked("Near", "Carrier", "FleetCarrier", [1.0, 0.0, 0.0], 100.0));
    docks.update(&docked("Near", "Deep", "Coriolis", [1.0, 0.0, 0.0], 5000.0));

    for station in [("Far", "Away"), ("Near", "Carrier"), ("Near", "Deep")] {
        stock.update(&market(station.0, station.1, &[("Gold", 100, 1000, 200, 10)]), &docks);
        assert_eq!(stock.last_outcome().filtered, 1);
    }

    let gold = stock.summary().get("gold").unwrap();
    assert!(gold.best_buys.is_empty());
    assert!(gold.best_sales.is_empty());
}

#[test]
fn test_rankings_across_stations() {
    let (mut docks, mut stock) = handlers();
    for (i, station) in ["S1", "S2", "S3", "S4", "S5", "S6"].iter().enumerate() {
        docks.update(&docked("Abc", station, "Orbis", [i as f64, 0.0, 0.0], 10.0));
    }

    let prices = [(600, 900), (100, 400), (300, 700), (500, 300), (200, 800), (400, 500)];
    for (station, (buy, sell)) in ["S1", "S2", "S3", "S4", "S5", "S6"].iter().zip(prices) {
        stock.update(&market("Abc", station, &[("Gold", buy, 1000, sell, 10)]), &docks);
    }

    let gold = stock.summary().get("Gold").unwrap();
    let buys: Vec<i64> = gold.best_buys.iter().map(|s| s.buy_price).collect();
    let sales: Vec<i64> = gold.best_sales.iter().map(|s| s.sell_price).collect();
    assert_eq!(buys, vec![100, 200, 300, 400, 500]);
    assert_eq!(sales, vec![900, 800, 700, 500, 400]);
}

#[test]
fn test_typed_station_redock_ignored_but_ticks() {
    let config = DockConfig {
        autosave_wait: 1,
        ..DockConfig::default()
    };
    let mut docks = DockHandler::new(&config, DockSummary::new());

    assert!(!docks.update(&docked("Abc", "Base1", "Outpost", [1.0, 0.0, 0.0], 10.0)));
    assert!(docks.update(&docked("Abc", "Base1", "Orbis", [2.0, 0.0, 0.0], 20.0)));

    let station = docks.station("Abc", "Base1").unwrap();
    assert_eq!(station.station_type.as_deref(), Some("Outpost"));
    assert_eq!(station.star_pos, [1.0, 0.0, 0.0]);
}

#[test]
fn test_stock_countdown_signals_after_wait() {
    let config = StockConfig {
        autosave_wait: 2,
        ..StockConfig::default()
    };
    let docks = DockHandler::new(&DockConfig::default(), DockSummary::new());
    let mut stock = StockHandler::new(&config, StockSummary::new());
    let msg = market("Abc", "Base1", &[("Widget", 100, 1000, 0, 0)]);

    let signals: Vec<bool> = (0..6).map(|_| stock.update(&msg, &docks)).collect();
    assert_eq!(signals, vec![false, false, true, false, false, true]);
}

#[test]
fn test_summaries_survive_restart() {
    let dir = TempDir::new().unwrap();
    let stock_path = dir.path().join("stockfile.json");
    let dock_path = dir.path().join("dockfile.json");

    let (mut docks, mut stock) = handlers();
    docks.update(&docked("Abc", "Base1", "Outpost", [10.0, 0.0, 0.0], 100.0));
    stock.update(
        &market("Abc", "Base1", &[("Widget", 100, 1000, 250, 40), ("Tea", 0, 0, 30, 900)]),
        &docks,
    );

    save_docks(&dock_path, docks.summary()).unwrap();
    save_stock(&stock_path, stock.summary()).unwrap();

    let reloaded_docks = load_docks(&dock_path).unwrap();
    let reloaded_stock = load_stock(&stock_path).unwrap();
    assert_eq!(&reloaded_docks, docks.summary());
    assert_eq!(&reloaded_stock, stock.summary());

    // A restarted handler keeps ranking on top of the loaded state.
    let mut stock = StockHandler::new(&StockConfig::default(), reloaded_stock);
    let docks = DockHandler::new(&DockConfig::default(), reloaded_docks);
    stock.update(&market("Abc", "Base1", &[("Widget", 90, 1000, 0, 0)]), &docks);
    let widget = stock.summary().get("widget").unwrap();
    assert_eq!(widget.best_buys[0].buy_price, 90);
    assert!(widget.best_sales.is_empty());
}
