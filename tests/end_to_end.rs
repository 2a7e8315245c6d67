use depth_engine::domain::ViewRow;
use depth_engine::{ApplyOutcome, EngineConfig, OrderBookEngine};

fn row(price: f64, size: f64, total: f64) -> ViewRow {
    ViewRow { price, size, total }
}

#[test]
fn test_snapshot_delta_view() {
    let mut engine = OrderBookEngine::new(EngineConfig::default());

    let outcome = engine.apply(
        r#"{"feed":"book_ui_1_snapshot","product_id":"PI_XBTUSD","bids":[[100,5],[99,3]],"asks":[[101,4],[102,2]]}"#,
    );
    assert!(matches!(outcome, ApplyOutcome::Snapshot(_)));

    engine.apply(r#"{"feed":"book_ui_1","product_id":"PI_XBTUSD","bids":[[100,0]],"asks":[]}"#);

    let view = engine.snapshot_view();
    assert_eq!(view.bids, vec![row(99.0, 3.0, 3.0)]);
    // best-to-worst rows are [101 (4), 102 (6)], shown reversed
    assert_eq!(view.asks, vec![row(102.0, 2.0, 6.0), row(101.0, 4.0, 4.0)]);

    let spread = view.spread.expect("both sides populated");
    assert_eq!(spread.spread, 2.0);
    assert_eq!(spread.spread_percentage, 1.98);
}

#[test]
fn test_unsubscribe_then_resubscribe() {
    let mut engine = OrderBookEngine::default();
    engine.apply(r#"{"feed":"book_ui_1_snapshot","bids":[[100,5]],"asks":[[101,4]]}"#);

    engine.apply(r#"{"event":"unsubscribed","feed":"book_ui_1","product_ids":["PI_XBTUSD"]}"#);
    assert_eq!(engine.book().bids().count(), 0);
    assert_eq!(engine.book().asks().count(), 0);
    let view = engine.snapshot_view();
    assert!(view.cleared);
    assert!(view.spread.is_none());

    // deltas before a fresh snapshot still apply, but the book stays flagged
    engine.apply(r#"{"feed":"book_ui_1","bids":[[98,1]],"asks":[]}"#);
    assert!(engine.is_cleared());

    engine.apply(r#"{"feed":"book_ui_1_snapshot","bids":[[200,1]],"asks":[[201,1]]}"#);
    let view = engine.snapshot_view();
    assert!(!view.cleared);
    assert_eq!(view.bids, vec![row(200.0, 1.0, 1.0)]);
    assert_eq!(view.spread.map(|s| s.spread), Some(1.0));
}

#[test]
fn test_view_serializes_to_json() {
    let mut engine = OrderBookEngine::default();
    engine.apply(r#"{"feed":"book_ui_1_snapshot","bids":[[100,1]],"asks":[[101,1]]}"#);

    let json = serde_json::to_value(engine.snapshot_view()).unwrap();
    assert_eq!(json["bids"][0]["price"], 100.0);
    assert_eq!(json["spread"]["spread_percentage"], 0.99);
    assert_eq!(json["cleared"], false);
}
