use carry_monitor::arbitrage::{FrictionConfig, Strategy, best_opportunity, evaluate_with_report};
use carry_monitor::sources::file::parse_snapshot;
use chrono::Utc;

const DEMO: &str = include_str!("../demos/snapshot.json");

#[test]
fn demo_snapshot_evaluates() {
    let snap = parse_snapshot(DEMO, Utc::now()).expect("demo snapshot should parse");
    // The calendar spread has no single maturity and is skipped while parsing.
    assert_eq!(snap.contracts().len(), 5);

    let evaluation = evaluate_with_report(&snap, &FrictionConfig::default()).unwrap();
    assert!(evaluation.dropped.is_empty());
    assert_eq!(evaluation.results.len(), 5);

    let december = &evaluation.results[2];
    assert_eq!(december.symbol, "DLR/DIC25A");
    assert!(december.mid_only);
    assert_eq!(december.strategy, Strategy::None);

    let january = &evaluation.results[3];
    assert_eq!(january.implied_rate_bid, None);
    assert!(january.implied_rate_ask.is_some());

    if let Some(best) = best_opportunity(&evaluation.results) {
        assert!(best.spread_bps > 0.0);
    }
}

#[test]
fn heavy_commission_leaves_no_strategy() {
    let snap = parse_snapshot(DEMO, Utc::now()).unwrap();
    let friction = FrictionConfig {
        commission_bps: 5_000.0,
        ..Default::default()
    };
    let evaluation = evaluate_with_report(&snap, &friction).unwrap();
    assert!(evaluation.results.iter().all(|r| r.strategy == Strategy::None));
    assert!(best_opportunity(&evaluation.results).is_none());
}
