//! Stress tests - push the engine through high-volume paths.
//!
//! Verifies correctness under contention at single price levels,
//! rapid order churn, and wide sparse books.

use quickfill::{MatchingEngine, Order, Side};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[test]
fn test_single_price_level_contention() {
    const ORDERS_PER_SIDE: u32 = 1_000;

    let mut engine = MatchingEngine::new();

    // Many orders at the same price
    for i in 0..ORDERS_PER_SIDE {
        engine.add_order(Order::new(format!("a{i}"), Side::Ask, dec!(100), 100));
    }
    assert_eq!(engine.order_count(), ORDERS_PER_SIDE as usize);
    assert_eq!(engine.book.ask_levels(), 1);

    // Sweep the whole level with one order
    engine.add_order(Order::new(
        "sweep",
        Side::Bid,
        dec!(100),
        ORDERS_PER_SIDE * 100,
    ));

    assert_eq!(engine.trades().len(), ORDERS_PER_SIDE as usize);
    assert_eq!(engine.order_count(), 0, "book should be empty after sweep");
    assert!(engine.arena.is_empty(), "arena should have no live nodes");
}

#[test]
fn test_fifo_priority_at_scale() {
    let mut engine = MatchingEngine::new();

    for i in 0..100u32 {
        engine.add_order(Order::new(format!("a{i}"), Side::Ask, dec!(100), 10));
    }

    // Fill exactly half the queue
    engine.add_order(Order::new("b", Side::Bid, dec!(100), 500));

    let makers: Vec<_> = engine.trades().iter().map(|t| t.ask_id.clone()).collect();
    assert_eq!(makers.len(), 50);
    for (i, maker) in makers.iter().enumerate() {
        assert_eq!(maker, &format!("a{i}"), "fill {i} must hit the oldest order");
    }

    // The untouched half still rests in arrival order
    let (_, level) = engine.book.best_level(Side::Ask).unwrap();
    let resting: Vec<_> = level.iter(&engine.arena).map(|n| n.id.clone()).collect();
    let expected: Vec<_> = (50..100).map(|i| format!("a{i}")).collect();
    assert_eq!(resting, expected);
}

#[test]
fn test_rapid_add_cancel_cycles() {
    const CYCLES: usize = 10_000;

    let mut engine = MatchingEngine::new();

    for cycle in 0..CYCLES {
        let id = format!("c{cycle}");
        let side = if cycle % 2 == 0 { Side::Bid } else { Side::Ask };
        // Non-crossing bands so nothing matches
        let price = if side == Side::Bid { dec!(90) } else { dec!(110) };

        engine.add_order(Order::new(id.clone(), side, price, 100));
        assert!(engine.book.contains_order(&id));

        engine.cancel_order(&id);
        assert!(!engine.book.contains_order(&id));
    }

    assert_eq!(engine.order_count(), 0);
    assert!(engine.trades().is_empty());
    assert!(engine.arena.is_empty());
    assert_eq!(engine.book.bid_levels() + engine.book.ask_levels(), 0);
}

#[test]
fn test_rapid_match_cycles() {
    const CYCLES: usize = 5_000;

    let mut engine = MatchingEngine::new();

    for cycle in 0..CYCLES {
        engine.add_order(Order::new(format!("a{cycle}"), Side::Ask, dec!(100), 100));
        engine.add_order(Order::new(format!("b{cycle}"), Side::Bid, dec!(100), 100));
    }

    assert_eq!(engine.trades().len(), CYCLES);
    assert_eq!(engine.order_count(), 0, "book should be empty");
    assert!(engine.arena.is_empty());
}

#[test]
fn test_many_sparse_levels() {
    const LEVELS: i64 = 10_000;

    let mut engine = MatchingEngine::new();

    for i in 0..LEVELS {
        engine.add_order(Order::new(
            format!("b{i}"),
            Side::Bid,
            Decimal::new(i * 25, 2),
            100,
        ));
    }

    assert_eq!(engine.order_count(), LEVELS as usize);
    assert_eq!(engine.book.bid_levels(), LEVELS as usize);
    assert_eq!(engine.best_bid(), Some(Decimal::new((LEVELS - 1) * 25, 2)));

    // Sweep the top 100 levels
    engine.add_order(Order::new(
        "sweep",
        Side::Ask,
        Decimal::new((LEVELS - 100) * 25, 2),
        100 * 100,
    ));
    assert_eq!(engine.trades().len(), 100);
    assert_eq!(engine.book.bid_levels(), (LEVELS - 100) as usize);
    assert_eq!(engine.best_bid(), Some(Decimal::new((LEVELS - 101) * 25, 2)));
}

#[test]
fn test_cancel_after_partial_fill() {
    let mut engine = MatchingEngine::new();

    engine.add_order(Order::new("maker", Side::Ask, dec!(100), 1_000));
    engine.add_order(Order::new("taker", Side::Bid, dec!(100), 300));

    assert_eq!(engine.book.depth_at(Side::Ask, dec!(100)), (700, 1));

    engine.cancel_order("maker");
    assert_eq!(engine.order_count(), 0);
    assert_eq!(engine.best_ask(), None);

    // History is untouched by the cancel
    assert_eq!(engine.trades().len(), 1);
    assert_eq!(engine.trades()[0].qty, 300);
}

#[test]
fn test_replace_churn_keeps_aggregates_exact() {
    const ORDERS: u32 = 500;

    let mut engine = MatchingEngine::new();

    for i in 0..ORDERS {
        engine.add_order(Order::new(format!("r{i}"), Side::Bid, dec!(99.50), i + 1));
    }

    // Replace every order twice, up then down
    for i in 0..ORDERS {
        engine.replace_order(&format!("r{i}"), 1_000);
    }
    for i in 0..ORDERS {
        engine.replace_order(&format!("r{i}"), 3);
    }

    let (qty, count) = engine.book.depth_at(Side::Bid, dec!(99.50));
    assert_eq!(count, ORDERS);
    assert_eq!(qty, ORDERS as u64 * 3);

    // FIFO order is untouched by all that churn
    let (_, level) = engine.book.best_level(Side::Bid).unwrap();
    let ids: Vec<_> = level.iter(&engine.arena).map(|n| n.id.clone()).collect();
    let expected: Vec<_> = (0..ORDERS).map(|i| format!("r{i}")).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_clear_resets_everything() {
    let mut engine = MatchingEngine::new();

    for i in 0..100 {
        engine.add_order(Order::new(format!("b{i}"), Side::Bid, dec!(95), 10));
        engine.add_order(Order::new(format!("a{i}"), Side::Ask, dec!(105), 10));
    }
    assert_eq!(engine.order_count(), 200);

    engine.book.clear();
    assert!(engine.book.is_empty());
    assert_eq!(engine.best_bid(), None);
    assert_eq!(engine.best_ask(), None);
}
