//! Order, trade, and book-inspection types.
//!
//! Orders are inputs from submission threads; trades are the
//! append-only execution record produced by the matching engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// External order identifier (client-assigned string token)
pub type OrderId = String;

/// Limit price. `Decimal` is `Ord`, so prices can key the sorted
/// level maps directly and compare exactly.
pub type Price = Decimal;

/// Order side (bid = buy, ask = sell)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Side {
    /// Buy side (bids)
    Bid = 0,
    /// Sell side (asks)
    Ask = 1,
}

impl Side {
    /// Returns the opposite side
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// A limit order as submitted. Only `qty` is ever mutated, and only
/// while the order rests in the book.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Client-assigned order ID (uniqueness is the caller's contract)
    pub id: OrderId,
    /// Order side (bid/ask)
    pub side: Side,
    /// Limit price
    pub price: Price,
    /// Remaining quantity
    pub qty: u32,
}

impl Order {
    pub fn new(id: impl Into<OrderId>, side: Side, price: Price, qty: u32) -> Self {
        Self {
            id: id.into(),
            side,
            price,
            qty,
        }
    }
}

/// One execution. The price is always the resting (maker) order's
/// price, never the incoming order's.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Buy-side order ID
    pub bid_id: OrderId,
    /// Sell-side order ID
    pub ask_id: OrderId,
    /// Execution price (maker's price)
    pub price: Price,
    /// Executed quantity
    pub qty: u32,
}

/// Input commands for the matching thread
#[derive(Clone, Debug)]
pub enum Command {
    /// Submit a new limit order
    Submit(Order),
    /// Cancel a resting order
    Cancel(OrderId),
    /// Set a resting order's quantity in place
    Replace { id: OrderId, new_qty: u32 },
}

/// Aggregate state of one side's best price level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelSnapshot {
    pub price: Price,
    /// Sum of remaining quantities at this price
    pub total_qty: u64,
    /// Number of resting orders at this price
    pub order_count: u32,
}

/// Best bid/ask view, `None` per side when empty
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TopOfBook {
    pub bid: Option<LevelSnapshot>,
    pub ask: Option<LevelSnapshot>,
}
