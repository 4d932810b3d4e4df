//! Matching engine - core order matching algorithm.
//!
//! Implements the cross/rest algorithm:
//! 1. CROSSING: Match aggressive orders against the opposite side
//! 2. RESTING: Place remaining quantity in the book
//!
//! Single-writer: all methods must be called from one thread. The
//! engine performs no input validation; unknown ids passed to
//! cancel/replace are a silent no-op and id uniqueness is the
//! caller's contract.

use tracing::{debug, trace};

use crate::arena::{Arena, NULL_INDEX};
use crate::order::{Order, Price, Side, TopOfBook, Trade};
use crate::order_book::OrderBook;

/// The matching engine core: arena, book, and the append-only trade log.
pub struct MatchingEngine {
    /// Memory arena for order nodes
    pub arena: Arena,
    /// The limit order book
    pub book: OrderBook,
    /// Every execution so far, in match order
    trades: Vec<Trade>,
}

impl MatchingEngine {
    /// Create a new matching engine
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            book: OrderBook::new(),
            trades: Vec::new(),
        }
    }

    /// Create a new matching engine with storage pre-allocated for
    /// `orders` resting orders
    pub fn with_capacity(orders: u32) -> Self {
        Self {
            arena: Arena::with_capacity(orders),
            book: OrderBook::with_capacity(orders as usize),
            trades: Vec::new(),
        }
    }

    /// Process an incoming limit order.
    ///
    /// # Algorithm
    /// 1. Cross against the opposite side while a match exists
    ///    (better prices first, FIFO within a price)
    /// 2. Rest any remaining quantity at the order's own price
    ///
    /// Appends zero or more trades to the log. A zero-quantity order
    /// crosses nothing and rests nothing.
    pub fn add_order(&mut self, order: Order) {
        let Order {
            id,
            side,
            price,
            qty,
        } = order;

        let mut remaining_qty = qty;
        let maker_side = side.opposite();

        // Phase 1: CROSSING (aggressive matching)
        while remaining_qty > 0 {
            let best_opposite = match self.book.best_price(maker_side) {
                Some(p) => p,
                None => break, // No orders on opposite side
            };

            if !prices_cross(side, price, best_opposite) {
                // All deeper levels are worse; stop
                break;
            }

            remaining_qty = self.match_at_level(&id, side, best_opposite, remaining_qty);
        }

        // Phase 2: RESTING (passive posting)
        if remaining_qty > 0 {
            let arena_index = self.arena.insert(id.clone(), price, remaining_qty);
            self.book.add_order(&mut self.arena, id, side, price, arena_index);
        }
    }

    /// Match against resting orders at a specific price level, oldest
    /// first, until the taker or the level is exhausted.
    ///
    /// # Returns
    /// Remaining taker quantity after matching at this level
    fn match_at_level(
        &mut self,
        taker_id: &str,
        taker_side: Side,
        price: Price,
        mut remaining_qty: u32,
    ) -> u32 {
        let maker_side = taker_side.opposite();

        loop {
            if remaining_qty == 0 {
                break;
            }

            // Head of the level = oldest = highest priority
            let maker_index = match self.book.get_level(maker_side, price) {
                Some(level) => level.peek_head(),
                None => break,
            };
            if maker_index == NULL_INDEX {
                break;
            }

            let maker = self.arena.get(maker_index);
            let maker_id = maker.id.clone();
            let maker_qty = maker.qty;

            let trade_qty = remaining_qty.min(maker_qty);

            // Trade ids by side: the buy order is the bid id whether it
            // is the taker or the maker. Price is always the maker's.
            let trade = match taker_side {
                Side::Bid => Trade {
                    bid_id: taker_id.to_owned(),
                    ask_id: maker_id.clone(),
                    price,
                    qty: trade_qty,
                },
                Side::Ask => Trade {
                    bid_id: maker_id.clone(),
                    ask_id: taker_id.to_owned(),
                    price,
                    qty: trade_qty,
                },
            };
            trace!(
                bid_id = %trade.bid_id,
                ask_id = %trade.ask_id,
                price = %trade.price,
                qty = trade.qty,
                "trade"
            );
            self.trades.push(trade);

            remaining_qty -= trade_qty;

            if maker_qty == trade_qty {
                // Maker fully filled - remove from chain, index, arena
                let level = self.book.get_level_mut(maker_side, price).unwrap();
                level.pop_front(&mut self.arena);
                self.book.remove_order_from_map(&maker_id);
                self.arena.free(maker_index);

                if self.book.get_level(maker_side, price).map_or(true, |l| l.is_empty()) {
                    self.book.remove_level_if_empty(maker_side, price);
                    break;
                }
            } else {
                // Maker partially filled - decrement in place, keep position
                self.arena.get_mut(maker_index).qty = maker_qty - trade_qty;
                let level = self.book.get_level_mut(maker_side, price).unwrap();
                level.subtract_qty(trade_qty);
            }
        }

        remaining_qty
    }

    /// Cancel a resting order. Unknown ids (already filled, already
    /// cancelled, or never submitted) are a silent no-op.
    pub fn cancel_order(&mut self, id: &str) {
        let info = match self.book.get_order(id) {
            Some(info) => *info,
            None => {
                debug!(id, "cancel ignored: order not live");
                return;
            }
        };

        self.book.remove_order(&mut self.arena, id);
        self.arena.free(info.arena_index);
    }

    /// Set a resting order's quantity in place. Unknown ids are a
    /// silent no-op.
    ///
    /// The order keeps its position in the level's FIFO chain even
    /// when the quantity increases; time priority is never forfeited
    /// by a replace.
    pub fn replace_order(&mut self, id: &str, new_qty: u32) {
        let info = match self.book.get_order(id) {
            Some(info) => *info,
            None => {
                debug!(id, "replace ignored: order not live");
                return;
            }
        };

        let node = self.arena.get_mut(info.arena_index);
        let old_qty = node.qty;
        node.qty = new_qty;

        let level = self.book.get_level_mut(info.side, info.price).unwrap();
        if new_qty >= old_qty {
            level.add_qty(new_qty - old_qty);
        } else {
            level.subtract_qty(old_qty - new_qty);
        }
    }

    // ========================================================================
    // Trade Log
    // ========================================================================

    /// Full trade history so far, in execution order
    #[inline]
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    /// Take the accumulated trades, leaving the log empty. For
    /// long-running use where the caller streams executions out.
    pub fn take_trades(&mut self) -> Vec<Trade> {
        std::mem::take(&mut self.trades)
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Get the best bid price
    #[inline]
    pub fn best_bid(&self) -> Option<Price> {
        self.book.best_bid()
    }

    /// Get the best ask price
    #[inline]
    pub fn best_ask(&self) -> Option<Price> {
        self.book.best_ask()
    }

    /// Get the spread
    #[inline]
    pub fn spread(&self) -> Option<Price> {
        self.book.spread()
    }

    /// Get total live order count
    #[inline]
    pub fn order_count(&self) -> usize {
        self.book.order_count()
    }

    /// Best bid/ask aggregate view
    #[inline]
    pub fn top_of_book(&self) -> TopOfBook {
        self.book.top_of_book()
    }
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// True when the incoming order's limit reaches the opposite best
#[inline]
fn prices_cross(taker_side: Side, taker_price: Price, maker_price: Price) -> bool {
    match taker_side {
        // Buyer willing to pay >= lowest ask
        Side::Bid => taker_price >= maker_price,
        // Seller willing to accept <= highest bid
        Side::Ask => taker_price <= maker_price,
    }
}
