//! Order book - sorted price levels plus the O(1) order index.
//!
//! Levels are kept in strict price order per side: bids best = highest
//! price, asks best = lowest. Levels are created lazily on first order
//! and removed as soon as their FIFO chain empties.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::arena::{Arena, ArenaIndex};
use crate::order::{LevelSnapshot, OrderId, Price, Side, TopOfBook};
use crate::price_level::PriceLevel;

/// Order metadata stored alongside the arena index.
///
/// This is the non-owning locator: the level's chain owns the order
/// node, the index only records where to find it.
#[derive(Clone, Copy, Debug)]
pub struct OrderInfo {
    /// Index of the order node in the arena
    pub arena_index: ArenaIndex,
    /// Order side (needed for cancel to find the correct book side)
    pub side: Side,
    /// Price level (needed for cancel to find the PriceLevel)
    pub price: Price,
}

/// The central limit order book: two sorted level maps and the
/// id-to-position index.
///
/// `BTreeMap` keeps each side in strict price order with O(log levels)
/// lookup; the FxHashMap index gives O(1) cancel/replace lookup.
pub struct OrderBook {
    /// Bid price levels (buy orders), best = greatest key
    pub bids: BTreeMap<Price, PriceLevel>,
    /// Ask price levels (sell orders), best = smallest key
    pub asks: BTreeMap<Price, PriceLevel>,
    /// Order lookup map: OrderId -> OrderInfo
    order_map: FxHashMap<OrderId, OrderInfo>,
}

impl OrderBook {
    /// Create a new empty order book
    pub fn new() -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_map: FxHashMap::default(),
        }
    }

    /// Create a new order book with index capacity pre-allocated
    pub fn with_capacity(orders: usize) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            order_map: FxHashMap::with_capacity_and_hasher(orders, Default::default()),
        }
    }

    // ========================================================================
    // Best Price Access
    // ========================================================================

    /// Get the best bid price (highest buy price)
    #[inline]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next_back().copied()
    }

    /// Get the best ask price (lowest sell price)
    #[inline]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    /// Get the best price on a given side
    #[inline]
    pub fn best_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Bid => self.best_bid(),
            Side::Ask => self.best_ask(),
        }
    }

    /// Get the best opposite price (for matching)
    #[inline]
    pub fn best_opposite_price(&self, side: Side) -> Option<Price> {
        match side {
            Side::Bid => self.best_ask(), // Buyer matches with lowest ask
            Side::Ask => self.best_bid(), // Seller matches with highest bid
        }
    }

    /// Get the best (first) level on a side
    #[inline]
    pub fn best_level(&self, side: Side) -> Option<(Price, &PriceLevel)> {
        match side {
            Side::Bid => self.bids.iter().next_back().map(|(p, l)| (*p, l)),
            Side::Ask => self.asks.iter().next().map(|(p, l)| (*p, l)),
        }
    }

    // ========================================================================
    // Level Access
    // ========================================================================

    /// Get a price level (immutable)
    #[inline]
    pub fn get_level(&self, side: Side, price: Price) -> Option<&PriceLevel> {
        match side {
            Side::Bid => self.bids.get(&price),
            Side::Ask => self.asks.get(&price),
        }
    }

    /// Get a price level (mutable)
    #[inline]
    pub fn get_level_mut(&mut self, side: Side, price: Price) -> Option<&mut PriceLevel> {
        match side {
            Side::Bid => self.bids.get_mut(&price),
            Side::Ask => self.asks.get_mut(&price),
        }
    }

    /// Get or create a price level
    #[inline]
    pub fn get_or_create_level(&mut self, side: Side, price: Price) -> &mut PriceLevel {
        match side {
            Side::Bid => self.bids.entry(price).or_insert_with(PriceLevel::new),
            Side::Ask => self.asks.entry(price).or_insert_with(PriceLevel::new),
        }
    }

    /// Drop a level once its chain is empty. Empty levels must not
    /// remain in the store.
    pub fn remove_level_if_empty(&mut self, side: Side, price: Price) {
        let empty = self.get_level(side, price).map_or(false, |l| l.is_empty());
        if empty {
            match side {
                Side::Bid => self.bids.remove(&price),
                Side::Ask => self.asks.remove(&price),
            };
        }
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Rest an order in the book: append to its level's FIFO tail and
    /// record the index entry.
    ///
    /// Id uniqueness is the caller's contract; a duplicate live id
    /// overwrites the previous index entry and leaves the old node
    /// unreachable from the index.
    pub fn add_order(
        &mut self,
        arena: &mut Arena,
        id: OrderId,
        side: Side,
        price: Price,
        arena_index: ArenaIndex,
    ) {
        self.order_map.insert(
            id,
            OrderInfo {
                arena_index,
                side,
                price,
            },
        );

        let level = self.get_or_create_level(side, price);
        level.push_back(arena, arena_index);
    }

    /// Remove an order from the book (for cancel).
    ///
    /// # Returns
    /// The removed order's info if found, or `None` if not found
    pub fn remove_order(&mut self, arena: &mut Arena, id: &str) -> Option<OrderInfo> {
        let info = self.order_map.remove(id)?;

        if let Some(level) = self.get_level_mut(info.side, info.price) {
            let now_empty = level.remove(arena, info.arena_index);
            if now_empty {
                self.remove_level_if_empty(info.side, info.price);
            }
        }

        Some(info)
    }

    /// Look up an order by ID
    #[inline]
    pub fn get_order(&self, id: &str) -> Option<&OrderInfo> {
        self.order_map.get(id)
    }

    /// Check if an order is live
    #[inline]
    pub fn contains_order(&self, id: &str) -> bool {
        self.order_map.contains_key(id)
    }

    /// Remove an order from the index only. Call this when an order is
    /// fully filled during matching (the level chain is updated by the
    /// matching loop itself).
    #[inline]
    pub fn remove_order_from_map(&mut self, id: &str) {
        self.order_map.remove(id);
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Get the total number of live orders in the book
    pub fn order_count(&self) -> usize {
        self.order_map.len()
    }

    /// Get the number of bid levels
    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    /// Get the number of ask levels
    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Check if the book is empty
    pub fn is_empty(&self) -> bool {
        self.order_map.is_empty()
    }

    /// Clear all orders from the book
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.order_map.clear();
    }

    /// Calculate spread (best_ask - best_bid)
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask > bid => Some(ask - bid),
            _ => None,
        }
    }

    /// Get depth at a price level
    pub fn depth_at(&self, side: Side, price: Price) -> (u64, u32) {
        self.get_level(side, price)
            .map(|l| (l.total_qty, l.count))
            .unwrap_or((0, 0))
    }

    /// Best bid/ask aggregate view
    pub fn top_of_book(&self) -> TopOfBook {
        let snap = |(price, level): (Price, &PriceLevel)| LevelSnapshot {
            price,
            total_qty: level.total_qty,
            order_count: level.count,
        };
        TopOfBook {
            bid: self.best_level(Side::Bid).map(snap),
            ask: self.best_level(Side::Ask).map(snap),
        }
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("best_bid", &self.best_bid())
            .field("best_ask", &self.best_ask())
            .field("bid_levels", &self.bids.len())
            .field("ask_levels", &self.asks.len())
            .field("order_count", &self.order_map.len())
            .finish()
    }
}
