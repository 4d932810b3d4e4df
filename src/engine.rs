//! Engine - the matching-thread event loop, fed by the handoff queue.
//!
//! Wraps the matching core with the consumer loop and optional CPU
//! pinning. One `Engine` per instrument, one thread per `Engine`.

use tracing::info;

use crate::matching::MatchingEngine;
use crate::order::{Command, Price, TopOfBook, Trade};
use crate::queue::HandoffQueue;

/// The main engine: owns the matching core and drains a command queue.
pub struct Engine {
    /// The underlying matching engine
    pub matcher: MatchingEngine,
}

impl Engine {
    /// Create a new engine
    pub fn new() -> Self {
        Self {
            matcher: MatchingEngine::new(),
        }
    }

    /// Create a new engine with storage pre-allocated for `orders`
    /// resting orders
    pub fn with_capacity(orders: u32) -> Self {
        Self {
            matcher: MatchingEngine::with_capacity(orders),
        }
    }

    /// Run the consumer loop until the queue reaches end-of-stream
    /// (shutdown signaled and fully drained).
    ///
    /// Must be the only thread calling into this engine; producers on
    /// other threads feed the queue.
    ///
    /// # Arguments
    /// * `input` - the handoff queue carrying commands
    /// * `pin_to_core` - whether to pin this thread to the last
    ///   available CPU core before consuming
    pub fn run(&mut self, input: &HandoffQueue<Command>, pin_to_core: bool) {
        if pin_to_core {
            self.pin_to_core();
        }

        info!("engine loop started");

        while let Some(cmd) = input.pop() {
            self.process_command(cmd);
        }

        info!(
            trades = self.matcher.trades().len(),
            resting = self.matcher.order_count(),
            "engine loop stopped"
        );
    }

    /// Process a single command.
    ///
    /// This is the entry point for synchronous usage (testing,
    /// benchmarks) and for callers driving the matching thread
    /// directly.
    #[inline]
    pub fn process_command(&mut self, cmd: Command) {
        match cmd {
            Command::Submit(order) => self.matcher.add_order(order),
            Command::Cancel(id) => self.matcher.cancel_order(&id),
            Command::Replace { id, new_qty } => self.matcher.replace_order(&id, new_qty),
        }
    }

    /// Pin the current thread to the last available CPU core.
    ///
    /// The last core is typically the least contended by OS housekeeping.
    pub fn pin_to_core(&self) {
        if let Some(core_ids) = core_affinity::get_core_ids() {
            if let Some(last_core) = core_ids.last() {
                core_affinity::set_for_current(*last_core);
            }
        }
    }

    /// Get the best bid price
    #[inline]
    pub fn best_bid(&self) -> Option<Price> {
        self.matcher.best_bid()
    }

    /// Get the best ask price
    #[inline]
    pub fn best_ask(&self) -> Option<Price> {
        self.matcher.best_ask()
    }

    /// Get the spread
    #[inline]
    pub fn spread(&self) -> Option<Price> {
        self.matcher.spread()
    }

    /// Get total live order count
    #[inline]
    pub fn order_count(&self) -> usize {
        self.matcher.order_count()
    }

    /// Full trade history so far
    #[inline]
    pub fn trades(&self) -> &[Trade] {
        self.matcher.trades()
    }

    /// Best bid/ask aggregate view
    #[inline]
    pub fn top_of_book(&self) -> TopOfBook {
        self.matcher.top_of_book()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{Order, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn test_engine_creation() {
        let engine = Engine::new();
        assert_eq!(engine.order_count(), 0);
        assert_eq!(engine.best_bid(), None);
        assert_eq!(engine.best_ask(), None);
    }

    #[test]
    fn test_engine_process_submit() {
        let mut engine = Engine::new();

        engine.process_command(Command::Submit(Order::new("b1", Side::Bid, dec!(100), 100)));

        assert_eq!(engine.order_count(), 1);
        assert_eq!(engine.best_bid(), Some(dec!(100)));
    }

    #[test]
    fn test_engine_process_cancel_and_replace() {
        let mut engine = Engine::new();

        engine.process_command(Command::Submit(Order::new("b1", Side::Bid, dec!(100), 100)));
        engine.process_command(Command::Replace {
            id: "b1".into(),
            new_qty: 40,
        });
        assert_eq!(engine.matcher.book.depth_at(Side::Bid, dec!(100)), (40, 1));

        engine.process_command(Command::Cancel("b1".into()));
        assert_eq!(engine.order_count(), 0);
    }

    #[test]
    fn test_engine_run_drains_queue() {
        let queue = HandoffQueue::new();
        queue
            .push(Command::Submit(Order::new("a1", Side::Ask, dec!(100), 10)))
            .unwrap();
        queue
            .push(Command::Submit(Order::new("b1", Side::Bid, dec!(100), 4)))
            .unwrap();
        queue.shutdown();

        let mut engine = Engine::new();
        engine.run(&queue, false);

        assert_eq!(engine.trades().len(), 1);
        assert_eq!(engine.trades()[0].qty, 4);
        assert_eq!(engine.order_count(), 1);
    }
}
