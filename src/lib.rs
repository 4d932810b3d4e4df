//! # Quickfill
//!
//! A single-instrument limit order matching engine with price-time
//! priority, fed through a blocking handoff queue.
//!
//! ## Design Principles
//!
//! - **Single-Writer**: one thread owns the book exclusively (no locks
//!   inside the matching core)
//! - **O(log levels) price lookup**: sorted level maps per side
//! - **O(1) order lookup**: id index with stable arena handles, so
//!   cancel and replace never scan a level
//! - **FIFO within a price**: strict time priority at every level
//!
//! ## Architecture
//!
//! ```text
//! [Submission Thread(s)] --> [Handoff Queue] --> [Matching Thread]
//!                                                       |
//!                                                  [Trade Log]
//! ```
//!
//! The matching core (`MatchingEngine`) is not internally synchronized;
//! concurrency lives entirely in the [`queue::HandoffQueue`]. Producers
//! push, exactly one consumer pops and drives the engine.

pub mod arena;
pub mod engine;
pub mod matching;
pub mod order;
pub mod order_book;
pub mod price_level;
pub mod queue;

// Re-exports for convenience
pub use arena::{Arena, ArenaIndex, OrderNode, NULL_INDEX};
pub use engine::Engine;
pub use matching::MatchingEngine;
pub use order::{Command, LevelSnapshot, Order, OrderId, Price, Side, TopOfBook, Trade};
pub use order_book::{OrderBook, OrderInfo};
pub use price_level::PriceLevel;
pub use queue::{HandoffQueue, QueueError};
