//! Handoff queue - blocking producer/consumer channel between order
//! submission threads and the matching thread.
//!
//! Any number of producers may `push`; exactly one consumer should
//! `pop` in a loop, preserving the engine's single-writer contract.
//! `shutdown` closes the queue: producers get an error, the consumer
//! drains whatever remains and then sees end-of-stream.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};
use thiserror::Error;

/// Failure pushing into the queue. The only explicit error in the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The queue was shut down; no further items are accepted
    #[error("queue is shut down")]
    Closed,
}

struct Inner<T> {
    items: VecDeque<T>,
    shutdown: bool,
}

/// Thread-safe blocking FIFO with graceful shutdown/drain semantics.
pub struct HandoffQueue<T> {
    inner: Mutex<Inner<T>>,
    available: Condvar,
}

impl<T> HandoffQueue<T> {
    /// Create a new open queue
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Enqueue an item and wake one waiting consumer.
    ///
    /// # Errors
    /// Returns [`QueueError::Closed`] once `shutdown` has been called.
    pub fn push(&self, item: T) -> Result<(), QueueError> {
        let mut inner = self.inner.lock();
        if inner.shutdown {
            return Err(QueueError::Closed);
        }
        inner.items.push_back(item);
        drop(inner);
        self.available.notify_one();
        Ok(())
    }

    /// Dequeue the next item, blocking while the queue is empty.
    ///
    /// # Returns
    /// `None` only after `shutdown` has been signaled AND the queue
    /// has drained; items pushed before shutdown are always delivered,
    /// in FIFO order.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        while inner.items.is_empty() && !inner.shutdown {
            self.available.wait(&mut inner);
        }
        inner.items.pop_front()
    }

    /// Mark the queue closed and wake all blocked consumers. Safe to
    /// call more than once.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock();
        inner.shutdown = true;
        drop(inner);
        self.available.notify_all();
    }

    /// Number of items currently queued
    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// True when no items are queued
    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    /// True once `shutdown` has been called
    pub fn is_shut_down(&self) -> bool {
        self.inner.lock().shutdown
    }
}

impl<T> Default for HandoffQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
