//! Blocking handoff queue
//!
//! A mutex/condvar protected buffer. Producers never block; consumers sleep
//! until an item is available.
//!
//! `receive` pops the most recently sent item (LIFO). Consumers of phase
//! values filter by equality and discard anything else, so the pop order
//! does not affect correctness. It only means a waiter sees the freshest
//! value first.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Condvar, Mutex};

pub struct BlockingQueue<T> {
    items: Mutex<VecDeque<T>>,
    not_empty: Condvar,
    /// Maximum number of buffered items, `None` for unbounded
    limit: Option<usize>,
    evicted: AtomicU64,
}

impl<T> BlockingQueue<T> {
    /// Create an unbounded queue
    pub fn new() -> Self {
        Self::new_internal(None)
    }

    /// Create a queue that holds at most `limit` items.
    /// When full, `send` evicts the oldest buffered item.
    pub fn with_limit(limit: usize) -> Self {
        Self::new_internal(Some(limit.max(1)))
    }

    fn new_internal(limit: Option<usize>) -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            not_empty: Condvar::new(),
            limit,
            evicted: AtomicU64::new(0),
        }
    }

    /// Push a value and wake one waiting consumer
    pub fn send(&self, value: T) {
        let mut items = self.items.lock();
        if let Some(limit) = self.limit {
            while items.len() >= limit {
                items.pop_front();
                self.evicted.fetch_add(1, Ordering::Relaxed);
            }
        }
        items.push_back(value);
        self.not_empty.notify_one();
    }

    /// Block until the queue is non-empty, then pop the newest item
    pub fn receive(&self) -> T {
        let mut items = self.items.lock();
        loop {
            if let Some(value) = items.pop_back() {
                return value;
            }
            // Releases the lock while asleep, reacquires on wake
            self.not_empty.wait(&mut items);
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Number of items dropped because the queue was full
    pub fn evicted(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
