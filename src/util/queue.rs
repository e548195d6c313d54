//! # Concurrent Queue
//!
//! A mutex-guarded FIFO for handing values between threads, with both
//! non-blocking and blocking removal.
//!
//! Every pushed item is observed by exactly one popper, whichever removal
//! method it used. `clear` is the cancellation path for blocked waiters: it
//! wakes them all, they observe an empty queue, and they return `None`. That
//! outcome is defined behavior, not an error.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};

struct QueueInner<T> {
    items: VecDeque<T>,
    // Bumped by clear() so waiters can tell a wake-for-cancellation from a
    // spurious wakeup.
    epoch: u64,
}

/// Mutex-guarded FIFO with a condvar for blocking pops.
pub struct ConcurrentQueue<T> {
    inner: Mutex<QueueInner<T>>,
    available: Condvar,
}

impl<T> Default for ConcurrentQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ConcurrentQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(QueueInner {
                items: VecDeque::new(),
                epoch: 0,
            }),
            available: Condvar::new(),
        }
    }

    // A panicking holder cannot leave the VecDeque in a broken state, so
    // poisoning is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, QueueInner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a value and wake one blocked `pop_wait` caller.
    pub fn push(&self, value: T) {
        let mut inner = self.lock();
        inner.items.push_back(value);
        drop(inner);
        self.available.notify_one();
    }

    /// Remove and return the front item, or `None` if the queue is empty.
    ///
    /// An empty queue is a routine condition, not an error.
    pub fn pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Block until an item is available or the queue is cleared.
    ///
    /// Returns `None` only when `clear` ran while waiting and no item was
    /// handed to this caller.
    pub fn pop_wait(&self) -> Option<T> {
        let mut inner = self.lock();
        let entered = inner.epoch;

        loop {
            if let Some(value) = inner.items.pop_front() {
                return Some(value);
            }
            if inner.epoch != entered {
                return None;
            }
            inner = self
                .available
                .wait(inner)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Drop all queued items and wake every blocked waiter.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.items.clear();
        inner.epoch += 1;
        drop(inner);
        self.available.notify_all();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }
}
