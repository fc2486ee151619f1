//! Single-producer/single-consumer bounded ring, used only when the reader
//! and pipeline run on separate threads. `parking_lot::Mutex` +
//! `parking_lot::Condvar` mirror the source system's mutex/condition-variable
//! ring buffer one-for-one.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::{AetherError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackpressurePolicy {
    Block,
    DropOldest,
    DropNewest,
}

struct Inner<T> {
    items: VecDeque<T>,
    capacity: usize,
}

pub struct BoundedQueue<T> {
    inner: Mutex<Inner<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> BoundedQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                capacity: capacity.max(1),
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity
    }

    /// Enqueue `item` under `policy`. Returns `true` if the item was
    /// accepted, `false` if rejected (only possible for `Block` timing out
    /// or `DropNewest` when full).
    pub fn push(&self, item: T, policy: BackpressurePolicy, timeout: Duration) -> bool {
        let mut guard = self.inner.lock();
        match policy {
            BackpressurePolicy::Block => {
                let deadline = Instant::now() + timeout;
                while guard.items.len() >= guard.capacity {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    let wait = deadline - now;
                    let result = self.not_full.wait_for(&mut guard, wait);
                    if result.timed_out() && guard.items.len() >= guard.capacity {
                        return false;
                    }
                }
                guard.items.push_back(item);
            }
            BackpressurePolicy::DropOldest => {
                if guard.items.len() >= guard.capacity {
                    guard.items.pop_front();
                }
                guard.items.push_back(item);
            }
            BackpressurePolicy::DropNewest => {
                if guard.items.len() >= guard.capacity {
                    return false;
                }
                guard.items.push_back(item);
            }
        }
        drop(guard);
        self.not_empty.notify_one();
        true
    }

    pub fn try_pop(&self) -> Option<T> {
        let mut guard = self.inner.lock();
        let item = guard.items.pop_front();
        if item.is_some() {
            drop(guard);
            self.not_full.notify_one();
        }
        item
    }

    /// Block until an item is available or `timeout` elapses, returning
    /// `Timeout` in the latter case so callers can distinguish idle from
    /// failure.
    pub fn pop_blocking(&self, timeout: Duration) -> Result<T> {
        let mut guard = self.inner.lock();
        let deadline = Instant::now() + timeout;
        while guard.items.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                return Err(AetherError::Timeout("BoundedQueue pop timeout".to_string()));
            }
            let wait = deadline - now;
            let result = self.not_empty.wait_for(&mut guard, wait);
            if result.timed_out() && guard.items.is_empty() {
                return Err(AetherError::Timeout("BoundedQueue pop timeout".to_string()));
            }
        }
        let item = guard.items.pop_front().expect("checked non-empty above");
        drop(guard);
        self.not_full.notify_one();
        Ok(item)
    }
}
