//! Strictly-serial FIFO work queue with pause/resume.
//!
//! At most one item is being processed at any instant; the consumer side
//! (the lane drain loop) calls [`SerialQueue::next`] and does not come back
//! for another item until the current one settles. While paused, pushes
//! still accumulate and nothing is dropped; an in-flight item completes
//! normally.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

struct State<T> {
    items: VecDeque<T>,
    paused: bool,
    closed: bool,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    notify: Notify,
}

/// Cloneable handle to one capability's queue.
pub struct SerialQueue<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for SerialQueue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for SerialQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SerialQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    items: VecDeque::new(),
                    paused: false,
                    closed: false,
                }),
                notify: Notify::new(),
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State<T>> {
        // Lock poisoning only happens if a holder panicked; the queue state
        // itself stays consistent, so continue with the inner value.
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Append an item at the tail. Always succeeds; wakes the drain loop if
    /// it is idle and the queue is not paused.
    pub fn push(&self, item: T) {
        self.state().items.push_back(item);
        self.inner.notify.notify_one();
    }

    /// Stop handing out new items. Idempotent; in-flight work is unaffected.
    pub fn pause(&self) {
        self.state().paused = true;
    }

    /// Re-enable dequeuing from the current head. Idempotent.
    pub fn resume(&self) {
        self.state().paused = false;
        self.inner.notify.notify_one();
    }

    /// Shut the queue down: `next` returns `None` once the current item
    /// settles. Pending items are discarded.
    pub fn close(&self) {
        self.state().closed = true;
        self.inner.notify.notify_one();
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    pub fn len(&self) -> usize {
        self.state().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Wait for the next item. Returns `None` after `close`. Only the lane
    /// drain loop calls this; a single consumer is what makes the queue
    /// strictly serial.
    pub async fn next(&self) -> Option<T> {
        loop {
            let notified = self.inner.notify.notified();
            {
                let mut state = self.state();
                if state.closed {
                    return None;
                }
                if !state.paused {
                    if let Some(item) = state.items.pop_front() {
                        return Some(item);
                    }
                }
            }
            notified.await;
        }
    }
}
