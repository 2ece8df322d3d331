//! Fixed-ceiling rate gate.
//!
//! A gate limits how many work cycles a lane may run before the next
//! scheduled replenishment. The lane's drain loop is the only decrementer;
//! the reset scheduler is the only resetter.

use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
pub struct RateGate {
    ceiling: u32,
    remaining: AtomicU32,
}

impl RateGate {
    pub fn new(ceiling: u32) -> Self {
        Self {
            ceiling,
            remaining: AtomicU32::new(ceiling),
        }
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume one unit and return the count left. Clamped at zero: a
    /// decrement arriving with the gate already exhausted indicates a cycle
    /// that ran past the pause and is logged as an invariant violation.
    pub fn decrement(&self) -> u32 {
        match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| r.checked_sub(1))
        {
            Ok(prev) => prev - 1,
            Err(_) => {
                tracing::warn!(
                    ceiling = self.ceiling,
                    "rate gate decremented while already exhausted"
                );
                0
            }
        }
    }

    /// Restore the gate to its ceiling. Resuming the paired queue is the
    /// scheduler's responsibility.
    pub fn reset(&self) {
        self.remaining.store(self.ceiling, Ordering::Release);
    }
}
