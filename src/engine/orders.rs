// src/engine/orders.rs

use tracing::debug;

/// Pending order accounting.
///
/// The pending count never goes negative: removing more orders than are
/// pending fails and leaves the book untouched.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderBook {
    pending: u32,
    placed: u64,
    consumed: u64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders waiting to be turned into jobs.
    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Total orders ever placed.
    pub fn placed(&self) -> u64 {
        self.placed
    }

    /// Total orders ever removed, whether consumed by a job or withdrawn.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    pub fn add(&mut self) {
        self.pending += 1;
        self.placed += 1;
        debug!(pending = self.pending, "order placed");
    }

    /// Remove `n` pending orders, all or nothing.
    pub fn remove(&mut self, n: u32) -> bool {
        if n > self.pending {
            debug!(
                requested = n,
                pending = self.pending,
                "not enough pending orders to remove"
            );
            return false;
        }

        self.pending -= n;
        self.consumed += u64::from(n);
        debug!(removed = n, pending = self.pending, "orders removed");
        true
    }
}
