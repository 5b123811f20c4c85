use std::mem;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::model::Transaction;

/// Pending transactions waiting for the next block, in arrival order.
///
/// Content is never checked here. `drain` empties the pool in the same
/// critical section that reads it, so a concurrent `submit` lands either in
/// the drained batch or in the next one, never in both and never nowhere.
#[derive(Debug, Default)]
pub struct TransactionPool {
    pending: Mutex<Vec<Transaction>>,
}

impl TransactionPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submit(&self, tx: Transaction) {
        self.lock().push(tx);
    }

    /// Take everything pending and leave the pool empty.
    pub fn drain(&self) -> Vec<Transaction> {
        mem::take(&mut *self.lock())
    }

    pub fn snapshot(&self) -> Vec<Transaction> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Transaction>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
