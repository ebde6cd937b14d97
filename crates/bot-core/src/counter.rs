//! Process-wide count of running games.
//!
//! This is the only state shared between the dispatcher and the game
//! sessions. Both transitions are compare-and-swap loops so the bounds
//! `0 <= active <= max` hold under any interleaving.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Default cap on simultaneously running games.
pub const DEFAULT_MAX_CONCURRENT_GAMES: usize = 4;

#[derive(Debug)]
pub struct ConcurrencyCounter {
    active: AtomicUsize,
    max: usize,
}

impl ConcurrencyCounter {
    pub fn new(max: usize) -> Self {
        ConcurrencyCounter {
            active: AtomicUsize::new(0),
            max,
        }
    }

    /// Take one slot. Fails (leaving the count untouched) at the cap.
    pub fn try_acquire(&self) -> bool {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                if n < self.max {
                    Some(n + 1)
                } else {
                    None
                }
            })
            .is_ok()
    }

    /// Give one slot back. Fails (leaving the count untouched) at zero.
    pub fn release(&self) -> bool {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .is_ok()
    }

    pub fn current(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn has_capacity(&self) -> bool {
        self.current() < self.max
    }
}

impl Default for ConcurrencyCounter {
    fn default() -> Self {
        ConcurrencyCounter::new(DEFAULT_MAX_CONCURRENT_GAMES)
    }
}
