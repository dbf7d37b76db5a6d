// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Host hook invoked while a transmit flush is waiting for write capacity
///
/// This is the single suspension point of the stream. The host may run its
/// own housekeeping (realtime servicing, watchdog kick) before answering.
pub trait BlockingCallback {
    /// Decide whether the stalled flush should keep waiting
    ///
    /// # Returns
    /// `true` to keep waiting, `false` to abort the flush and drop what is left
    fn keep_waiting(&mut self) -> bool;
}

impl<F> BlockingCallback for F
where
    F: FnMut() -> bool,
{
    fn keep_waiting(&mut self) -> bool {
        self()
    }
}

/// Callback that waits forever (spins until the transport drains)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysWait;

impl BlockingCallback for AlwaysWait {
    fn keep_waiting(&mut self) -> bool {
        true
    }
}

/// Callback that gives up after a fixed number of stalls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitBudget {
    remaining: u32,
}

impl WaitBudget {
    /// Allow `stalls` waits before aborting
    pub const fn new(stalls: u32) -> Self {
        Self { remaining: stalls }
    }

    /// Waits still allowed
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl BlockingCallback for WaitBudget {
    fn keep_waiting(&mut self) -> bool {
        match self.remaining.checked_sub(1) {
            Some(left) => {
                self.remaining = left;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_budget_runs_out() {
        let mut budget = WaitBudget::new(2);
        assert!(budget.keep_waiting());
        assert!(budget.keep_waiting());
        assert!(!budget.keep_waiting());
        assert_eq!(budget.remaining(), 0);
    }

    #[test]
    fn test_closure_callback() {
        let mut calls = 0;
        let mut cb = || {
            calls += 1;
            calls < 3
        };
        assert!(cb.keep_waiting());
        assert!(cb.keep_waiting());
        assert!(!cb.keep_waiting());
    }
}
