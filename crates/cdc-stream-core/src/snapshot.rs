// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Single-slot backup of the receive buffer

use crate::ring_buffer::RingBuffer;

/// Saved copy of a [`RingBuffer`] plus an `active` flag
///
/// At most one backup is outstanding. `capture` while active is a no-op and
/// `restore_into` leaves the flag set; only [`Snapshot::release`] clears it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot<const N: usize> {
    saved: RingBuffer<N>,
    active: bool,
}

impl<const N: usize> Snapshot<N> {
    /// Empty, inactive snapshot
    pub const fn new() -> Self {
        Self {
            saved: RingBuffer::new(),
            active: false,
        }
    }

    /// Whether a backup is outstanding
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The saved buffer, if a backup is outstanding
    pub fn saved(&self) -> Option<&RingBuffer<N>> {
        self.active.then_some(&self.saved)
    }

    /// Copy `live` into the slot and mark it active
    ///
    /// Returns `false` without touching the slot if a backup is already active.
    pub fn capture(&mut self, live: &RingBuffer<N>) -> bool {
        if self.active {
            return false;
        }
        self.saved.clone_from(live);
        self.active = true;
        true
    }

    /// Overwrite `live` with the saved copy (data, cursors and overflow)
    ///
    /// Returns `false` if no backup is active. The backup stays active.
    pub fn restore_into(&self, live: &mut RingBuffer<N>) -> bool {
        if !self.active {
            return false;
        }
        live.clone_from(&self.saved);
        true
    }

    /// Drop the backup so the next capture can take a fresh one
    ///
    /// Returns whether a backup was active.
    pub fn release(&mut self) -> bool {
        core::mem::replace(&mut self.active, false)
    }
}
