// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Receive path: live buffer, tool-change backup and read mode
//!
//! Ingestion lives in [`crate::ingest`]; this module holds the state it
//! mutates and the interpreter-facing operations on it.

use cdc_stream_config::{RxConfig, MAX_RX_BLOCK_SIZE};
use tracing::debug;

use crate::read_mode::ReadMode;
use crate::ring_buffer::RingBuffer;
use crate::snapshot::Snapshot;

/// Receive side of a stream with an `N`-byte ring buffer
#[derive(Debug, Clone)]
pub struct RxPath<const N: usize> {
    pub(crate) buffer: RingBuffer<N>,
    pub(crate) backup: Snapshot<N>,
    pub(crate) mode: ReadMode,
    pub(crate) sentinel: u8,
    pub(crate) reset_marker: u8,
    pub(crate) block_size: usize,
}

impl<const N: usize> RxPath<N> {
    /// Empty receive path in `Normal` mode
    ///
    /// `block_size` is clamped to `1..=MAX_RX_BLOCK_SIZE`.
    pub fn new(config: &RxConfig) -> Self {
        Self {
            buffer: RingBuffer::new(),
            backup: Snapshot::new(),
            mode: ReadMode::Normal,
            sentinel: config.sentinel,
            reset_marker: config.reset_marker,
            block_size: config.block_size.clamp(1, MAX_RX_BLOCK_SIZE),
        }
    }

    /// Next byte for the interpreter, or `None` when empty or suspended
    pub fn read(&mut self) -> Option<u8> {
        self.mode.read(&mut self.buffer)
    }

    /// Suspend reads, or restore the backup
    ///
    /// `true` switches to `Suspended`. `false` copies the backup over the
    /// live buffer if one is active and leaves the mode alone. Returns
    /// whether the live buffer holds data afterwards.
    pub fn suspend(&mut self, suspend: bool) -> bool {
        if suspend {
            debug!(buffered = self.buffer.count(), "receive suspended");
            self.mode = ReadMode::Suspended;
        } else if self.backup.restore_into(&mut self.buffer) {
            debug!(restored = self.buffer.count(), "receive buffer restored from backup");
        }
        !self.buffer.is_empty()
    }

    /// Discard all buffered input and clear overflow
    pub fn flush(&mut self) {
        self.buffer.flush();
    }

    /// Supersede unread input with the reset marker
    pub fn cancel_pending(&mut self) {
        debug!(discarded = self.buffer.count(), "pending input cancelled");
        self.buffer.cancel_pending(self.reset_marker);
    }

    /// Drop the backup so the next sentinel takes a fresh one
    pub fn release_backup(&mut self) -> bool {
        self.backup.release()
    }

    pub fn count(&self) -> usize {
        self.buffer.count()
    }

    pub fn free(&self) -> usize {
        self.buffer.free()
    }

    pub fn overflowed(&self) -> bool {
        self.buffer.overflowed()
    }

    pub fn mode(&self) -> ReadMode {
        self.mode
    }

    pub fn backup_active(&self) -> bool {
        self.backup.is_active()
    }

    /// Per-tick ingestion limit after clamping
    pub fn block_size(&self) -> usize {
        self.block_size
    }
}
