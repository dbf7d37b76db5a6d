// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! In-memory USB CDC provider
//!
//! Models the two directions of a CDC link with bounded queues:
//!
//! ```text
//! host_send() ──► rx queue ──► read()          (host → device)
//! write()     ──► tx log   ──► transmitted()   (device → host)
//! ```
//!
//! `write_capacity()` can be capped per query to mimic a USB endpoint that
//! only frees a few bytes per frame.

use core::fmt;

use heapless::{Deque, Vec};

use crate::hal::UsbCdcProvider;

/// Bytes the host can queue before `host_send` starts refusing
pub const RX_QUEUE_SIZE: usize = 1024;

/// Bytes the device can transmit before the log must be drained
pub const TX_LOG_SIZE: usize = 4096;

/// Errors reported by [`MemoryCdc`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryCdcError {
    /// Host side closed (DTR dropped)
    Disconnected,
}

impl fmt::Display for MemoryCdcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "USB CDC host disconnected"),
        }
    }
}

/// In-memory USB CDC provider
pub struct MemoryCdc {
    rx: Deque<u8, RX_QUEUE_SIZE>,
    tx: Vec<u8, TX_LOG_SIZE>,
    write_chunk: Option<usize>,
    connected: bool,
    write_calls: usize,
}

impl MemoryCdc {
    /// Connected provider with unbounded (log-limited) write capacity
    pub fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
            write_chunk: None,
            connected: true,
            write_calls: 0,
        }
    }

    /// Provider whose `write_capacity()` never reports more than `chunk`
    pub fn with_write_chunk(chunk: usize) -> Self {
        let mut usb = Self::new();
        usb.write_chunk = Some(chunk);
        usb
    }

    /// Change the per-query write capacity cap (`None` = no cap)
    pub fn set_write_chunk(&mut self, chunk: Option<usize>) {
        self.write_chunk = chunk;
    }

    /// Simulate the host opening or closing the port
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    /// Whether the host side is open
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Simulate the host sending bytes
    ///
    /// Returns how many bytes fit in the receive queue.
    pub fn host_send(&mut self, data: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in data {
            if self.rx.push_back(byte).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Free space in the receive queue
    pub fn rx_space(&self) -> usize {
        self.rx.capacity() - self.rx.len()
    }

    /// Everything written so far
    pub fn transmitted(&self) -> &[u8] {
        &self.tx
    }

    /// Take everything written so far, leaving the log empty
    pub fn take_transmitted(&mut self) -> Vec<u8, TX_LOG_SIZE> {
        core::mem::take(&mut self.tx)
    }

    /// Number of `write()` calls that reached the provider
    pub fn write_calls(&self) -> usize {
        self.write_calls
    }
}

impl Default for MemoryCdc {
    fn default() -> Self {
        Self::new()
    }
}

impl UsbCdcProvider for MemoryCdc {
    type Error = MemoryCdcError;

    fn available(&self) -> usize {
        self.rx.len()
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        let mut len = 0;
        for slot in buffer.iter_mut() {
            match self.rx.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    len += 1;
                }
                None => break,
            }
        }
        Ok(len)
    }

    fn write_capacity(&self) -> usize {
        let space = self.tx.capacity() - self.tx.len();
        match self.write_chunk {
            Some(chunk) => space.min(chunk),
            None => space,
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        if !self.connected {
            return Err(MemoryCdcError::Disconnected);
        }
        self.write_calls += 1;

        let len = data.len().min(self.write_capacity());
        // Cannot fail: len is bounded by the free space
        let _ = self.tx.extend_from_slice(&data[..len]);
        Ok(len)
    }

    fn flush_input(&mut self) -> Result<(), Self::Error> {
        tracing::trace!(discarded = self.rx.len(), "memory cdc input flushed");
        self.rx.clear();
        Ok(())
    }
}
