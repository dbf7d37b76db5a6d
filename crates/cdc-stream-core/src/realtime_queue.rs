// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Bounded queue of realtime command bytes
//!
//! A ready-made [`RealtimeHandler`] for hosts that service realtime commands
//! from their main loop instead of inside ingestion.

use cdc_stream_config::RealtimeConfig;
use cdc_stream_hal::RealtimeHandler;
use heapless::Deque;
use tracing::warn;

/// Default queue depth
pub const REALTIME_QUEUE_DEPTH: usize = 16;

/// Consumes configured command bytes and queues them for the host
///
/// Membership is a 256-bit set built once from [`RealtimeConfig`]. A command
/// that arrives while the queue is full is still consumed, so it can never
/// reach the interpreter, and is counted in [`RealtimeQueue::dropped`].
#[derive(Debug, Clone)]
pub struct RealtimeQueue<const Q: usize = REALTIME_QUEUE_DEPTH> {
    commands: [u32; 8],
    pending: Deque<u8, Q>,
    dropped: usize,
}

impl RealtimeQueue {
    /// Queue of the default depth
    pub fn new(config: &RealtimeConfig) -> Self {
        Self::from_config(config)
    }
}

impl<const Q: usize> RealtimeQueue<Q> {
    /// Queue of depth `Q`
    pub fn from_config(config: &RealtimeConfig) -> Self {
        let mut commands = [0u32; 8];
        for &byte in config.commands.iter() {
            commands[usize::from(byte >> 5)] |= 1 << (byte & 31);
        }
        Self {
            commands,
            pending: Deque::new(),
            dropped: 0,
        }
    }

    /// Whether `byte` is in the command set
    pub fn is_command(&self, byte: u8) -> bool {
        self.commands[usize::from(byte >> 5)] & (1 << (byte & 31)) != 0
    }

    /// Oldest queued command
    pub fn pop(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Commands consumed while the queue was full
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<const Q: usize> RealtimeHandler for RealtimeQueue<Q> {
    fn enqueue_realtime_command(&mut self, byte: u8) -> bool {
        if !self.is_command(byte) {
            return false;
        }
        if self.pending.push_back(byte).is_err() {
            self.dropped += 1;
            warn!(command = byte, "realtime queue full, command dropped");
        }
        true
    }
}
