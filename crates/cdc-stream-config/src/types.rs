// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `cdc_stream.toml`.

use heapless::Vec;
use serde::{Deserialize, Serialize};

/// Upper bound for `rx.block_size`; the ingestion scratch buffer is this big
pub const MAX_RX_BLOCK_SIZE: usize = 64;

/// Maximum number of distinct realtime command bytes
pub const MAX_REALTIME_COMMANDS: usize = 32;

/// Tool change acknowledge - restores input after a suspended tool change
pub const CMD_TOOL_ACK: u8 = 0xA3;
/// Soft reset (Ctrl-X)
pub const CMD_RESET: u8 = 0x18;
/// Status report request
pub const CMD_STATUS_REPORT: u8 = b'?';
/// Feed hold
pub const CMD_FEED_HOLD: u8 = b'!';
/// Cycle start / resume
pub const CMD_CYCLE_START: u8 = b'~';
/// Safety door
pub const CMD_SAFETY_DOOR: u8 = 0x84;
/// Jog cancel
pub const CMD_JOG_CANCEL: u8 = 0x85;
/// Full status report request
pub const CMD_STATUS_REPORT_ALL: u8 = 0x87;
/// First feed/rapid/spindle override command
pub const CMD_OVERRIDE_FIRST: u8 = 0x90;
/// Last feed/rapid/spindle override command
pub const CMD_OVERRIDE_LAST: u8 = 0x9D;
/// Spindle stop override
pub const CMD_OVERRIDE_SPINDLE_STOP: u8 = 0x9E;
/// Flood coolant toggle
pub const CMD_OVERRIDE_COOLANT_FLOOD: u8 = 0xA0;
/// Mist coolant toggle
pub const CMD_OVERRIDE_COOLANT_MIST: u8 = 0xA1;

/// Line feed, the transmit flush trigger
pub const ASCII_LF: u8 = 0x0A;
/// Carriage return
pub const ASCII_CR: u8 = 0x0D;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamConfig {
    pub rx: RxConfig,
    pub tx: TxConfig,
    pub realtime: RealtimeConfig,
}

/// Receive path configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RxConfig {
    /// Byte that snapshots the receive buffer and re-enables input
    pub sentinel: u8,
    /// Byte injected by `cancel_pending`
    pub reset_marker: u8,
    /// Maximum bytes pulled from the transport per service tick
    pub block_size: usize,
}

impl Default for RxConfig {
    fn default() -> Self {
        Self {
            sentinel: CMD_TOOL_ACK,
            reset_marker: CMD_RESET,
            block_size: 20,
        }
    }
}

/// Line terminator appended by `write_line`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    #[default]
    CrLf,
}

impl LineEnding {
    /// Terminator bytes
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Lf => b"\n",
            LineEnding::CrLf => b"\r\n",
        }
    }
}

/// Transmit path configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TxConfig {
    pub line_ending: LineEnding,
    /// Subtracted from the transport's write capacity when sizing the staging threshold
    pub reserve_margin: usize,
    /// Write capacity must exceed this before the flush loop writes
    pub write_threshold: usize,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::CrLf,
            reserve_margin: 20,
            write_threshold: 10,
        }
    }
}

/// Realtime command set recognised during ingestion
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RealtimeConfig {
    pub commands: Vec<u8, MAX_REALTIME_COMMANDS>,
}

impl RealtimeConfig {
    /// Whether `byte` is a configured realtime command
    pub fn contains(&self, byte: u8) -> bool {
        self.commands.contains(&byte)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        let mut commands = Vec::new();
        let fixed = [
            CMD_RESET,
            CMD_STATUS_REPORT,
            CMD_FEED_HOLD,
            CMD_CYCLE_START,
            CMD_SAFETY_DOOR,
            CMD_JOG_CANCEL,
            CMD_STATUS_REPORT_ALL,
            CMD_OVERRIDE_SPINDLE_STOP,
            CMD_OVERRIDE_COOLANT_FLOOD,
            CMD_OVERRIDE_COOLANT_MIST,
        ];
        // 10 fixed + 14 overrides, well below MAX_REALTIME_COMMANDS
        let _ = commands.extend_from_slice(&fixed);
        for cmd in CMD_OVERRIDE_FIRST..=CMD_OVERRIDE_LAST {
            let _ = commands.push(cmd);
        }
        Self { commands }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StreamConfig::default();
        assert_eq!(config.rx.sentinel, 0xA3);
        assert_eq!(config.rx.reset_marker, 0x18);
        assert_eq!(config.rx.block_size, 20);
        assert_eq!(config.tx.line_ending.as_bytes(), b"\r\n");
        assert_eq!(config.tx.reserve_margin, 20);
        assert_eq!(config.tx.write_threshold, 10);
    }

    #[test]
    fn test_default_realtime_set() {
        let realtime = RealtimeConfig::default();
        assert_eq!(realtime.commands.len(), 24);
        assert!(realtime.contains(b'?'));
        assert!(realtime.contains(0x95));
        assert!(!realtime.contains(CMD_TOOL_ACK));
        assert!(!realtime.contains(b'G'));
    }
}
