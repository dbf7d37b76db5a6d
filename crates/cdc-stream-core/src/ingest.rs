// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-tick ingestion of transport bytes
//!
//! Each byte goes to exactly one place, checked in this order:
//!
//! ```text
//! sentinel && no backup ──► snapshot + collapse + ReadMode::Normal
//! realtime command      ──► RealtimeHandler (never buffered)
//! anything else         ──► RingBuffer::append (dropped on overflow)
//! ```

use cdc_stream_config::MAX_RX_BLOCK_SIZE;
use cdc_stream_hal::{RealtimeHandler, UsbCdcProvider};
use tracing::{debug, trace, warn};

use crate::error::{StreamError, StreamResult};
use crate::read_mode::ReadMode;
use crate::rx_path::RxPath;

/// Counters for a single ingestion tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IngestReport {
    /// Bytes read from the transport
    pub received: usize,
    /// Bytes appended to the receive buffer
    pub buffered: usize,
    /// Bytes consumed by the realtime handler
    pub realtime: usize,
    /// Whether the sentinel triggered a snapshot this tick
    pub sentinel: bool,
    /// Bytes lost to overflow
    pub dropped: usize,
}

impl IngestReport {
    pub fn is_idle(&self) -> bool {
        self.received == 0
    }
}

impl<const N: usize> RxPath<N> {
    /// Pull one block from the transport and route every byte
    ///
    /// Reads at most `min(available, free, block_size)` bytes. A sentinel
    /// seen while a backup is already active is passed on like any other
    /// byte.
    pub fn ingest<T, R>(&mut self, usb: &mut T, realtime: &mut R) -> StreamResult<IngestReport, T::Error>
    where
        T: UsbCdcProvider,
        R: RealtimeHandler,
    {
        let mut report = IngestReport::default();

        let want = usb.available().min(self.buffer.free()).min(self.block_size);
        if want == 0 {
            return Ok(report);
        }

        let mut scratch = [0u8; MAX_RX_BLOCK_SIZE];
        let got = usb
            .read(&mut scratch[..want])
            .map_err(StreamError::Transport)?
            .min(want);
        report.received = got;

        let was_overflowed = self.buffer.overflowed();

        for &byte in &scratch[..got] {
            if byte == self.sentinel && !self.backup.is_active() {
                self.backup.capture(&self.buffer);
                self.buffer.collapse();
                self.mode = ReadMode::Normal;
                report.sentinel = true;
                debug!(
                    saved = self.backup.saved().map_or(0, |b| b.count()),
                    "tool change acknowledged, receive buffer backed up"
                );
            } else if realtime.enqueue_realtime_command(byte) {
                report.realtime += 1;
            } else if self.buffer.append(byte) {
                report.buffered += 1;
            } else {
                report.dropped += 1;
            }
        }

        if !was_overflowed && self.buffer.overflowed() {
            warn!(
                capacity = self.buffer.capacity(),
                dropped = report.dropped,
                "receive buffer overflow"
            );
        }

        trace!(
            received = report.received,
            buffered = report.buffered,
            realtime = report.realtime,
            "ingest tick"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdc_stream_config::{RxConfig, CMD_TOOL_ACK};
    use cdc_stream_hal::{MemoryCdc, NoRealtime};

    fn rx<const N: usize>() -> RxPath<N> {
        RxPath::new(&RxConfig::default())
    }

    fn drain<const N: usize>(rx: &mut RxPath<N>, out: &mut [u8]) -> usize {
        let mut n = 0;
        while let Some(byte) = rx.read() {
            out[n] = byte;
            n += 1;
        }
        n
    }

    #[test]
    fn test_plain_bytes_are_buffered() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<64>();
        usb.host_send(b"G1 X2\n");

        let report = rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        assert_eq!(report.received, 6);
        assert_eq!(report.buffered, 6);
        assert_eq!(rx.count(), 6);
    }

    #[test]
    fn test_block_size_limits_each_tick() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<128>();
        usb.host_send(&[b'x'; 50]);

        assert_eq!(rx.ingest(&mut usb, &mut NoRealtime).unwrap().received, 20);
        assert_eq!(rx.ingest(&mut usb, &mut NoRealtime).unwrap().received, 20);
        assert_eq!(rx.ingest(&mut usb, &mut NoRealtime).unwrap().received, 10);
        assert!(rx.ingest(&mut usb, &mut NoRealtime).unwrap().is_idle());
        assert_eq!(rx.count(), 50);
    }

    #[test]
    fn test_free_space_limits_read() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<8>();
        usb.host_send(b"0123456789");

        assert_eq!(rx.ingest(&mut usb, &mut NoRealtime).unwrap().received, 7);
        // Buffer full: nothing is pulled, the transport keeps the rest
        assert!(rx.ingest(&mut usb, &mut NoRealtime).unwrap().is_idle());
        assert_eq!(usb.available(), 3);
        assert!(!rx.overflowed());
    }

    #[test]
    fn test_realtime_bytes_never_buffered() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<64>();
        let mut seen = [0u8; 4];
        let mut n = 0;
        let mut handler = |b: u8| {
            if b == b'?' || b == b'!' {
                seen[n] = b;
                n += 1;
                true
            } else {
                false
            }
        };

        usb.host_send(b"G?0!");
        let report = rx.ingest(&mut usb, &mut handler).unwrap();
        assert_eq!(report.realtime, 2);
        assert_eq!(report.buffered, 2);
        assert_eq!(&seen[..2], b"?!");

        let mut out = [0u8; 8];
        let len = drain(&mut rx, &mut out);
        assert_eq!(&out[..len], b"G0");
    }

    #[test]
    fn test_tool_change_backup_and_resume() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<64>();

        usb.host_send(b"AB");
        rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        rx.suspend(true);

        usb.host_send(&[CMD_TOOL_ACK]);
        let report = rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        assert!(report.sentinel);
        assert_eq!(report.buffered, 0);
        assert_eq!(rx.mode(), ReadMode::Normal);
        assert!(rx.backup_active());
        assert_eq!(rx.count(), 0);

        usb.host_send(b"CD");
        rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        assert_eq!(rx.count(), 2);

        assert!(rx.suspend(false));
        let mut out = [0u8; 8];
        let len = drain(&mut rx, &mut out);
        assert_eq!(&out[..len], b"AB");
    }

    #[test]
    fn test_second_sentinel_keeps_first_backup() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<64>();
        let mut handler = |b: u8| b == CMD_TOOL_ACK;

        usb.host_send(b"AB");
        usb.host_send(&[CMD_TOOL_ACK]);
        usb.host_send(b"CD");
        usb.host_send(&[CMD_TOOL_ACK]);
        let report = rx.ingest(&mut usb, &mut handler).unwrap();

        // The second sentinel falls through to the classifier
        assert_eq!(report.realtime, 1);
        assert_eq!(rx.backup.saved().map(|b| b.count()), Some(2));

        rx.suspend(false);
        let mut out = [0u8; 8];
        let len = drain(&mut rx, &mut out);
        assert_eq!(&out[..len], b"AB");
    }

    #[test]
    fn test_sentinel_checked_before_classifier() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<64>();
        let mut consulted = false;
        let mut handler = |_b: u8| {
            consulted = true;
            true
        };

        usb.host_send(&[CMD_TOOL_ACK]);
        let report = rx.ingest(&mut usb, &mut handler).unwrap();
        assert!(report.sentinel);
        assert_eq!(report.realtime, 0);
        assert!(!consulted);
    }

    #[test]
    fn test_suspended_reads_nothing_while_ingesting() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<64>();
        rx.suspend(true);

        for _ in 0..3 {
            usb.host_send(b"G0\n");
            rx.ingest(&mut usb, &mut NoRealtime).unwrap();
            assert_eq!(rx.read(), None);
        }
        assert_eq!(rx.count(), 9);
    }

    #[test]
    fn test_backup_stays_active_after_restore() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<64>();

        usb.host_send(b"A");
        usb.host_send(&[CMD_TOOL_ACK]);
        rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        rx.suspend(false);
        assert!(rx.backup_active());

        // A later sentinel is not a tool change ack any more
        usb.host_send(&[CMD_TOOL_ACK]);
        let report = rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        assert!(!report.sentinel);
        assert_eq!(report.buffered, 1);

        // Until the owner releases it
        assert!(rx.release_backup());
        usb.host_send(&[CMD_TOOL_ACK]);
        assert!(rx.ingest(&mut usb, &mut NoRealtime).unwrap().sentinel);
    }

    #[test]
    fn test_sentinel_collapse_frees_space() {
        let mut usb = MemoryCdc::new();
        let mut rx = rx::<8>();
        usb.host_send(b"abcdef");
        rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        assert_eq!(rx.free(), 1);

        usb.host_send(&[CMD_TOOL_ACK]);
        usb.host_send(b"xyz");
        // Only one slot was free when the tick started
        let report = rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        assert_eq!(report.received, 1);
        assert!(report.sentinel);
        assert_eq!(rx.free(), 7);

        let report = rx.ingest(&mut usb, &mut NoRealtime).unwrap();
        assert_eq!(report.buffered, 3);
        assert_eq!(report.dropped, 0);
        assert!(!rx.overflowed());
    }
}
