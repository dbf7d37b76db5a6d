// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transmit staging buffer with flow-controlled flush
//!
//! Short writes are collected locally and pushed to the transport in one
//! go when a line ends or the staged length passes `max_length`. The flush
//! loop only writes while the transport reports more than `write_threshold`
//! bytes of room, and yields through the host's [`BlockingCallback`] when it
//! cannot make progress.

use cdc_stream_config::{TxConfig, ASCII_LF};
use cdc_stream_hal::{BlockingCallback, UsbCdcProvider};
use tracing::{trace, warn};

use crate::error::{StreamError, StreamResult, TxOutcome};

/// Outbound staging buffer of `M` bytes
pub struct TxStager<const M: usize> {
    staging: [u8; M],
    length: usize,
    max_length: usize,
    write_threshold: usize,
}

impl<const M: usize> TxStager<M> {
    /// Size the stager from the transport's reported write capacity
    ///
    /// `max_length = min(write_capacity, M) - reserve_margin`, saturating at 0.
    pub fn new(write_capacity: usize, config: &TxConfig) -> Self {
        Self {
            staging: [0; M],
            length: 0,
            max_length: write_capacity.min(M).saturating_sub(config.reserve_margin),
            write_threshold: config.write_threshold,
        }
    }

    /// Bytes currently staged
    pub fn pending(&self) -> usize {
        self.length
    }

    /// Staged length above which a flush is forced
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Staging buffer size
    pub const fn capacity(&self) -> usize {
        M
    }

    /// Stage `s`, flushing on a trailing line feed or when past `max_length`
    ///
    /// # Errors
    /// `StagingOverflow` if `s.len() + pending() >= M` (nothing is staged),
    /// `Transport` if a write fails (staging is left empty).
    pub fn write<T, B>(&mut self, usb: &mut T, wait: &mut B, s: &[u8]) -> StreamResult<TxOutcome, T::Error>
    where
        T: UsbCdcProvider,
        B: BlockingCallback,
    {
        let Some(&last) = s.last() else {
            return Ok(TxOutcome::Staged);
        };

        if s.len() + self.length >= M {
            warn!(
                requested = s.len(),
                pending = self.length,
                capacity = M,
                "transmit string refused, staging buffer too small"
            );
            return Err(StreamError::StagingOverflow {
                requested: s.len(),
                pending: self.length,
                capacity: M,
            });
        }

        self.staging[self.length..self.length + s.len()].copy_from_slice(s);
        self.length += s.len();

        if last == ASCII_LF || self.length > self.max_length {
            self.flush(usb, wait)
        } else {
            Ok(TxOutcome::Staged)
        }
    }

    /// Drain everything staged
    pub fn flush<T, B>(&mut self, usb: &mut T, wait: &mut B) -> StreamResult<TxOutcome, T::Error>
    where
        T: UsbCdcProvider,
        B: BlockingCallback,
    {
        let length = core::mem::take(&mut self.length);
        drain(usb, wait, &self.staging[..length], self.write_threshold)
    }

    /// Write `data` straight to the transport through the same flow control
    pub fn write_direct<T, B>(&self, usb: &mut T, wait: &mut B, data: &[u8]) -> StreamResult<TxOutcome, T::Error>
    where
        T: UsbCdcProvider,
        B: BlockingCallback,
    {
        drain(usb, wait, data, self.write_threshold)
    }
}

/// Push `data` to the transport, yielding while it has no room
fn drain<T, B>(usb: &mut T, wait: &mut B, data: &[u8], threshold: usize) -> StreamResult<TxOutcome, T::Error>
where
    T: UsbCdcProvider,
    B: BlockingCallback,
{
    let mut sent = 0;

    while sent < data.len() {
        let mut progressed = false;

        let avail = usb.write_capacity();
        if avail > threshold {
            let chunk = avail.min(data.len() - sent);
            // Drivers may accept less than offered
            let accepted = usb
                .write(&data[sent..sent + chunk])
                .map_err(StreamError::Transport)?
                .min(chunk);
            sent += accepted;
            progressed = accepted > 0;
        }

        if sent < data.len() && !progressed && !wait.keep_waiting() {
            let dropped = data.len() - sent;
            warn!(written = sent, dropped, "transmit flush aborted by host");
            return Ok(TxOutcome::Aborted { written: sent, dropped });
        }
    }

    trace!(written = sent, "transmit flush complete");
    Ok(TxOutcome::Flushed { written: sent })
}
