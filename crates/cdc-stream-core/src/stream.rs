// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! USB serial stream controller
//!
//! Owns the receive path, the transmit stager and the three collaborators.
//! The host calls [`UsbSerialStream::service`] once per tick from its
//! realtime loop; the interpreter uses the read/write surface.
//!
//! # Example
//! ```
//! use cdc_stream_config::StreamConfig;
//! use cdc_stream_core::UsbSerialStream;
//! use cdc_stream_hal::{AlwaysWait, MemoryCdc, NoRealtime};
//!
//! let mut stream = UsbSerialStream::new(MemoryCdc::new(), NoRealtime, AlwaysWait, &StreamConfig::default());
//! stream.transport_mut().host_send(b"$I\n");
//! stream.service().unwrap();
//! assert_eq!(stream.read(), Some(b'$'));
//!
//! stream.write_line("ok").unwrap();
//! assert_eq!(stream.transport().transmitted(), b"ok\r\n");
//! ```

use cdc_stream_config::{LineEnding, StreamConfig};
use cdc_stream_hal::{BlockingCallback, RealtimeHandler, UsbCdcProvider};
use tracing::debug;

use crate::error::{StreamError, StreamResult, TxOutcome};
use crate::ingest::IngestReport;
use crate::read_mode::ReadMode;
use crate::rx_path::RxPath;
use crate::tx_stager::TxStager;

/// Default receive buffer size
pub const RX_BUFFER_SIZE: usize = 1024;

/// Default transmit staging size
pub const BLOCK_TX_BUFFER_SIZE: usize = 256;

/// Character stream over a USB CDC transport
///
/// - `T`: transport
/// - `R`: realtime command handler, called for every ingested byte
/// - `B`: callback consulted while a transmit flush is stalled
/// - `RX`: receive ring buffer size (power of two)
/// - `TX`: transmit staging size
pub struct UsbSerialStream<T, R, B, const RX: usize = RX_BUFFER_SIZE, const TX: usize = BLOCK_TX_BUFFER_SIZE> {
    usb: T,
    realtime: R,
    wait: B,
    rx: RxPath<RX>,
    tx: TxStager<TX>,
    line_ending: LineEnding,
}

impl<T, R, B> UsbSerialStream<T, R, B>
where
    T: UsbCdcProvider,
    R: RealtimeHandler,
    B: BlockingCallback,
{
    /// Stream with the default buffer sizes
    pub fn new(usb: T, realtime: R, wait: B, config: &StreamConfig) -> Self {
        Self::with_buffers(usb, realtime, wait, config)
    }
}

impl<T, R, B, const RX: usize, const TX: usize> UsbSerialStream<T, R, B, RX, TX>
where
    T: UsbCdcProvider,
    R: RealtimeHandler,
    B: BlockingCallback,
{
    /// Stream with caller-chosen buffer sizes
    ///
    /// The staging flush threshold is sized from the transport's write
    /// capacity at this point.
    pub fn with_buffers(usb: T, realtime: R, wait: B, config: &StreamConfig) -> Self {
        let tx = TxStager::new(usb.write_capacity(), &config.tx);
        debug!(
            rx_size = RX,
            tx_size = TX,
            tx_max_length = tx.max_length(),
            block_size = config.rx.block_size,
            "usb serial stream created"
        );
        Self {
            usb,
            realtime,
            wait,
            rx: RxPath::new(&config.rx),
            tx,
            line_ending: config.tx.line_ending,
        }
    }

    /// Run one ingestion tick
    pub fn service(&mut self) -> StreamResult<IngestReport, T::Error> {
        self.rx.ingest(&mut self.usb, &mut self.realtime)
    }

    // ---- Receive ----

    /// Next byte for the interpreter
    pub fn read(&mut self) -> Option<u8> {
        self.rx.read()
    }

    pub fn rx_count(&self) -> usize {
        self.rx.count()
    }

    pub fn rx_free(&self) -> usize {
        self.rx.free()
    }

    pub fn rx_overflowed(&self) -> bool {
        self.rx.overflowed()
    }

    /// Discard input in the transport and the receive buffer
    ///
    /// Clears the overflow flag. The backup is not touched. The receive
    /// buffer is emptied even when the transport reports an error.
    pub fn flush_input(&mut self) -> Result<(), StreamError<T::Error>> {
        self.rx.flush();
        self.usb.flush_input().map_err(StreamError::Transport)
    }

    /// Replace unread input with the reset marker
    pub fn cancel_pending(&mut self) {
        self.rx.cancel_pending();
    }

    /// See [`RxPath::suspend`]
    pub fn suspend(&mut self, suspend: bool) -> bool {
        self.rx.suspend(suspend)
    }

    pub fn read_mode(&self) -> ReadMode {
        self.rx.mode()
    }

    pub fn backup_active(&self) -> bool {
        self.rx.backup_active()
    }

    /// Clear the backup so the next sentinel is honored again
    pub fn release_backup(&mut self) -> bool {
        self.rx.release_backup()
    }

    // ---- Transmit ----

    /// Stage `s`; flushes on a trailing line feed or a full stage
    pub fn write_string(&mut self, s: &str) -> StreamResult<TxOutcome, T::Error> {
        self.tx.write(&mut self.usb, &mut self.wait, s.as_bytes())
    }

    /// Stage `s` followed by the configured line ending
    ///
    /// The two writes are reported as one outcome; if either was aborted the
    /// result is `Aborted` with both counts summed.
    pub fn write_line(&mut self, s: &str) -> StreamResult<TxOutcome, T::Error> {
        let body = self.tx.write(&mut self.usb, &mut self.wait, s.as_bytes())?;
        let ending = self
            .tx
            .write(&mut self.usb, &mut self.wait, self.line_ending.as_bytes())?;
        Ok(body.merge(ending))
    }

    /// Write one byte straight to the transport
    pub fn write_char(&mut self, c: u8) -> StreamResult<TxOutcome, T::Error> {
        self.write_bytes(&[c])
    }

    /// Write `data` straight to the transport, bypassing staging
    pub fn write_bytes(&mut self, data: &[u8]) -> StreamResult<TxOutcome, T::Error> {
        self.tx.write_direct(&mut self.usb, &mut self.wait, data)
    }

    /// Drain whatever is staged
    pub fn flush_output(&mut self) -> StreamResult<TxOutcome, T::Error> {
        self.tx.flush(&mut self.usb, &mut self.wait)
    }

    pub fn tx_pending(&self) -> usize {
        self.tx.pending()
    }

    pub fn tx_max_length(&self) -> usize {
        self.tx.max_length()
    }

    // ---- Parts ----

    pub fn transport(&self) -> &T {
        &self.usb
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.usb
    }

    pub fn realtime(&self) -> &R {
        &self.realtime
    }

    pub fn realtime_mut(&mut self) -> &mut R {
        &mut self.realtime
    }

    /// Give back the collaborators
    pub fn into_parts(self) -> (T, R, B) {
        (self.usb, self.realtime, self.wait)
    }
}
