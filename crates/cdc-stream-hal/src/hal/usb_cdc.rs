// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! USB CDC (Communications Device Class) transport abstraction
//!
//! This module defines the platform-agnostic trait the stream multiplexer
//! pulls bytes from and pushes bytes into. Platform drivers (SAMD21 USB,
//! RP2040 USB, an in-memory host double) implement it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ UsbSerialStream (cdc-stream-core)            │
//! │ - service()  pulls, classifies, buffers      │
//! │ - write_*()  stages and flushes              │
//! └─────────────────┬────────────────────────────┘
//!                   │ uses
//! ┌─────────────────▼────────────────────────────┐
//! │ UsbCdcProvider trait (THIS FILE)             │
//! │ - available() / read()                       │
//! │ - write_capacity() / write()                 │
//! │ - flush_input()                              │
//! └─────────────────┬────────────────────────────┘
//!                   │ implements
//! ┌─────────────────▼────────────────────────────┐
//! │ Platform Implementation                      │
//! │ - MemoryCdc (host tests and replay tool)     │
//! │ - board USB drivers                          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Enumeration, descriptor setup and interrupt wiring stay in the platform
//! layer; by the time a provider is handed to the stream it is already up.
//!
//! ## Usage
//!
//! ```rust
//! use cdc_stream_hal::{MemoryCdc, UsbCdcProvider};
//!
//! let mut usb = MemoryCdc::new();
//! usb.host_send(b"G0 X1\n");
//!
//! let mut buf = [0u8; 16];
//! let len = usb.read(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"G0 X1\n");
//! ```

/// USB CDC Serial provider trait
///
/// UART-like semantics: `write()` sends data, `read()` receives data. Both
/// are non-blocking; the stream layer owns every wait.
///
/// ## Thread Safety
///
/// Implementations do NOT need to be `Send` or `Sync` - the stream runs in a
/// single cooperative context. If the driver is interrupt-driven underneath
/// it must buffer independently.
pub trait UsbCdcProvider {
    /// Platform-specific error type
    type Error: core::fmt::Debug;

    /// Number of received bytes waiting in the driver
    fn available(&self) -> usize;

    /// Read up to `buffer.len()` bytes
    ///
    /// # Returns
    ///
    /// - `Ok(n)` where `n` is the number of bytes read (0 if no data available)
    /// - `Err(e)` if the read failed
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Free space in the driver TX buffer
    ///
    /// The number of bytes that can be written right now without blocking.
    fn write_capacity(&self) -> usize;

    /// Write data towards the host
    ///
    /// # Returns
    ///
    /// - `Ok(n)` where `n` is the number of bytes accepted (may be less than `data.len()`)
    /// - `Err(e)` if the write failed
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Discard everything the driver has received but not yet handed out
    fn flush_input(&mut self) -> Result<(), Self::Error>;
}

impl<T: UsbCdcProvider + ?Sized> UsbCdcProvider for &mut T {
    type Error = T::Error;

    fn available(&self) -> usize {
        (**self).available()
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        (**self).read(buffer)
    }

    fn write_capacity(&self) -> usize {
        (**self).write_capacity()
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        (**self).write(data)
    }

    fn flush_input(&mut self) -> Result<(), Self::Error> {
        (**self).flush_input()
    }
}
