// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # cdc-stream - USB CDC character-stream multiplexer
//!
//! A poll-safe stream that sits between a USB CDC transport and a line-based
//! command interpreter. It buffers received bytes, pulls realtime control
//! bytes out of the stream before the interpreter can see them, stages and
//! flushes outbound text under flow control, and backs up pending input when
//! a tool-change acknowledgment arrives.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! cdc-stream = "0.1"  # Default: std (config loader, logging, host tool)
//! ```
//!
//! ```rust
//! use cdc_stream::prelude::*;
//!
//! let config = StreamConfig::default();
//! let realtime = RealtimeQueue::new(&config.realtime);
//! let mut stream = UsbSerialStream::new(MemoryCdc::new(), realtime, AlwaysWait, &config);
//!
//! // Host sends a line with a status request in the middle of it
//! stream.transport_mut().host_send(b"G0?X1\n");
//! stream.service()?;
//!
//! assert_eq!(stream.realtime_mut().pop(), Some(b'?'));
//! assert_eq!(stream.rx_count(), 5);
//!
//! stream.write_line("ok")?;
//! assert_eq!(stream.transport().transmitted(), b"ok\r\n");
//! # Ok::<(), StreamError<MemoryCdcError>>(())
//! ```
//!
//! ## Feature Flags
//!
//! - **`std`** (default): TOML config loader, `tracing-subscriber` setup,
//!   the `stream_replay` host tool
//! - **`defmt`**: `defmt::Format` on the plain data types for firmware logging
//!
//! Firmware builds use `default-features = false`; the stream itself is
//! `no_std` and allocation-free.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: cdc-stream-config                          │
//! │  (StreamConfig, byte constants, validation)             │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Boundary: cdc-stream-hal                               │
//! │  (UsbCdcProvider, RealtimeHandler, BlockingCallback)    │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Stream: cdc-stream-core                                │
//! │  (RingBuffer, Snapshot, ingest, TxStager, stream)       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

#![cfg_attr(not(feature = "std"), no_std)]

// Re-export foundation
pub use cdc_stream_config as config;

// Re-export boundary traits
pub use cdc_stream_hal as hal;

// Re-export the stream
pub use cdc_stream_core as stream;

// Re-export host infrastructure
#[cfg(feature = "std")]
pub use cdc_stream_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{LineEnding, RealtimeConfig, RxConfig, StreamConfig, TxConfig};
    pub use crate::stream::{
        IngestReport, ReadMode, RealtimeQueue, RingBuffer, StreamError, StreamResult, TxOutcome, UsbSerialStream,
    };
    pub use crate::hal::{
        AlwaysWait, BlockingCallback, MemoryCdc, MemoryCdcError, NoRealtime, RealtimeHandler, UsbCdcProvider,
        WaitBudget,
    };
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
