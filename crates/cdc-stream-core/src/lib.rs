// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# cdc-stream-core

Platform-agnostic USB CDC character stream.

Sits between a raw transport and a command interpreter:

```text
transport ──► ingest ──┬──► realtime handler
                       └──► RingBuffer ──► ReadMode ──► interpreter
interpreter ──► TxStager ──► transport (yields through BlockingCallback)
```

A tool-change acknowledgment byte arriving in the stream backs up the receive
buffer and re-enables reads; `suspend(false)` puts the backed-up data back.

## Features
- `std`: enables std support in the dependencies (tracing, errors)
- `defmt`: `defmt::Format` for the plain data types
*/

#![cfg_attr(not(feature = "std"), no_std)]

pub mod error;
pub mod ingest;
pub mod read_mode;
pub mod realtime_queue;
pub mod ring_buffer;
pub mod rx_path;
pub mod snapshot;
pub mod stream;
pub mod tx_stager;

pub use error::{StreamError, StreamResult, TxOutcome};
pub use ingest::IngestReport;
pub use read_mode::ReadMode;
pub use realtime_queue::{RealtimeQueue, REALTIME_QUEUE_DEPTH};
pub use ring_buffer::RingBuffer;
pub use rx_path::RxPath;
pub use snapshot::Snapshot;
pub use stream::{UsbSerialStream, BLOCK_TX_BUFFER_SIZE, RX_BUFFER_SIZE};
pub use tx_stager::TxStager;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
