// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Platform implementations of the HAL traits
//!
//! Board drivers live in firmware crates. The in-memory provider here backs
//! host-side tests and the `stream_replay` tool.

/// In-memory USB CDC double (host builds, tests)
pub mod memory;

pub use memory::{MemoryCdc, MemoryCdcError, RX_QUEUE_SIZE, TX_LOG_SIZE};
