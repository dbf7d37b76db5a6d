// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

#![no_std]
#![warn(missing_docs)]

//! # cdc-stream HAL
//!
//! Boundary traits for the cdc-stream multiplexer:
//! - **HAL traits** (`hal` module) - transport, realtime classifier, blocking callback
//! - **Platform implementations** (`platforms` module) - the in-memory host transport
//!
//! The multiplexer itself lives in `cdc-stream-core`; nothing here owns any
//! stream state.
//!
//! ## Feature Flags
//! - `defmt` - derive `defmt::Format` on public enums
//! - `std` - forward `std` to `tracing`

/// Hardware abstraction traits shared by all platforms.
pub mod hal;

/// Concrete platform implementations.
pub mod platforms;

pub use hal::{AlwaysWait, BlockingCallback, NoRealtime, RealtimeHandler, UsbCdcProvider, WaitBudget};
pub use platforms::{MemoryCdc, MemoryCdcError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::hal::*;
    pub use crate::platforms::*;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
