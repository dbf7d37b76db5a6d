// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # cdc-stream-observability
//!
//! Logging setup for host-side cdc-stream binaries and tests.
//!
//! Firmware builds only emit `tracing` events; whoever links a subscriber
//! decides where they go. On the host this crate installs a
//! `tracing-subscriber` fmt layer filtered per crate.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known cdc-stream crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "cdc-stream",
    "cdc-stream-core",
    "cdc-stream-hal",
    "cdc-stream-config",
    "stream-replay",
];
