// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for cdc-stream host binaries

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::cli::CrateDebugFlags;
use crate::config::ObservabilityConfig;

/// Build the `EnvFilter` for the given flags and base level
pub fn build_filter(debug_flags: &CrateDebugFlags, config: &ObservabilityConfig) -> Result<EnvFilter> {
    let filter = debug_flags.to_filter_string(&config.level);
    EnvFilter::try_new(&filter).with_context(|| format!("Invalid log filter: {}", filter))
}

/// Initialize console logging
///
/// Installs a global `tracing` subscriber writing human-readable lines to
/// stderr. Crates named in `debug_flags` log at `debug`, everything else at
/// `config.level`.
///
/// # Errors
/// Fails if the filter does not parse or a global subscriber is already set.
pub fn init_logging(debug_flags: &CrateDebugFlags, config: &ObservabilityConfig) -> Result<()> {
    let env_filter = build_filter(debug_flags, config)?;

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_ansi(config.ansi)
        .with_file(false)
        .with_line_number(false)
        .with_filter(env_filter);

    Registry::default()
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))
}
