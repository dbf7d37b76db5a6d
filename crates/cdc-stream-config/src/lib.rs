// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # cdc-stream Configuration System
//!
//! Type-safe configuration for the USB CDC stream multiplexer with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//! - `no_std` firmware builds (types + validation only)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cdc_stream_config::{load_config, StreamConfig};
//!
//! // Load configuration with automatic file discovery and overrides
//! let config: StreamConfig = load_config(None, None).expect("Failed to load config");
//!
//! println!("Sentinel: {:#04x}", config.rx.sentinel);
//! println!("Block size: {}", config.rx.block_size);
//! ```
//!
//! Byte-valued keys accept TOML hex literals:
//!
//! ```toml
//! [rx]
//! sentinel = 0xA3
//! reset_marker = 0x18
//! block_size = 20
//!
//! [tx]
//! line_ending = "crlf"
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "std")]
pub mod loader;

pub mod types;
pub mod validation;

#[cfg(feature = "std")]
pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config, parse_byte,
    CONFIG_FILE_NAME,
};

pub use types::*;
pub use validation::{validate_config, ConfigValidationError, ValidationReport};

/// Re-export for convenience
pub use serde;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[cfg(feature = "std")]
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[cfg(feature = "std")]
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[cfg(feature = "std")]
    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("{0}")]
    ValidationError(ValidationReport),
}

#[cfg(feature = "std")]
impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = StreamConfig::default();
        assert!(validate_config(&config).is_ok());
    }
}
