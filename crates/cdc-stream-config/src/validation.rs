// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent, within valid ranges, and don't collide with each other.

use core::fmt;

use heapless::Vec;

use crate::types::{StreamConfig, ASCII_LF, MAX_RX_BLOCK_SIZE};
use crate::{ConfigError, ConfigResult};

/// Most problems reported in one validation pass
pub const MAX_VALIDATION_ERRORS: usize = 8;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Two roles share one byte value
    ByteConflict {
        field1: &'static str,
        field2: &'static str,
        byte: u8,
    },
    /// Value outside its allowed range
    OutOfRange {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByteConflict {
                field1,
                field2,
                byte,
            } => {
                write!(f, "Byte conflict: {} and {} both use {:#04x}", field1, field2, byte)
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                write!(
                    f,
                    "{} = {} is outside valid range ({}-{})",
                    field, value, min, max
                )
            }
        }
    }
}

/// All problems found by [`validate_config`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<ConfigValidationError, MAX_VALIDATION_ERRORS>,
}

impl ValidationReport {
    fn push(&mut self, error: ConfigValidationError) {
        // Past MAX_VALIDATION_ERRORS the first problems are enough to act on
        let _ = self.errors.push(error);
    }

    /// Reported problems
    pub fn errors(&self) -> &[ConfigValidationError] {
        &self.errors
    }

    /// True if nothing was reported
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration validation failed:")?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Value ranges (block size, write threshold)
/// - Byte role conflicts (sentinel vs reset marker vs realtime set)
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &StreamConfig) -> ConfigResult<()> {
    let mut report = ValidationReport::default();

    validate_value_ranges(config, &mut report);
    validate_byte_roles(config, &mut report);

    if !report.is_empty() {
        return Err(ConfigError::ValidationError(report));
    }

    Ok(())
}

/// Validate value ranges and constraints
fn validate_value_ranges(config: &StreamConfig, report: &mut ValidationReport) {
    if config.rx.block_size == 0 || config.rx.block_size > MAX_RX_BLOCK_SIZE {
        report.push(ConfigValidationError::OutOfRange {
            field: "rx.block_size",
            value: config.rx.block_size,
            min: 1,
            max: MAX_RX_BLOCK_SIZE,
        });
    }

    // A threshold at or above a full USB FS packet would never let a write through
    if config.tx.write_threshold >= 64 {
        report.push(ConfigValidationError::OutOfRange {
            field: "tx.write_threshold",
            value: config.tx.write_threshold,
            min: 0,
            max: 63,
        });
    }
}

/// Validate that the sentinel, reset marker and realtime set do not overlap
fn validate_byte_roles(config: &StreamConfig, report: &mut ValidationReport) {
    if config.rx.sentinel == config.rx.reset_marker {
        report.push(ConfigValidationError::ByteConflict {
            field1: "rx.sentinel",
            field2: "rx.reset_marker",
            byte: config.rx.sentinel,
        });
    }

    if config.realtime.contains(config.rx.sentinel) {
        report.push(ConfigValidationError::ByteConflict {
            field1: "rx.sentinel",
            field2: "realtime.commands",
            byte: config.rx.sentinel,
        });
    }

    if config.realtime.contains(ASCII_LF) {
        report.push(ConfigValidationError::ByteConflict {
            field1: "line feed",
            field2: "realtime.commands",
            byte: ASCII_LF,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CMD_TOOL_ACK;

    #[test]
    fn test_block_size_range() {
        let mut config = StreamConfig::default();
        config.rx.block_size = 0;
        assert!(validate_config(&config).is_err());

        config.rx.block_size = MAX_RX_BLOCK_SIZE + 1;
        assert!(validate_config(&config).is_err());

        config.rx.block_size = MAX_RX_BLOCK_SIZE;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_sentinel_in_realtime_set() {
        let mut config = StreamConfig::default();
        config.realtime.commands.push(CMD_TOOL_ACK).unwrap();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(report)) => {
                assert_eq!(report.errors().len(), 1);
                assert!(matches!(
                    report.errors()[0],
                    ConfigValidationError::ByteConflict {
                        field2: "realtime.commands",
                        ..
                    }
                ));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_collects_all_problems() {
        let mut config = StreamConfig::default();
        config.rx.reset_marker = config.rx.sentinel;
        config.rx.block_size = 0;
        config.tx.write_threshold = 100;

        match validate_config(&config) {
            Err(ConfigError::ValidationError(report)) => {
                assert_eq!(report.errors().len(), 3);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_line_feed_cannot_be_realtime() {
        let mut config = StreamConfig::default();
        config.realtime.commands.push(ASCII_LF).unwrap();
        assert!(validate_config(&config).is_err());
    }
}
