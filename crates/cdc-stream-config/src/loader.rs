// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::types::LineEnding;
use crate::{validate_config, ConfigError, ConfigResult, StreamConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "cdc_stream.toml";

/// Find the stream configuration file
///
/// Search order:
/// 1. `CDC_STREAM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./cdc_stream.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("CDC_STREAM_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by CDC_STREAM_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet CDC_STREAM_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<StreamConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: StreamConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    validate_config(&config)?;

    Ok(config)
}

/// Parse a byte written as decimal (`163`) or hex (`0xA3`)
pub fn parse_byte(value: &str) -> Option<u8> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse::<u8>().ok(),
    }
}

fn parse_line_ending(value: &str) -> Option<LineEnding> {
    match value.trim().to_lowercase().as_str() {
        "lf" => Some(LineEnding::Lf),
        "crlf" => Some(LineEnding::CrLf),
        _ => None,
    }
}

/// Apply one override by dotted key; unknown keys and unparsable values are ignored
fn apply_override(config: &mut StreamConfig, key: &str, value: &str) {
    match key {
        "rx.sentinel" => {
            if let Some(byte) = parse_byte(value) {
                config.rx.sentinel = byte;
            }
        }
        "rx.reset_marker" => {
            if let Some(byte) = parse_byte(value) {
                config.rx.reset_marker = byte;
            }
        }
        "rx.block_size" => {
            if let Ok(size) = value.trim().parse::<usize>() {
                config.rx.block_size = size;
            }
        }
        "tx.reserve_margin" => {
            if let Ok(margin) = value.trim().parse::<usize>() {
                config.tx.reserve_margin = margin;
            }
        }
        "tx.write_threshold" => {
            if let Ok(threshold) = value.trim().parse::<usize>() {
                config.tx.write_threshold = threshold;
            }
        }
        "tx.line_ending" => {
            if let Some(ending) = parse_line_ending(value) {
                config.tx.line_ending = ending;
            }
        }
        _ => {}
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CDC_STREAM_SENTINEL` -> `rx.sentinel`
/// - `CDC_STREAM_RESET_MARKER` -> `rx.reset_marker`
/// - `CDC_STREAM_BLOCK_SIZE` -> `rx.block_size`
/// - `CDC_STREAM_RESERVE_MARGIN` -> `tx.reserve_margin`
/// - `CDC_STREAM_WRITE_THRESHOLD` -> `tx.write_threshold`
/// - `CDC_STREAM_LINE_ENDING` -> `tx.line_ending` (`lf` or `crlf`)
pub fn apply_environment_overrides(config: &mut StreamConfig) {
    const ENV_KEYS: [(&str, &str); 6] = [
        ("CDC_STREAM_SENTINEL", "rx.sentinel"),
        ("CDC_STREAM_RESET_MARKER", "rx.reset_marker"),
        ("CDC_STREAM_BLOCK_SIZE", "rx.block_size"),
        ("CDC_STREAM_RESERVE_MARGIN", "tx.reserve_margin"),
        ("CDC_STREAM_WRITE_THRESHOLD", "tx.write_threshold"),
        ("CDC_STREAM_LINE_ENDING", "tx.line_ending"),
    ];

    for (var, key) in ENV_KEYS {
        if let Ok(value) = env::var(var) {
            apply_override(config, key, &value);
        }
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Dotted keys to values (e.g., `{"rx.sentinel": "0xA3", "tx.line_ending": "lf"}`)
pub fn apply_cli_overrides(config: &mut StreamConfig, cli_args: &HashMap<String, String>) {
    for (key, value) in cli_args {
        apply_override(config, key, value);
    }
}
