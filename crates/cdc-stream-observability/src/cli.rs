// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-crate debug flags
//!
//! `--debug-cdc-stream-core` raises one crate to `debug` while everything
//! else stays at the base level. `--debug-all` raises every known crate.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Environment variable read by [`parse_debug_flags`]
pub const DEBUG_ENV_VAR: &str = "CDC_STREAM_DEBUG";

const FLAG_PREFIX: &str = "--debug-";

/// Crates that log at `debug`
///
/// # Example
/// ```rust
/// use cdc_stream_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(vec!["--debug-cdc-stream-core".to_string()]);
/// assert!(flags.is_enabled("cdc-stream-core"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    enabled: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Collect `--debug-<crate>` and `--debug-all` from `args`; other arguments are ignored
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = Self::default();
        for arg in args {
            if let Some(name) = arg.strip_prefix(FLAG_PREFIX) {
                flags.enable(name);
            }
        }
        flags
    }

    /// Enable one crate by name, or every known crate for `all`
    pub fn enable(&mut self, crate_name: &str) {
        match crate_name.trim() {
            "" => {}
            "all" => self.enabled.extend(KNOWN_CRATES.iter().map(|c| c.to_string())),
            name => {
                self.enabled.insert(name.to_string());
            }
        }
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled.is_empty()
    }

    /// `DEBUG` for enabled crates, `INFO` otherwise
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// `EnvFilter` directives, e.g. `cdc_stream_core=debug,warn`
    ///
    /// Crate names become tracing targets (`-` to `_`); `base_level` comes last.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        self.enabled
            .iter()
            .map(|name| format!("{}=debug", name.replace('-', "_")))
            .chain(std::iter::once(base_level.to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Debug flags from the process arguments plus `CDC_STREAM_DEBUG`
///
/// The variable holds comma-separated crate names or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(value) = env::var(DEBUG_ENV_VAR) {
        value.split(',').for_each(|name| flags.enable(name));
    }
    flags
}

/// Help text for the debug flags
pub fn debug_flags_help() -> String {
    format!(
        "Debug Flags:\n  \
         --debug-all               Debug logging for every crate\n  \
         --debug-<crate>           Debug logging for one crate\n\n\
         Crates: {}\n\n\
         {DEBUG_ENV_VAR}=<crate>[,<crate>] or {DEBUG_ENV_VAR}=all does the same from the environment\n",
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(args(&["--input", "x.nc", "--debug-cdc-stream-core"]));
        assert!(flags.is_enabled("cdc-stream-core"));
        assert!(!flags.is_enabled("cdc-stream-hal"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(args(&["--debug-all"]));
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
        assert!(!flags.is_enabled("all"));
    }

    #[test]
    fn test_filter_string_sorted() {
        let flags = CrateDebugFlags::from_args(args(&["--debug-cdc-stream-hal", "--debug-cdc-stream-core"]));
        assert_eq!(
            flags.to_filter_string("warn"),
            "cdc_stream_core=debug,cdc_stream_hal=debug,warn"
        );
    }

    #[test]
    fn test_filter_string_without_flags() {
        let flags = CrateDebugFlags::from_args(args(&["--input", "capture.bin"]));
        assert!(!flags.any_enabled());
        assert_eq!(flags.to_filter_string("info"), "info");
    }

    #[test]
    fn test_enable_ignores_blank_names() {
        let mut flags = CrateDebugFlags::default();
        " cdc-stream-config , ,".split(',').for_each(|n| flags.enable(n));
        assert!(flags.is_enabled("cdc-stream-config"));
        assert_eq!(flags.to_filter_string("info"), "cdc_stream_config=debug,info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(args(&["--debug-cdc-stream-core"]));
        assert_eq!(flags.log_level("cdc-stream-core"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("cdc-stream-config"), tracing::Level::INFO);
    }

    #[test]
    fn test_help_lists_known_crates() {
        let help = debug_flags_help();
        for crate_name in KNOWN_CRATES {
            assert!(help.contains(crate_name));
        }
    }
}
