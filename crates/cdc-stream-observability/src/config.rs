// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Observability configuration types

use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    pub level: String,

    /// Print the event target (module path)
    pub with_target: bool,

    /// Colourise console output
    pub ansi: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        ObservabilityConfig {
            level: "info".to_string(),
            with_target: false,
            ansi: true,
        }
    }
}
