// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Cooperative wait hook used while a transmit flush is stalled.
pub mod blocking;
/// Realtime command classification at ingestion time.
pub mod realtime;
/// USB CDC Serial transport trait.
pub mod usb_cdc;

pub use blocking::{AlwaysWait, BlockingCallback, WaitBudget};
pub use realtime::{NoRealtime, RealtimeHandler};
pub use usb_cdc::UsbCdcProvider;
