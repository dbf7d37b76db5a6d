// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Normal and suspended read behavior

use crate::ring_buffer::RingBuffer;

/// Current read behavior seen by the interpreter
///
/// ```text
///            suspend(true)
///   Normal ───────────────► Suspended
///     ▲                         │
///     └──── sentinel byte ──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadMode {
    /// Reads pull from the receive buffer
    #[default]
    Normal,
    /// Reads always report no data; ingestion continues underneath
    Suspended,
}

impl ReadMode {
    /// Read through this mode
    pub fn read<const N: usize>(self, rx: &mut RingBuffer<N>) -> Option<u8> {
        match self {
            ReadMode::Normal => rx.read(),
            ReadMode::Suspended => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspended_hides_data() {
        let mut rx = RingBuffer::<8>::new();
        rx.append(b'x');
        assert_eq!(ReadMode::Suspended.read(&mut rx), None);
        assert_eq!(rx.count(), 1);
        assert_eq!(ReadMode::Normal.read(&mut rx), Some(b'x'));
    }
}
