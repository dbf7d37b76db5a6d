// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Realtime command classifier/consumer
///
/// Called exactly once per ingested byte, before the byte reaches the
/// receive buffer. Returning `true` means the byte was a realtime command and
/// has been fully handled; it must not be buffered.
///
/// Implementations see only the byte. They have no access to receive buffer
/// state.
pub trait RealtimeHandler {
    /// Classify `byte` and dispatch it if it is a realtime command
    ///
    /// # Returns
    /// `true` if the byte was consumed
    fn enqueue_realtime_command(&mut self, byte: u8) -> bool;
}

impl<F> RealtimeHandler for F
where
    F: FnMut(u8) -> bool,
{
    fn enqueue_realtime_command(&mut self, byte: u8) -> bool {
        self(byte)
    }
}

/// Classifier that never consumes anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoRealtime;

impl RealtimeHandler for NoRealtime {
    fn enqueue_realtime_command(&mut self, _byte: u8) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_classifier() {
        let mut seen = 0;
        let mut handler = |b: u8| {
            seen += 1;
            b == b'?'
        };
        assert!(handler.enqueue_realtime_command(b'?'));
        assert!(!handler.enqueue_realtime_command(b'G'));
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_no_realtime() {
        let mut handler = NoRealtime;
        assert!((0..=u8::MAX).all(|b| !handler.enqueue_realtime_command(b)));
    }
}
