// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stream error and transmit outcome types

/// Errors surfaced by the stream
///
/// Generic over the transport's error type. None of these are fatal; the
/// stream stays usable after every one of them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError<E> {
    /// The transport driver reported an error
    #[error("transport error: {0:?}")]
    Transport(E),

    /// `write_string` was given more than the staging buffer can hold
    ///
    /// Nothing was staged or flushed. Callers must chunk their output.
    #[error("staging overflow: {requested} bytes requested, {pending} pending, capacity {capacity}")]
    StagingOverflow {
        requested: usize,
        pending: usize,
        capacity: usize,
    },
}

/// Result type alias for stream operations
pub type StreamResult<T, E> = Result<T, StreamError<E>>;

/// What happened to bytes handed to the transmit side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxOutcome {
    /// Bytes were staged; no flush was triggered
    Staged,
    /// Everything was handed to the transport
    Flushed { written: usize },
    /// The blocking callback asked to stop; `dropped` bytes were discarded
    Aborted { written: usize, dropped: usize },
}

impl TxOutcome {
    /// True unless the flush was aborted
    pub fn is_complete(&self) -> bool {
        !matches!(self, TxOutcome::Aborted { .. })
    }

    /// Bytes handed to the transport by this call
    pub fn written(&self) -> usize {
        match *self {
            TxOutcome::Staged => 0,
            TxOutcome::Flushed { written } | TxOutcome::Aborted { written, .. } => written,
        }
    }

    fn dropped(&self) -> usize {
        match *self {
            TxOutcome::Aborted { dropped, .. } => dropped,
            _ => 0,
        }
    }

    /// Combine the outcomes of two writes issued back to back
    ///
    /// An abort in either one makes the result `Aborted`; counts are summed.
    pub fn merge(self, next: TxOutcome) -> TxOutcome {
        let written = self.written() + next.written();
        match (self, next) {
            (TxOutcome::Staged, TxOutcome::Staged) => TxOutcome::Staged,
            (TxOutcome::Aborted { .. }, _) | (_, TxOutcome::Aborted { .. }) => TxOutcome::Aborted {
                written,
                dropped: self.dropped() + next.dropped(),
            },
            _ => TxOutcome::Flushed { written },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_staged_then_flushed() {
        let merged = TxOutcome::Staged.merge(TxOutcome::Flushed { written: 4 });
        assert_eq!(merged, TxOutcome::Flushed { written: 4 });
        assert_eq!(TxOutcome::Staged.merge(TxOutcome::Staged), TxOutcome::Staged);
    }

    #[test]
    fn test_merge_keeps_earlier_abort() {
        let body = TxOutcome::Aborted { written: 3, dropped: 5 };
        let merged = body.merge(TxOutcome::Flushed { written: 2 });
        assert_eq!(merged, TxOutcome::Aborted { written: 5, dropped: 5 });
        assert!(!merged.is_complete());
    }

    #[test]
    fn test_merge_sums_both_aborts() {
        let merged = TxOutcome::Aborted { written: 1, dropped: 2 }.merge(TxOutcome::Aborted { written: 0, dropped: 2 });
        assert_eq!(merged, TxOutcome::Aborted { written: 1, dropped: 4 });
    }
}
