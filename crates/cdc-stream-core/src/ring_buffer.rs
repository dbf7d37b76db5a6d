// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fixed-capacity receive ring buffer
//!
//! Stack-allocated, power-of-two sized, one slot sacrificed so that
//! `head == tail` always means empty.

use core::fmt;

/// Circular byte buffer with a sticky overflow flag
///
/// Usable capacity is `N - 1`. An append that would make `head` catch up
/// with `tail` is dropped and raises `overflow`, which stays set until
/// [`RingBuffer::flush`].
///
/// # Example
/// ```
/// use cdc_stream_core::RingBuffer;
///
/// let mut rx = RingBuffer::<8>::new();
/// for byte in b"abcdefg" {
///     assert!(rx.append(*byte));
/// }
/// assert_eq!(rx.free(), 0);
/// assert!(!rx.append(b'h'));
/// assert!(rx.overflowed());
/// assert_eq!(rx.read(), Some(b'a'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct RingBuffer<const N: usize> {
    data: [u8; N],
    head: usize,
    tail: usize,
    overflow: bool,
}

impl<const N: usize> RingBuffer<N> {
    const MASK: usize = {
        assert!(
            N >= 2 && N.is_power_of_two(),
            "RingBuffer size must be a power of two >= 2"
        );
        N - 1
    };

    /// Create an empty buffer
    pub const fn new() -> Self {
        let _ = Self::MASK;
        Self {
            data: [0; N],
            head: 0,
            tail: 0,
            overflow: false,
        }
    }

    /// Usable capacity (`N - 1`)
    pub const fn capacity(&self) -> usize {
        Self::MASK
    }

    /// Number of buffered bytes
    pub fn count(&self) -> usize {
        self.head.wrapping_sub(self.tail) & Self::MASK
    }

    /// Free slots left
    pub fn free(&self) -> usize {
        Self::MASK - self.count()
    }

    /// True if nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Sticky overflow flag
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    /// Store `byte` at head
    ///
    /// Returns `false` and sets the overflow flag if the buffer is full; the
    /// byte is discarded.
    pub fn append(&mut self, byte: u8) -> bool {
        let next = (self.head + 1) & Self::MASK;
        if next == self.tail {
            self.overflow = true;
            return false;
        }
        self.data[self.head] = byte;
        self.head = next;
        true
    }

    /// Take the byte at tail
    pub fn read(&mut self) -> Option<u8> {
        if self.head == self.tail {
            return None;
        }
        let byte = self.data[self.tail];
        self.tail = (self.tail + 1) & Self::MASK;
        Some(byte)
    }

    /// Reset both cursors to zero and clear overflow
    pub fn flush(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.overflow = false;
    }

    /// Drop unread bytes by moving tail up to head
    pub fn collapse(&mut self) {
        self.tail = self.head;
    }

    /// Replace unread content with `marker`
    ///
    /// The marker is written at head and becomes the only unread byte, so the
    /// next `read` returns it.
    pub fn cancel_pending(&mut self, marker: u8) {
        self.data[self.head] = marker;
        self.tail = self.head;
        self.head = (self.tail + 1) & Self::MASK;
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for RingBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("size", &N)
            .field("head", &self.head)
            .field("tail", &self.tail)
            .field("count", &self.count())
            .field("overflow", &self.overflow)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let rx = RingBuffer::<16>::new();
        assert!(rx.is_empty());
        assert_eq!(rx.count(), 0);
        assert_eq!(rx.free(), 15);
        assert_eq!(rx.capacity(), 15);
        assert!(!rx.overflowed());
    }

    #[test]
    fn test_fill_to_capacity_then_overflow() {
        let mut rx = RingBuffer::<8>::new();
        for byte in b'a'..=b'g' {
            assert!(rx.append(byte));
        }
        assert_eq!(rx.count(), 7);
        assert_eq!(rx.free(), 0);
        assert!(!rx.overflowed());

        assert!(!rx.append(b'h'));
        assert!(rx.overflowed());
        assert_eq!(rx.count(), 7);

        let mut drained = [0u8; 7];
        for slot in drained.iter_mut() {
            *slot = rx.read().unwrap();
        }
        assert_eq!(&drained, b"abcdefg");
        assert_eq!(rx.read(), None);
        // Sticky until flush
        assert!(rx.overflowed());
    }

    #[test]
    fn test_count_never_exceeds_capacity_across_wraps() {
        let mut rx = RingBuffer::<8>::new();
        let mut expected = 0usize;
        // Mixed append/read pattern that wraps the cursors many times
        for step in 0..500u32 {
            let appends = (step % 5) as usize;
            let reads = (step % 3) as usize;
            for i in 0..appends {
                if rx.append(i as u8) {
                    expected += 1;
                } else {
                    assert_eq!(expected, 7);
                    assert!(rx.overflowed());
                }
                assert!(rx.count() <= rx.capacity());
            }
            for _ in 0..reads {
                if rx.read().is_some() {
                    expected -= 1;
                }
            }
            assert_eq!(rx.count(), expected);
            assert_eq!(rx.count() + rx.free(), 7);
        }
    }

    #[test]
    fn test_fifo_order_across_wrap() {
        let mut rx = RingBuffer::<4>::new();
        rx.append(1);
        rx.append(2);
        assert_eq!(rx.read(), Some(1));
        rx.append(3);
        rx.append(4);
        assert_eq!(rx.read(), Some(2));
        assert_eq!(rx.read(), Some(3));
        assert_eq!(rx.read(), Some(4));
        assert_eq!(rx.read(), None);
    }

    #[test]
    fn test_flush_clears_everything() {
        let mut rx = RingBuffer::<4>::new();
        for byte in 0..10 {
            rx.append(byte);
        }
        assert!(rx.overflowed());
        rx.flush();
        assert_eq!(rx.count(), 0);
        assert!(!rx.overflowed());
        assert_eq!(rx.read(), None);
    }

    #[test]
    fn test_collapse_discards_unread() {
        let mut rx = RingBuffer::<8>::new();
        rx.append(b'x');
        rx.append(b'y');
        rx.collapse();
        assert!(rx.is_empty());
        rx.append(b'z');
        assert_eq!(rx.read(), Some(b'z'));
    }

    #[test]
    fn test_cancel_pending_yields_marker_next() {
        let mut rx = RingBuffer::<8>::new();
        rx.append(b'G');
        rx.append(b'0');
        rx.cancel_pending(0x18);
        assert_eq!(rx.count(), 1);
        assert_eq!(rx.read(), Some(0x18));
        assert_eq!(rx.read(), None);
    }

    #[test]
    fn test_cancel_pending_at_wrap_point() {
        let mut rx = RingBuffer::<4>::new();
        for _ in 0..3 {
            rx.append(0);
            rx.read();
        }
        // head == tail == 3, marker goes into the last slot and head wraps to 0
        rx.cancel_pending(0x18);
        assert_eq!(rx.read(), Some(0x18));
        assert!(rx.is_empty());
    }
}
