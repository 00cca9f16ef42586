//! # Capture buffer
//!
//! A fixed-capacity ring buffer of inter-edge intervals, shared between
//! the edge-interrupt context (writer) and the normal-priority context
//! (reader).
//!
//! The buffer uses atomic slots and an atomic write index so it is
//! [`Sync`] without locks: the interrupt handler calls
//! [`CaptureBuffer::push`], the decoding side calls
//! [`CaptureBuffer::snapshot`] once the transmission is over. The two
//! sides are expected to be temporally separated; the buffer does not
//! detect a reader overlapping the writer. The monotonically increasing
//! capture counter exposed by [`CaptureBuffer::captures`] is the
//! completion signal the decoding side can poll to establish that
//! separation without a blind delay.

use core::array;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Number of interval slots in a [`CaptureBuffer`].
///
/// Sized for one DHT transmission: two leader/handshake pulses followed
/// by the 40 data pulses.
pub const CAPACITY: usize = 42;

/// A bounded ring buffer of captured tick intervals.
///
/// Construction is `const`, so the buffer can live in a `static` and be
/// reached from both an interrupt handler and the main context:
///
/// ```
/// use dht_capture::buffer::CaptureBuffer;
///
/// static CAPTURES: CaptureBuffer = CaptureBuffer::new();
///
/// CAPTURES.push(5);
/// assert_eq!(CAPTURES.snapshot()[0], 5);
/// ```
#[derive(Debug)]
pub struct CaptureBuffer {
    slots: [AtomicU32; CAPACITY],
    write_index: AtomicUsize,
    captures: AtomicUsize,
}

impl CaptureBuffer {
    /// Creates an empty buffer with all slots zeroed.
    #[must_use]
    pub const fn new() -> Self {
        const ZERO: AtomicU32 = AtomicU32::new(0);

        Self {
            slots: [ZERO; CAPACITY],
            write_index: AtomicUsize::new(0),
            captures: AtomicUsize::new(0),
        }
    }

    /// Appends an interval at the current write position.
    ///
    /// The write index advances by one and wraps modulo [`CAPACITY`], so
    /// after more than [`CAPACITY`] pushes the buffer holds the most
    /// recent [`CAPACITY`] intervals. Intended to be called from the
    /// edge-interrupt context only; the buffer has a single-writer
    /// contract.
    pub fn push(&self, ticks: u32) {
        let index = self.write_index.load(Ordering::Relaxed);
        self.slots[index].store(ticks, Ordering::Relaxed);

        // Publish the slot before the index and counter so a reader that
        // observes the new count also observes the stored interval.
        self.write_index
            .store((index + 1) % CAPACITY, Ordering::Release);
        let _ = self.captures.fetch_add(1, Ordering::Release);
    }

    /// Copies all slots into an owned array.
    ///
    /// Intended for the normal-priority context once the interrupt stream
    /// has gone quiet; slots never written still hold zero.
    #[must_use]
    pub fn snapshot(&self) -> [u32; CAPACITY] {
        // Pair with the Release store in `push`.
        let _ = self.captures.load(Ordering::Acquire);

        array::from_fn(|i| self.slots[i].load(Ordering::Relaxed))
    }

    /// Total number of intervals pushed since creation.
    ///
    /// Unlike the write index this never wraps, which makes it usable as
    /// a completion handshake: once it reaches the expected capture count
    /// for a transmission, the buffer contents are stable.
    #[must_use]
    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::Acquire)
    }

    /// Current write position, in `[0, CAPACITY)`.
    #[must_use]
    pub fn write_index(&self) -> usize {
        self.write_index.load(Ordering::Acquire)
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}
