//! # Edge capture
//!
//! The seam between this crate and the hardware timer, plus the
//! interrupt-side recorder that feeds the [`CaptureBuffer`].
//!
//! The platform configures a timer for falling-edge input capture on the
//! sensor's data line (reference configuration: a 1024 prescale against
//! the peripheral clock, coarse enough that the sensor's two pulse-width
//! classes map to clearly separated tick counts) and exposes it through
//! [`CaptureChannel`]. The platform's interrupt handler then forwards
//! every capture interrupt to [`CaptureRecorder::on_edge`].

use core::result::Result::{self, Ok};

use crate::buffer::CaptureBuffer;

/// A hardware timer channel configured for edge-triggered input capture.
///
/// Implementations latch the free-running counter on each qualifying
/// edge and raise an interrupt. The counter must be resettable so that
/// successive captures measure edge-to-edge intervals rather than
/// cumulative timestamps.
///
/// A missed edge (interrupt latency exceeding one inter-edge interval)
/// is not observable at this layer; it surfaces later as a shifted or
/// rejected frame.
pub trait CaptureChannel {
    /// Error produced by the underlying timer peripheral.
    type Error;

    /// Clears the pending interrupt condition.
    ///
    /// Returns `true` when a capture event on the armed channel was among
    /// the pending flags, `false` when the interrupt fired for another
    /// reason. Must be called before the handler returns, otherwise the
    /// interrupt re-fires spuriously.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral access fails.
    fn acknowledge(&mut self) -> Result<bool, Self::Error>;

    /// Reads the counter value latched at the triggering edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral access fails.
    fn captured_ticks(&mut self) -> Result<u32, Self::Error>;

    /// Resets the free-running counter to zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral access fails.
    fn reset_counter(&mut self) -> Result<(), Self::Error>;
}

/// The edge-interrupt recorder.
///
/// Owns the capture channel and borrows the shared [`CaptureBuffer`];
/// the decoding side holds its own reference to the same buffer. This is
/// the buffer's only writer.
#[derive(Debug)]
pub struct CaptureRecorder<'buf, C>
where
    C: CaptureChannel,
{
    channel: C,
    buffer: &'buf CaptureBuffer,
}

impl<'buf, C> CaptureRecorder<'buf, C>
where
    C: CaptureChannel,
{
    /// Creates a recorder writing into the given buffer.
    #[must_use]
    pub fn new(channel: C, buffer: &'buf CaptureBuffer) -> Self {
        Self { channel, buffer }
    }

    /// Handles one capture interrupt.
    ///
    /// Acknowledges the interrupt, reads the latched interval, resets the
    /// counter so the next capture is measured from this edge, and
    /// appends the interval to the buffer. Returns `true` when an
    /// interval was recorded, `false` when the interrupt was not a
    /// capture event.
    ///
    /// This runs at interrupt priority: it is short, non-blocking, and
    /// performs no decoding.
    ///
    /// # Errors
    ///
    /// Returns an error if any peripheral access on the channel fails.
    pub fn on_edge(&mut self) -> Result<bool, C::Error> {
        // Clear the pending condition first, or the interrupt re-fires
        // as soon as the handler returns.
        if !self.channel.acknowledge()? {
            return Ok(false);
        }

        let ticks = self.channel.captured_ticks()?;

        // Zero the counter immediately so the next capture is relative
        // to this edge, not to the start of acquisition.
        self.channel.reset_counter()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("edge captured: {=u32} ticks", ticks);

        self.buffer.push(ticks);

        Ok(true)
    }

    /// The buffer this recorder writes into.
    #[must_use]
    pub fn buffer(&self) -> &'buf CaptureBuffer {
        self.buffer
    }

    /// Releases the capture channel.
    #[must_use]
    pub fn release(self) -> C {
        self.channel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec::Vec;

    /// Scripted stand-in for a timer peripheral, recording call order.
    struct ScriptedChannel {
        capture_pending: bool,
        ticks: u32,
        calls: Vec<&'static str>,
        fail_acknowledge: bool,
    }

    impl ScriptedChannel {
        fn new(capture_pending: bool, ticks: u32) -> Self {
            Self {
                capture_pending,
                ticks,
                calls: Vec::new(),
                fail_acknowledge: false,
            }
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    struct PeripheralFault;

    impl CaptureChannel for ScriptedChannel {
        type Error = PeripheralFault;

        fn acknowledge(&mut self) -> Result<bool, Self::Error> {
            self.calls.push("acknowledge");
            if self.fail_acknowledge {
                return Err(PeripheralFault);
            }
            Ok(self.capture_pending)
        }

        fn captured_ticks(&mut self) -> Result<u32, Self::Error> {
            self.calls.push("captured_ticks");
            Ok(self.ticks)
        }

        fn reset_counter(&mut self) -> Result<(), Self::Error> {
            self.calls.push("reset_counter");
            Ok(())
        }
    }

    #[test]
    fn test_on_edge_records_interval() {
        let buffer = CaptureBuffer::new();
        let mut recorder = CaptureRecorder::new(ScriptedChannel::new(true, 11), &buffer);

        assert_eq!(recorder.on_edge(), Ok(true));

        assert_eq!(buffer.captures(), 1);
        assert_eq!(buffer.snapshot()[0], 11);
    }

    #[test]
    fn test_on_edge_acknowledges_before_reading_and_resets_after() {
        let buffer = CaptureBuffer::new();
        let mut recorder = CaptureRecorder::new(ScriptedChannel::new(true, 4), &buffer);

        let _ = recorder.on_edge().unwrap();

        let channel = recorder.release();
        assert_eq!(
            channel.calls,
            ["acknowledge", "captured_ticks", "reset_counter"]
        );
    }

    #[test]
    fn test_non_capture_interrupt_records_nothing() {
        let buffer = CaptureBuffer::new();
        let mut recorder = CaptureRecorder::new(ScriptedChannel::new(false, 99), &buffer);

        assert_eq!(recorder.on_edge(), Ok(false));

        assert_eq!(buffer.captures(), 0);
        let channel = recorder.release();
        assert_eq!(channel.calls, ["acknowledge"]);
    }

    #[test]
    fn test_peripheral_fault_propagates() {
        let buffer = CaptureBuffer::new();
        let mut channel = ScriptedChannel::new(true, 1);
        channel.fail_acknowledge = true;
        let mut recorder = CaptureRecorder::new(channel, &buffer);

        assert_eq!(recorder.on_edge(), Err(PeripheralFault));
        assert_eq!(buffer.captures(), 0);
    }

    #[test]
    fn test_successive_edges_fill_successive_slots() {
        let buffer = CaptureBuffer::new();
        let mut recorder = CaptureRecorder::new(ScriptedChannel::new(true, 0), &buffer);

        for ticks in [18, 5, 10, 1] {
            recorder.channel.ticks = ticks;
            let _ = recorder.on_edge().unwrap();
        }

        assert_eq!(&recorder.buffer().snapshot()[..4], &[18, 5, 10, 1]);
    }
}
