//! # Acquisition
//!
//! The normal-priority side of the pipeline: wait until the sensor's
//! transmission is over, snapshot the buffer, and decode it.
//!
//! Two waiting strategies are offered. [`Acquisition::read_after_delay`]
//! reproduces the reference behavior: a single blocking delay sized to
//! exceed the sensor's worst-case transmission time, with no
//! synchronization primitive — if the delay is mis-sized or interrupt
//! latency is abnormally high, the decode can race the last few writes.
//! That window is an accepted constraint of the delay-based approach.
//! [`Acquisition::read_when_complete`] upgrades it to a verifiable
//! handshake: the recorder's monotonically increasing capture count is
//! polled until the full transmission has been recorded, with a bounded
//! number of attempts as a timeout fallback. On success the two paths
//! are observably identical.

use core::result::Result::{self, Err, Ok};

use embedded_hal::delay::DelayNs as SyncDelay;
use embedded_hal_async::delay::DelayNs as AsyncDelay;

use crate::buffer::CaptureBuffer;
use crate::decoder::{DATA_START_INDEX, DecodeError, FRAME_BITS, FrameDecoder};
use crate::frame::SensorFrame;

/// Fixed delay covering the sensor's worst-case transmission time.
pub const ACQUISITION_DELAY_US: u32 = 10_000;

/// Captures that make up one complete transmission: the leader pulses
/// plus all data bits.
pub const EXPECTED_CAPTURES: usize = DATA_START_INDEX + FRAME_BITS;

// Completion-handshake polling: 100 µs between checks, bounded at twice
// the fixed acquisition delay.
const POLL_DELAY_US: u32 = 100;
const MAX_POLL_ATTEMPTS: usize = 200;

/// Errors that may occur while acquiring a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquireError {
    /// The captured window did not decode to a valid frame.
    Decode(DecodeError),
    /// The expected capture count was not reached in time.
    ///
    /// The sensor never answered, or edges were lost along the way.
    Timeout,
}

impl From<DecodeError> for AcquireError {
    fn from(e: DecodeError) -> Self {
        AcquireError::Decode(e)
    }
}

/// One acquisition pass over a shared [`CaptureBuffer`].
///
/// Borrows the same buffer the [`CaptureRecorder`] writes into and must
/// only decode once the interrupt stream for the transmission has gone
/// quiet; the waiting strategies below establish that.
///
/// [`CaptureRecorder`]: crate::capture::CaptureRecorder
#[derive(Debug)]
pub struct Acquisition<'buf> {
    buffer: &'buf CaptureBuffer,
    decoder: FrameDecoder,
}

impl<'buf> Acquisition<'buf> {
    /// Creates an acquisition pass with the default decoder.
    #[must_use]
    pub const fn new(buffer: &'buf CaptureBuffer) -> Self {
        Self {
            buffer,
            decoder: FrameDecoder::new(),
        }
    }

    /// Creates an acquisition pass with the given decoder.
    #[must_use]
    pub const fn with_decoder(buffer: &'buf CaptureBuffer, decoder: FrameDecoder) -> Self {
        Self { buffer, decoder }
    }

    /// Waits out the fixed acquisition delay, then decodes the buffer.
    ///
    /// This is the reference behavior: the delay alone stands in for a
    /// completion signal.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError::Decode`] if the captured window does not
    /// decode to a valid frame.
    pub fn read_after_delay<D>(&self, delay: &mut D) -> Result<SensorFrame, AcquireError>
    where
        D: SyncDelay,
    {
        delay.delay_us(ACQUISITION_DELAY_US);

        self.decode_now()
    }

    /// Polls the capture count until the transmission is fully recorded,
    /// then decodes the buffer.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`AcquireError::Timeout`] if [`EXPECTED_CAPTURES`] captures are
    ///   not reached within the bounded polling window.
    /// - [`AcquireError::Decode`] if the captured window does not decode
    ///   to a valid frame.
    pub fn read_when_complete<D>(&self, delay: &mut D) -> Result<SensorFrame, AcquireError>
    where
        D: SyncDelay,
    {
        for _ in 0..MAX_POLL_ATTEMPTS {
            if self.buffer.captures() >= EXPECTED_CAPTURES {
                return self.decode_now();
            }
            delay.delay_us(POLL_DELAY_US);
        }

        Err(AcquireError::Timeout)
    }

    /// Non-blocking twin of [`Acquisition::read_when_complete`].
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`AcquireError::Timeout`] if [`EXPECTED_CAPTURES`] captures are
    ///   not reached within the bounded polling window.
    /// - [`AcquireError::Decode`] if the captured window does not decode
    ///   to a valid frame.
    pub async fn read_when_complete_async<D>(
        &self,
        delay: &mut D,
    ) -> Result<SensorFrame, AcquireError>
    where
        D: AsyncDelay,
    {
        for _ in 0..MAX_POLL_ATTEMPTS {
            if self.buffer.captures() >= EXPECTED_CAPTURES {
                return self.decode_now();
            }
            delay.delay_us(POLL_DELAY_US).await;
        }

        Err(AcquireError::Timeout)
    }

    fn decode_now(&self) -> Result<SensorFrame, AcquireError> {
        let window = self.buffer.snapshot();

        Ok(self.decoder.decode(&window)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::delay::NoopDelay;

    use crate::decoder::{ChecksumPolicy, SENTINEL_TICKS};

    /// Pushes one full transmission: leader, sentinel, then the 40 data
    /// intervals taken from the given byte values.
    fn record_transmission(buffer: &CaptureBuffer, bytes: [u8; 5]) {
        buffer.push(18);
        buffer.push(SENTINEL_TICKS);
        for byte in bytes {
            for bit in 0..8 {
                let long = byte & (1 << (7 - bit)) != 0;
                buffer.push(if long { 10 } else { 1 });
            }
        }
    }

    #[test]
    fn test_read_after_delay_decodes_recorded_frame() {
        let buffer = CaptureBuffer::new();
        record_transmission(&buffer, [55, 3, 24, 7, 89]);

        let acquisition = Acquisition::new(&buffer);
        let frame = acquisition.read_after_delay(&mut NoopDelay::new()).unwrap();

        assert_eq!(frame.as_bytes(), [55, 3, 24, 7, 89]);
    }

    #[test]
    fn test_read_after_delay_surfaces_timing_fault() {
        let buffer = CaptureBuffer::new();
        buffer.push(18);
        buffer.push(0); // Sentinel slot holds garbage.

        let acquisition = Acquisition::new(&buffer);
        let result = acquisition.read_after_delay(&mut NoopDelay::new());

        assert_eq!(
            result,
            Err(AcquireError::Decode(DecodeError::AcquisitionTiming {
                found: 0
            }))
        );
    }

    #[test]
    fn test_read_when_complete_times_out_on_missing_captures() {
        // One capture short of a full transmission.
        let buffer = CaptureBuffer::new();
        for _ in 0..EXPECTED_CAPTURES - 1 {
            buffer.push(1);
        }

        let acquisition = Acquisition::new(&buffer);
        let result = acquisition.read_when_complete(&mut NoopDelay::new());

        assert_eq!(result, Err(AcquireError::Timeout));
    }

    #[test]
    fn test_read_when_complete_decodes_once_count_reached() {
        let buffer = CaptureBuffer::new();
        record_transmission(&buffer, [0x80, 0, 0, 0, 0x80]);
        assert_eq!(buffer.captures(), EXPECTED_CAPTURES);

        let decoder = FrameDecoder::with_policy(ChecksumPolicy::Enforce);
        let acquisition = Acquisition::with_decoder(&buffer, decoder);
        let frame = acquisition
            .read_when_complete(&mut NoopDelay::new())
            .unwrap();

        assert_eq!(frame.as_bytes(), [0x80, 0, 0, 0, 0x80]);
    }

    #[tokio::test]
    async fn test_read_when_complete_async_decodes_recorded_frame() {
        let buffer = CaptureBuffer::new();
        record_transmission(&buffer, [55, 3, 24, 7, 89]);

        let acquisition = Acquisition::new(&buffer);
        let frame = acquisition
            .read_when_complete_async(&mut NoopDelay::new())
            .await
            .unwrap();

        assert_eq!(frame.as_bytes(), [55, 3, 24, 7, 89]);
    }

    #[tokio::test]
    async fn test_read_when_complete_async_times_out() {
        let buffer = CaptureBuffer::new();

        let acquisition = Acquisition::new(&buffer);
        let result = acquisition
            .read_when_complete_async(&mut NoopDelay::new())
            .await;

        assert_eq!(result, Err(AcquireError::Timeout));
    }
}
