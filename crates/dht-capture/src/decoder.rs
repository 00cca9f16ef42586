//! # Frame decoder
//!
//! Turns a snapshot of captured inter-edge intervals into a
//! [`SensorFrame`].
//!
//! The sensor encodes each bit in the width of one pulse: a long pulse
//! is a 1, a short pulse a 0. With the capture timer's prescale fixed at
//! design time, the two classes map to tick counts on either side of a
//! fixed threshold, so decoding is a single deterministic pass over the
//! captured window. The same window always yields the same frame; there
//! is no retry logic because this is pure interpretation of
//! already-captured data.

use core::result::Result::{self, Err, Ok};

use crate::buffer::CAPACITY;
use crate::frame::SensorFrame;

/// Buffer slot expected to hold the handshake interval.
pub const SENTINEL_INDEX: usize = 1;

/// Tick count the sentinel slot must hold.
///
/// The sensor's response handshake produces a pulse of this width at the
/// reference prescale; anything else means acquisition did not line up
/// with the transmission.
pub const SENTINEL_TICKS: u32 = 5;

/// First buffer slot carrying a data bit, after the leader pulses.
pub const DATA_START_INDEX: usize = 2;

/// Number of data bits in one transmission: 5 bytes of 8.
pub const FRAME_BITS: usize = 40;

/// Tick-count boundary between a short pulse (bit 0) and a long pulse
/// (bit 1). An interval must be strictly greater to decode as 1.
pub const BIT_THRESHOLD_TICKS: u32 = 3;

/// Errors that may occur while decoding a captured window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// The sentinel slot did not hold the handshake interval.
    ///
    /// Acquisition started at the wrong moment or edges were lost; the
    /// window cannot be trusted and no frame is produced.
    AcquisitionTiming {
        /// The interval actually found in the sentinel slot.
        found: u32,
    },
    /// The transmitted checksum does not match the computed one.
    ///
    /// Only raised under [`ChecksumPolicy::Enforce`].
    ChecksumMismatch {
        /// Checksum computed from the four data bytes.
        expected: u8,
        /// Checksum byte actually transmitted.
        actual: u8,
    },
}

/// Whether the decoder gates frames on the transmitted checksum.
///
/// The sensor transmits a checksum with every frame, and the decoder
/// always decodes it, but comparing it against the data bytes is left as
/// a policy choice: a shifted capture (a silently missed edge) is only
/// detectable through this comparison, yet rejecting on it also discards
/// frames with a single corrupted bit that a caller may prefer to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChecksumPolicy {
    /// Decode the checksum byte but accept the frame regardless.
    #[default]
    Ignore,
    /// Reject frames whose checksum does not match the data bytes.
    Enforce,
}

/// The threshold-based frame decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    policy: ChecksumPolicy,
}

impl FrameDecoder {
    /// Creates a decoder with [`ChecksumPolicy::Ignore`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            policy: ChecksumPolicy::Ignore,
        }
    }

    /// Creates a decoder with the given checksum policy.
    #[must_use]
    pub const fn with_policy(policy: ChecksumPolicy) -> Self {
        Self { policy }
    }

    /// Decodes a captured window into a [`SensorFrame`].
    ///
    /// Validates the sentinel slot, then walks the [`FRAME_BITS`]
    /// intervals starting at [`DATA_START_INDEX`], packing each byte
    /// most-significant-bit first: an interval strictly greater than
    /// [`BIT_THRESHOLD_TICKS`] decodes to 1, anything else (including
    /// slots never written) to 0.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`DecodeError::AcquisitionTiming`] if the sentinel slot does not
    ///   hold [`SENTINEL_TICKS`]; no bits are packed in that case.
    /// - [`DecodeError::ChecksumMismatch`] if the policy is
    ///   [`ChecksumPolicy::Enforce`] and the transmitted checksum does
    ///   not match the data bytes.
    pub fn decode(&self, window: &[u32; CAPACITY]) -> Result<SensorFrame, DecodeError> {
        if window[SENTINEL_INDEX] != SENTINEL_TICKS {
            return Err(DecodeError::AcquisitionTiming {
                found: window[SENTINEL_INDEX],
            });
        }

        let mut bytes = [0u8; 5];
        let mut index = DATA_START_INDEX;

        for byte in &mut bytes {
            for bit in 0..8 {
                if window[index] > BIT_THRESHOLD_TICKS {
                    *byte |= 1 << (7 - bit); // Bits arrive MSB first.
                }
                index += 1;
            }
        }

        let frame = SensorFrame::from_bytes(bytes);

        if self.policy == ChecksumPolicy::Enforce && !frame.checksum_matches() {
            return Err(DecodeError::ChecksumMismatch {
                expected: frame.computed_checksum(),
                actual: frame.checksum(),
            });
        }

        Ok(frame)
    }
}
