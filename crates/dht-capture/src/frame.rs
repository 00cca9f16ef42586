//! # Sensor frame
//!
//! The decoded result of one sensor transmission: humidity and
//! temperature as the sensor's native integer/fraction byte pairs, plus
//! the transmitted checksum byte.

use core::fmt;

/// A decoded 5-byte sensor frame.
///
/// Byte slots, in transmission order: humidity integer, humidity
/// fraction, temperature integer, temperature fraction, checksum. The
/// frame is a plain value, created fresh by each decode pass; no state
/// is shared between passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorFrame {
    bytes: [u8; 5],
}

impl SensorFrame {
    /// Creates a frame from the 5 raw bytes in transmission order.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 5]) -> Self {
        Self { bytes }
    }

    /// The integer part of the humidity reading.
    #[must_use]
    pub const fn humidity_integer(&self) -> u8 {
        self.bytes[0]
    }

    /// The fractional part of the humidity reading.
    #[must_use]
    pub const fn humidity_fraction(&self) -> u8 {
        self.bytes[1]
    }

    /// The integer part of the temperature reading.
    #[must_use]
    pub const fn temperature_integer(&self) -> u8 {
        self.bytes[2]
    }

    /// The fractional part of the temperature reading.
    #[must_use]
    pub const fn temperature_fraction(&self) -> u8 {
        self.bytes[3]
    }

    /// The checksum byte as transmitted by the sensor.
    #[must_use]
    pub const fn checksum(&self) -> u8 {
        self.bytes[4]
    }

    /// The checksum this frame should carry.
    ///
    /// The sensor defines it as the low 8 bits of the sum of the four
    /// data bytes.
    #[must_use]
    pub const fn computed_checksum(&self) -> u8 {
        self.bytes[0]
            .wrapping_add(self.bytes[1])
            .wrapping_add(self.bytes[2])
            .wrapping_add(self.bytes[3])
    }

    /// Whether the transmitted checksum matches the computed one.
    #[must_use]
    pub const fn checksum_matches(&self) -> bool {
        self.checksum() == self.computed_checksum()
    }

    /// The raw bytes in transmission order.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 5] {
        self.bytes
    }
}

/// Renders the frame as the two reading lines, with the integer and
/// fractional bytes concatenated textually the way the sensor transmits
/// them. No unit conversion or rounding is applied.
impl fmt::Display for SensorFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Humidity: {}.{}",
            self.humidity_integer(),
            self.humidity_fraction()
        )?;
        write!(
            f,
            "Temperature {}.{}",
            self.temperature_integer(),
            self.temperature_fraction()
        )
    }
}
