//! `dht-capture` is a library crate implementing the capture-to-bits
//! pipeline of a DHT-style single-wire humidity and temperature sensor.
//!
//! Instead of polling the data line, the sensor's pulse-width-encoded
//! transmission is measured with a hardware timer in input-capture mode:
//! every falling edge latches the elapsed tick count since the previous
//! edge, an interrupt handler appends that interval to a bounded ring
//! buffer, and a decoder later classifies each interval against a fixed
//! threshold to reassemble the 40 transmitted bits into the sensor's
//! 5-byte frame.
//!
//! The crate is architecture-agnostic: the hardware timer is reached
//! through the [`capture::CaptureChannel`] trait, and waiting is done
//! through the [`embedded-hal`] and [`embedded-hal-async`] delay traits,
//! ensuring compatibility with any platform that supports these
//! abstractions. Peripheral bring-up (clocks, pin routing, interrupt
//! controller) stays with the platform and is not modeled here.
//!
//! [`embedded-hal`]: https://crates.io/crates/embedded-hal
//! [`embedded-hal-async`]: https://crates.io/crates/embedded-hal-async

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![no_std]

/// Acquisition orchestration: waiting for the transmission and decoding it.
pub mod acquire;

/// The bounded ring buffer of captured inter-edge intervals.
pub mod buffer;

/// The capture-timer seam and the edge-interrupt recorder.
pub mod capture;

/// The threshold-based frame decoder.
pub mod decoder;

/// The decoded 5-byte sensor frame.
pub mod frame;
