//! Meter facade
//!
//! Two ways to read the meter:
//!
//! - [`MeterTap::read`] takes one snapshot and decodes all four values
//!   from the same refresh. The report loop uses this.
//! - [`MeterTap::voltage`] and friends each take their own snapshot and
//!   return a sentinel on failure (`-1.0`, or `-1` for energy). Values
//!   from separate calls may come from different refreshes.

use core::fmt;

use crate::capture::FrameBuffer;
use crate::decode::{self, digits, extract_sequence, DecodeError, DigitSlots, Reading};

/// Returned by the float accessors when no reading is available
pub const FLOAT_SENTINEL: f32 = -1.0;

/// Returned by [`MeterTap::energy`] when no reading is available
pub const ENERGY_SENTINEL: i32 = -1;

/// Read-side handle on a frame buffer
#[derive(Clone, Copy)]
pub struct MeterTap<'a> {
    frames: &'a FrameBuffer,
}

impl<'a> MeterTap<'a> {
    /// Create a tap reading from `frames`
    pub const fn new(frames: &'a FrameBuffer) -> Self {
        Self { frames }
    }

    /// Decode all four quantities from one snapshot
    pub fn read(&self) -> Result<Reading, DecodeError> {
        decode::read(&self.frames.snapshot())
    }

    /// Raw digit slots of the latest complete refresh
    pub fn slots(&self) -> Result<DigitSlots, DecodeError> {
        extract_sequence(self.frames.snapshot().chronological())
    }

    /// Voltage in volts, or [`FLOAT_SENTINEL`]
    pub fn voltage(&self) -> f32 {
        self.slots()
            .and_then(|s| digits::voltage(&s))
            .unwrap_or(FLOAT_SENTINEL)
    }

    /// Current in amperes, or [`FLOAT_SENTINEL`]
    pub fn current(&self) -> f32 {
        self.slots()
            .and_then(|s| digits::current(&s))
            .unwrap_or(FLOAT_SENTINEL)
    }

    /// Power in watts, or [`FLOAT_SENTINEL`]
    pub fn power(&self) -> f32 {
        self.slots()
            .and_then(|s| digits::power(&s))
            .unwrap_or(FLOAT_SENTINEL)
    }

    /// Energy in watt-hours, or [`ENERGY_SENTINEL`]
    pub fn energy(&self) -> i32 {
        self.slots()
            .and_then(|s| digits::energy(&s))
            .ok()
            .and_then(|wh| i32::try_from(wh).ok())
            .unwrap_or(ENERGY_SENTINEL)
    }
}

/// Report line for one cycle
///
/// Prints the reading, or the sentinel values when decoding failed.
pub struct Report(pub Result<Reading, DecodeError>);

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Ok(reading) => write!(f, "{}", reading),
            Err(_) => write!(
                f,
                "V={:.2} A={:.2} W={:.1} Wh={}",
                FLOAT_SENTINEL, FLOAT_SENTINEL, FLOAT_SENTINEL, ENERGY_SENTINEL
            ),
        }
    }
}

/// Binary dump of all sixteen digit slots, for bench debugging
pub struct RawDump<'a>(pub &'a DigitSlots);

impl fmt::Display for RawDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.as_array().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{:08b}", value)?;
        }
        Ok(())
    }
}
