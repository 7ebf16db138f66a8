//! Decode failures

use core::fmt;

/// Why a snapshot could not be turned into a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// No address 0, or the address run broke before address 30
    SequenceNotFound,
    /// A digit slot holds a pattern that is neither blank nor a digit
    UnknownDigit {
        /// Digit slot (0-15)
        slot: u8,
        /// Pattern after masking / flag removal
        pattern: u8,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::SequenceNotFound => f.write_str("write sequence not found"),
            DecodeError::UnknownDigit { slot, pattern } => {
                write!(f, "unknown digit pattern {:#09b} in slot {}", pattern, slot)
            }
        }
    }
}
