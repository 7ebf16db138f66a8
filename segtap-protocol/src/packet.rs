//! Captured word decomposition
//!
//! Word layout (bit 16 is the first bit clocked in):
//! - COMMAND (bits 16..14): 0b101 for sequential write-memory
//! - ADDRESS (bits 13..8): display RAM address
//! - DATA (bits 7..0): segment drive byte for one digit

/// Number of bits in one bus transaction
pub const WORD_BITS: u32 = 17;

/// Mask covering every bit a word can carry
pub const WORD_MASK: u32 = (1 << WORD_BITS) - 1;

/// Command value for "write memory, sequential"
pub const WRITE_COMMAND: u8 = 0b101;

/// Address increment between consecutive words of one refresh
pub const ADDRESS_STEP: u8 = 2;

/// Address of the final word of one refresh
pub const LAST_ADDRESS: u8 = 30;

/// Digits carried by one full refresh
pub const DIGIT_SLOTS: usize = (LAST_ADDRESS / ADDRESS_STEP) as usize + 1;

const COMMAND_SHIFT: u32 = 14;
const COMMAND_MASK: u32 = 0b111;
const ADDRESS_SHIFT: u32 = 8;
const ADDRESS_MASK: u32 = 0b11_1111;
const DATA_MASK: u32 = 0xFF;

/// One bus transaction split into its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    /// 3-bit command field
    pub command: u8,
    /// 6-bit display RAM address
    pub address: u8,
    /// Raw segment data
    pub data: u8,
}

impl Packet {
    /// Create a write-memory packet
    pub const fn write(address: u8, data: u8) -> Self {
        Self {
            command: WRITE_COMMAND,
            address,
            data,
        }
    }

    /// Split a captured word into its fields
    ///
    /// Bits above bit 16 are ignored.
    pub const fn from_word(word: u32) -> Self {
        Self {
            command: ((word >> COMMAND_SHIFT) & COMMAND_MASK) as u8,
            address: ((word >> ADDRESS_SHIFT) & ADDRESS_MASK) as u8,
            data: (word & DATA_MASK) as u8,
        }
    }

    /// Reassemble the word the bus would carry for this packet
    pub const fn to_word(&self) -> u32 {
        ((self.command as u32 & COMMAND_MASK) << COMMAND_SHIFT)
            | ((self.address as u32 & ADDRESS_MASK) << ADDRESS_SHIFT)
            | (self.data as u32 & DATA_MASK)
    }

    /// Whether this is the write-memory command the meter issues
    pub const fn is_write(&self) -> bool {
        self.command == WRITE_COMMAND
    }

    /// Digit slot this address fills, if it belongs to a refresh
    pub const fn slot(&self) -> Option<usize> {
        if self.address % ADDRESS_STEP == 0 && self.address <= LAST_ADDRESS {
            Some((self.address / ADDRESS_STEP) as usize)
        } else {
            None
        }
    }
}
