//! Write-sequence extraction
//!
//! Scans captured words once, in order, for a run of write-memory packets
//! at addresses 0, 2, …, 30. Words with any other command are skipped.
//! Once address 0 has been seen every further write must carry the next
//! expected address, otherwise the scan fails.

use segtap_protocol::{Packet, ADDRESS_STEP, DIGIT_SLOTS, LAST_ADDRESS, VOLTAGE_CURRENT};

use super::digits::DigitSlots;
use super::error::DecodeError;

/// Last address of the voltage/current digit bank
const LOW_BANK_LAST_ADDRESS: u8 = 14;

/// Bits kept from a word's data byte, by address
///
/// The voltage/current bank drops bits 3 and 7 (annunciators); the
/// power/energy bank keeps the full byte, including the flag in bit 0.
pub const fn data_mask(address: u8) -> u8 {
    if address <= LOW_BANK_LAST_ADDRESS {
        VOLTAGE_CURRENT.mask()
    } else {
        0xFF
    }
}

/// Pull one complete refresh out of a word stream
///
/// Stops at the word carrying address 30; anything after it is not read.
pub fn extract_sequence<I>(words: I) -> Result<DigitSlots, DecodeError>
where
    I: IntoIterator<Item = u32>,
{
    let mut slots = [0u8; DIGIT_SLOTS];
    let mut expected_address: u8 = 0;
    let mut started = false;

    for word in words {
        let packet = Packet::from_word(word);
        if !packet.is_write() {
            continue;
        }

        if !started {
            if packet.address != 0 {
                continue;
            }
            started = true;
        }

        if packet.address != expected_address {
            return Err(DecodeError::SequenceNotFound);
        }

        let slot = packet.slot().ok_or(DecodeError::SequenceNotFound)?;
        slots[slot] = packet.data & data_mask(packet.address);

        if packet.address == LAST_ADDRESS {
            return Ok(DigitSlots::new(slots));
        }
        expected_address += ADDRESS_STEP;
    }

    Err(DecodeError::SequenceNotFound)
}
