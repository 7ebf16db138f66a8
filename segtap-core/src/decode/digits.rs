//! Digit decoding and scaling
//!
//! Slot layout of one refresh:
//!
//! | Slots | Quantity | Table             | Scaling                          |
//! |-------|----------|-------------------|----------------------------------|
//! | 0-3   | voltage  | voltage/current   | ÷ 100                            |
//! | 4-7   | current  | voltage/current   | ÷ 100                            |
//! | 8-11  | power    | power/energy (>>1)| ÷ 10 if slot 10 bit 0, else W    |
//! | 12-15 | energy   | power/energy (>>1)| × 1000 if slot 15 bit 0, else Wh |

use core::fmt;
use core::ops::Range;

use segtap_protocol::{SegmentTable, DIGIT_SLOTS, POWER_ENERGY, VOLTAGE_CURRENT};

use super::error::DecodeError;

/// Digits shown per quantity
pub const DIGITS_PER_QUANTITY: usize = 4;

/// Slot whose bit 0 is the power decimal point
pub const POWER_DECIMAL_SLOT: usize = 10;

/// Slot whose bit 0 selects kWh
pub const ENERGY_KILO_SLOT: usize = 15;

/// Raw segment bytes of one refresh, in address order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitSlots([u8; DIGIT_SLOTS]);

impl DigitSlots {
    /// Wrap slot values
    pub const fn new(slots: [u8; DIGIT_SLOTS]) -> Self {
        Self(slots)
    }

    /// Raw value of one slot
    ///
    /// # Panics
    /// If `slot >= 16`.
    pub fn get(&self, slot: usize) -> u8 {
        self.0[slot]
    }

    /// All slots
    pub fn as_array(&self) -> &[u8; DIGIT_SLOTS] {
        &self.0
    }

    /// Whether bit 0 of a slot is set
    fn flag(&self, slot: usize) -> bool {
        self.0[slot] & 1 != 0
    }
}

/// One of the four values the meter displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    Voltage,
    Current,
    Power,
    Energy,
}

impl Quantity {
    /// Digit slots carrying this quantity, most significant first
    pub const fn slots(self) -> Range<usize> {
        let first = match self {
            Quantity::Voltage => 0,
            Quantity::Current => 4,
            Quantity::Power => 8,
            Quantity::Energy => 12,
        };
        first..first + DIGITS_PER_QUANTITY
    }

    /// Segment table for this quantity's digit positions
    pub const fn table(self) -> SegmentTable {
        match self {
            Quantity::Voltage | Quantity::Current => VOLTAGE_CURRENT,
            Quantity::Power | Quantity::Energy => POWER_ENERGY,
        }
    }

    /// Segment pattern of a raw slot byte
    pub const fn pattern(self, raw: u8) -> u8 {
        match self {
            Quantity::Voltage | Quantity::Current => raw & VOLTAGE_CURRENT.mask(),
            Quantity::Power | Quantity::Energy => raw >> 1,
        }
    }

    /// Integer shown by this quantity's digits, ignoring scale flags
    ///
    /// Blank digits count as zero; anything else not in the table is an
    /// error.
    pub fn accumulate(self, slots: &DigitSlots) -> Result<u32, DecodeError> {
        let table = self.table();
        let mut value = 0u32;
        for slot in self.slots() {
            let pattern = self.pattern(slots.get(slot));
            let glyph = table.glyph(pattern).ok_or(DecodeError::UnknownDigit {
                slot: slot as u8,
                pattern,
            })?;
            value = value * 10 + glyph.value();
        }
        Ok(value)
    }
}

/// Voltage in volts (two implied decimals)
pub fn voltage(slots: &DigitSlots) -> Result<f32, DecodeError> {
    Ok(Quantity::Voltage.accumulate(slots)? as f32 / 100.0)
}

/// Current in amperes (two implied decimals)
pub fn current(slots: &DigitSlots) -> Result<f32, DecodeError> {
    Ok(Quantity::Current.accumulate(slots)? as f32 / 100.0)
}

/// Active power in watts
pub fn power(slots: &DigitSlots) -> Result<f32, DecodeError> {
    let raw = Quantity::Power.accumulate(slots)?;
    if slots.flag(POWER_DECIMAL_SLOT) {
        Ok(raw as f32 / 10.0)
    } else {
        Ok(raw as f32)
    }
}

/// Cumulative energy in watt-hours
pub fn energy(slots: &DigitSlots) -> Result<u32, DecodeError> {
    let raw = Quantity::Energy.accumulate(slots)?;
    if slots.flag(ENERGY_KILO_SLOT) {
        Ok(raw * 1000)
    } else {
        Ok(raw)
    }
}

/// One simultaneous reading of all four quantities
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Volts
    pub voltage: f32,
    /// Amperes
    pub current: f32,
    /// Watts
    pub power: f32,
    /// Watt-hours
    pub energy_wh: u32,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "V={:.2} A={:.2} W={:.1} Wh={}",
            self.voltage, self.current, self.power, self.energy_wh
        )
    }
}

/// Decode all four quantities from one refresh
pub fn decode(slots: &DigitSlots) -> Result<Reading, DecodeError> {
    Ok(Reading {
        voltage: voltage(slots)?,
        current: current(slots)?,
        power: power(slots)?,
        energy_wh: energy(slots)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vi(d: u8) -> u8 {
        VOLTAGE_CURRENT.pattern(d).unwrap()
    }

    fn pe(d: u8) -> u8 {
        POWER_ENERGY.pattern(d).unwrap() << 1
    }

    fn slots(v: [u8; 4], a: [u8; 4], w: [u8; 4], e: [u8; 4]) -> DigitSlots {
        let mut raw = [0u8; DIGIT_SLOTS];
        for i in 0..4 {
            raw[i] = vi(v[i]);
            raw[4 + i] = vi(a[i]);
            raw[8 + i] = pe(w[i]);
            raw[12 + i] = pe(e[i]);
        }
        DigitSlots::new(raw)
    }

    #[test]
    fn test_voltage_known_patterns() {
        let mut raw = [0u8; DIGIT_SLOTS];
        raw[..4].copy_from_slice(&[117, 5, 83, 23]);
        let slots = DigitSlots::new(raw);

        assert_eq!(Quantity::Voltage.accumulate(&slots), Ok(1023));
        assert_eq!(voltage(&slots), Ok(10.23));
    }

    #[test]
    fn test_current_scaling() {
        let s = slots([0; 4], [0, 1, 2, 3], [0; 4], [0; 4]);
        assert_eq!(current(&s), Ok(1.23));
    }

    #[test]
    fn test_power_decimal_flag() {
        let whole = slots([0; 4], [0; 4], [0, 4, 5, 6], [0; 4]);
        let mut raw = *whole.as_array();
        raw[POWER_DECIMAL_SLOT] |= 1;
        let tenths = DigitSlots::new(raw);

        assert_eq!(power(&whole), Ok(456.0));
        assert_eq!(power(&tenths), Ok(45.6));
    }

    #[test]
    fn test_energy_kilo_flag() {
        let wh = slots([0; 4], [0; 4], [0; 4], [0, 7, 8, 9]);
        let mut raw = *wh.as_array();
        raw[ENERGY_KILO_SLOT] |= 1;
        let kwh = DigitSlots::new(raw);

        assert_eq!(energy(&wh), Ok(789));
        assert_eq!(energy(&kwh), Ok(789_000));
    }

    #[test]
    fn test_power_flag_on_other_slot_ignored() {
        let base = slots([0; 4], [0; 4], [1, 2, 3, 4], [0; 4]);
        let mut raw = *base.as_array();
        raw[9] |= 1;
        raw[11] |= 1;
        assert_eq!(power(&DigitSlots::new(raw)), Ok(1234.0));
    }

    #[test]
    fn test_blank_leading_digits() {
        let mut raw = *slots([0; 4], [0; 4], [0; 4], [0, 0, 4, 2]).as_array();
        raw[12] = 0;
        raw[13] = 0;
        assert_eq!(energy(&DigitSlots::new(raw)), Ok(42));
    }

    #[test]
    fn test_unknown_digit_reported() {
        let mut raw = *slots([1, 2, 3, 4], [0; 4], [0; 4], [0; 4]).as_array();
        raw[2] = 0b0000_0001;
        let result = decode(&DigitSlots::new(raw));

        assert_eq!(
            result,
            Err(DecodeError::UnknownDigit {
                slot: 2,
                pattern: 0b0000_0001
            })
        );
    }

    #[test]
    fn test_decode_all() {
        let mut raw = *slots([1, 2, 0, 5], [0, 1, 2, 3], [0, 4, 5, 6], [0, 7, 8, 9]).as_array();
        raw[POWER_DECIMAL_SLOT] |= 1;
        let reading = decode(&DigitSlots::new(raw)).unwrap();

        assert_eq!(reading.voltage, 12.05);
        assert_eq!(reading.current, 1.23);
        assert_eq!(reading.power, 45.6);
        assert_eq!(reading.energy_wh, 789);
    }

    #[test]
    fn test_reading_display() {
        let reading = Reading {
            voltage: 12.05,
            current: 1.23,
            power: 45.6,
            energy_wh: 789,
        };
        assert_eq!(reading.to_string(), "V=12.05 A=1.23 W=45.6 Wh=789");
    }

    #[test]
    fn test_quantity_slots() {
        assert_eq!(Quantity::Voltage.slots(), 0..4);
        assert_eq!(Quantity::Energy.slots(), 12..16);
        assert_eq!(Quantity::Energy.slots().end, DIGIT_SLOTS);
        assert_eq!(Quantity::Current.slots().len(), DIGITS_PER_QUANTITY);
    }
}
