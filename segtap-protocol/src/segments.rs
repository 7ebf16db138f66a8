//! Seven-segment pattern tables
//!
//! The meter's LCD wires its digit positions to the TM1621 in two
//! different ways, so there are two tables:
//!
//! - [`VOLTAGE_CURRENT`]: compared against the slot byte masked with
//!   `0b0111_0111` (bits 3 and 7 drive annunciators, not segments)
//! - [`POWER_ENERGY`]: compared against the slot byte shifted right by
//!   one (bit 0 is the decimal point / kWh flag)
//!
//! Tables are built in const context and reject duplicate, empty or
//! out-of-mask patterns at compile time.

/// What a single digit position shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Glyph {
    /// All segments off (leading-zero suppression)
    Blank,
    /// Decimal digit 0-9
    Digit(u8),
}

impl Glyph {
    /// Numeric contribution of this glyph
    pub const fn value(self) -> u32 {
        match self {
            Glyph::Blank => 0,
            Glyph::Digit(d) => d as u32,
        }
    }
}

/// Bidirectional map between decimal digits and segment patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentTable {
    patterns: [u8; 10],
    mask: u8,
}

impl SegmentTable {
    /// Build a table from the patterns of digits 0 through 9
    ///
    /// `mask` lists the bits a pattern may use. Panics (at compile time
    /// when used in a const) on a zero pattern, a pattern outside the
    /// mask, or two digits sharing one pattern.
    pub const fn new(patterns: [u8; 10], mask: u8) -> Self {
        let mut i = 0;
        while i < patterns.len() {
            if patterns[i] == 0 {
                panic!("segment pattern 0 is reserved for blank digits");
            }
            if patterns[i] & !mask != 0 {
                panic!("segment pattern uses bits outside the table mask");
            }
            let mut j = i + 1;
            while j < patterns.len() {
                if patterns[i] == patterns[j] {
                    panic!("two digits share one segment pattern");
                }
                j += 1;
            }
            i += 1;
        }
        Self { patterns, mask }
    }

    /// Bits this table's patterns occupy
    pub const fn mask(&self) -> u8 {
        self.mask
    }

    /// Look up the glyph for a pattern
    ///
    /// Returns `None` when the pattern is neither blank nor a digit.
    pub const fn glyph(&self, pattern: u8) -> Option<Glyph> {
        if pattern == 0 {
            return Some(Glyph::Blank);
        }
        match self.digit(pattern) {
            Some(d) => Some(Glyph::Digit(d)),
            None => None,
        }
    }

    /// Digit shown by a pattern
    pub const fn digit(&self, pattern: u8) -> Option<u8> {
        let mut d = 0;
        while d < self.patterns.len() {
            if self.patterns[d] == pattern {
                return Some(d as u8);
            }
            d += 1;
        }
        None
    }

    /// Pattern that shows a digit
    pub const fn pattern(&self, digit: u8) -> Option<u8> {
        if (digit as usize) < self.patterns.len() {
            Some(self.patterns[digit as usize])
        } else {
            None
        }
    }
}

/// Digit positions of the voltage and current rows
pub const VOLTAGE_CURRENT: SegmentTable = SegmentTable::new(
    [
        0b0000_0101, // 0
        0b0111_0101, // 1
        0b0101_0011, // 2
        0b0001_0111, // 3
        0b0110_0110, // 4
        0b0011_0110, // 5
        0b0111_0110, // 6
        0b0010_0101, // 7
        0b0111_0111, // 8
        0b0011_0111, // 9
    ],
    0b0111_0111,
);

/// Digit positions of the power and energy rows (after dropping bit 0)
pub const POWER_ENERGY: SegmentTable = SegmentTable::new(
    [
        0b011_1111, // 0
        0b000_0110, // 1
        0b101_1011, // 2
        0b100_1111, // 3
        0b110_0110, // 4
        0b110_1101, // 5
        0b111_1101, // 6
        0b000_0111, // 7
        0b111_1111, // 8
        0b110_1111, // 9
    ],
    0b111_1111,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voltage_table_known_patterns() {
        assert_eq!(VOLTAGE_CURRENT.digit(117), Some(1));
        assert_eq!(VOLTAGE_CURRENT.digit(5), Some(0));
        assert_eq!(VOLTAGE_CURRENT.digit(83), Some(2));
        assert_eq!(VOLTAGE_CURRENT.digit(23), Some(3));
    }

    #[test]
    fn test_tables_are_inverse() {
        for table in [VOLTAGE_CURRENT, POWER_ENERGY] {
            for d in 0..10u8 {
                let pattern = table.pattern(d).unwrap();
                assert_eq!(table.digit(pattern), Some(d));
                assert_eq!(pattern & !table.mask(), 0);
            }
        }
    }

    #[test]
    fn test_pattern_out_of_range() {
        assert_eq!(VOLTAGE_CURRENT.pattern(10), None);
        assert_eq!(POWER_ENERGY.pattern(255), None);
    }

    #[test]
    fn test_blank_glyph() {
        assert_eq!(VOLTAGE_CURRENT.glyph(0), Some(Glyph::Blank));
        assert_eq!(POWER_ENERGY.glyph(0), Some(Glyph::Blank));
        assert_eq!(Glyph::Blank.value(), 0);
    }

    #[test]
    fn test_unknown_pattern() {
        // 0b0000_0001 lights a single segment - not a digit
        assert_eq!(VOLTAGE_CURRENT.glyph(0b0000_0001), None);
        assert_eq!(POWER_ENERGY.glyph(0b000_0001), None);
    }

    #[test]
    fn test_tables_differ() {
        // Same digit, different wiring
        assert_ne!(VOLTAGE_CURRENT.pattern(8), POWER_ENERGY.pattern(8));
    }

    #[test]
    #[should_panic]
    fn test_duplicate_patterns_rejected() {
        let _ = SegmentTable::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 1], 0xFF);
    }

    #[test]
    #[should_panic]
    fn test_out_of_mask_rejected() {
        let _ = SegmentTable::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 0x80], 0x7F);
    }
}
