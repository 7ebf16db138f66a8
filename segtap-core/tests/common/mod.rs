//! Helpers shared by the integration tests

#![allow(dead_code)]

use core::cell::Cell;

use segtap_core::BitSampler;
use segtap_hal::{Edge, InputPin};
use segtap_protocol::{
    Packet, ADDRESS_STEP, DIGIT_SLOTS, POWER_ENERGY, VOLTAGE_CURRENT, WORD_BITS,
};

/// Scripted DATA line
pub struct DataLine(Cell<bool>);

impl DataLine {
    pub fn new() -> Self {
        Self(Cell::new(false))
    }

    pub fn set(&self, high: bool) {
        self.0.set(high);
    }
}

impl InputPin for DataLine {
    fn is_high(&self) -> bool {
        self.0.get()
    }
}

/// Digits shown by the meter, most significant first. `None` is blank.
#[derive(Clone, Copy)]
pub struct Display {
    pub voltage: [Option<u8>; 4],
    pub current: [Option<u8>; 4],
    pub power: [Option<u8>; 4],
    pub energy: [Option<u8>; 4],
    pub power_decimal: bool,
    pub energy_kilo: bool,
}

/// 12.05 V, 1.23 A, 45.6 W, 789 Wh
pub const BENCH_DISPLAY: Display = Display {
    voltage: [Some(1), Some(2), Some(0), Some(5)],
    current: [None, Some(1), Some(2), Some(3)],
    power: [None, Some(4), Some(5), Some(6)],
    energy: [None, Some(7), Some(8), Some(9)],
    power_decimal: true,
    energy_kilo: false,
};

fn vi(digit: Option<u8>) -> u8 {
    digit.and_then(|d| VOLTAGE_CURRENT.pattern(d)).unwrap_or(0)
}

fn pe(digit: Option<u8>) -> u8 {
    digit.and_then(|d| POWER_ENERGY.pattern(d)).unwrap_or(0) << 1
}

impl Display {
    /// Slot bytes as the meter writes them
    pub fn slot_bytes(&self) -> [u8; DIGIT_SLOTS] {
        let mut raw = [0u8; DIGIT_SLOTS];
        for i in 0..4 {
            // Bit 3 on the low bank is an annunciator and must be masked off
            raw[i] = vi(self.voltage[i]) | 0b0000_1000;
            raw[4 + i] = vi(self.current[i]);
            raw[8 + i] = pe(self.power[i]);
            raw[12 + i] = pe(self.energy[i]);
        }
        raw[10] |= self.power_decimal as u8;
        raw[15] |= self.energy_kilo as u8;
        raw
    }

    /// One refresh as bus words, addresses 0 to 30
    pub fn refresh(&self) -> Vec<u32> {
        self.slot_bytes()
            .iter()
            .enumerate()
            .map(|(i, &data)| Packet::write(i as u8 * ADDRESS_STEP, data).to_word())
            .collect()
    }
}

/// Clock one word through the sampler, MSB first
pub fn clock_word(sampler: &mut BitSampler<'_>, data: &DataLine, word: u32) {
    sampler.chip_select(Edge::Falling);
    for bit in (0..WORD_BITS).rev() {
        data.set((word >> bit) & 1 == 1);
        sampler.clock(data);
    }
    sampler.chip_select(Edge::Rising);
}

/// Clock a whole word stream through the sampler
pub fn clock_words(sampler: &mut BitSampler<'_>, data: &DataLine, words: &[u32]) {
    for &word in words {
        clock_word(sampler, data, word);
    }
}
