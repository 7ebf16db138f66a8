//! Property tests for sequence extraction and digit decoding

use proptest::prelude::*;
use segtap_core::{decode, extract_sequence, DecodeError, Quantity};
use segtap_protocol::{Packet, ADDRESS_STEP, DIGIT_SLOTS, POWER_ENERGY, VOLTAGE_CURRENT};

fn write_words(data: &[u8; DIGIT_SLOTS]) -> Vec<u32> {
    data.iter()
        .enumerate()
        .map(|(i, &d)| Packet::write(i as u8 * ADDRESS_STEP, d).to_word())
        .collect()
}

/// Any word whose command is not write-memory
fn foreign_word() -> impl Strategy<Value = u32> {
    (0u32..8, 0u32..(1 << 14))
        .prop_filter("write command", |(cmd, _)| *cmd != 0b101)
        .prop_map(|(cmd, rest)| (cmd << 14) | rest)
}

proptest! {
    #[test]
    fn valid_sequence_extracts(
        data in prop::array::uniform16(any::<u8>()),
        noise in prop::collection::vec(foreign_word(), 0..8),
    ) {
        let mut words = noise.clone();
        words.extend(write_words(&data));
        words.extend(noise);

        let slots = extract_sequence(words).unwrap();
        for (slot, &byte) in data.iter().enumerate() {
            let mask = if slot < 8 { 0b0111_0111 } else { 0xFF };
            prop_assert_eq!(slots.get(slot), byte & mask);
        }
    }

    #[test]
    fn missing_first_address_fails(data in prop::array::uniform16(any::<u8>())) {
        let words = write_words(&data);
        prop_assert_eq!(
            extract_sequence(words[1..].iter().copied()),
            Err(DecodeError::SequenceNotFound)
        );
    }

    #[test]
    fn swapped_addresses_fail(
        data in prop::array::uniform16(any::<u8>()),
        a in 1usize..DIGIT_SLOTS,
        b in 1usize..DIGIT_SLOTS,
    ) {
        prop_assume!(a != b);
        let mut words = write_words(&data);
        words.swap(a, b);
        prop_assert_eq!(extract_sequence(words), Err(DecodeError::SequenceNotFound));
    }

    #[test]
    fn shown_digits_decode_back(
        v in prop::array::uniform4(0u8..10),
        a in prop::array::uniform4(0u8..10),
        w in prop::array::uniform4(0u8..10),
        e in prop::array::uniform4(0u8..10),
        power_decimal: bool,
        energy_kilo: bool,
    ) {
        let mut data = [0u8; DIGIT_SLOTS];
        for i in 0..4 {
            data[i] = VOLTAGE_CURRENT.pattern(v[i]).unwrap();
            data[4 + i] = VOLTAGE_CURRENT.pattern(a[i]).unwrap();
            data[8 + i] = POWER_ENERGY.pattern(w[i]).unwrap() << 1;
            data[12 + i] = POWER_ENERGY.pattern(e[i]).unwrap() << 1;
        }
        data[10] |= power_decimal as u8;
        data[15] |= energy_kilo as u8;

        let slots = extract_sequence(write_words(&data)).unwrap();
        let number = |d: [u8; 4]| d.iter().fold(0u32, |acc, &x| acc * 10 + x as u32);

        prop_assert_eq!(Quantity::Voltage.accumulate(&slots), Ok(number(v)));
        prop_assert_eq!(Quantity::Current.accumulate(&slots), Ok(number(a)));
        prop_assert_eq!(Quantity::Power.accumulate(&slots), Ok(number(w)));

        let reading = decode(&slots).unwrap();
        let kilo = if energy_kilo { 1000 } else { 1 };
        prop_assert_eq!(reading.energy_wh, number(e) * kilo);
        let power = if power_decimal { number(w) as f32 / 10.0 } else { number(w) as f32 };
        prop_assert_eq!(reading.power, power);
    }
}
