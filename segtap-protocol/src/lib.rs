//! TM1621B display bus protocol
//!
//! This crate describes what travels over the three-wire bus between a
//! power meter's microcontroller and its TM1621B segment driver, as seen
//! by a passive tap.
//!
//! # Protocol Overview
//!
//! Each chip-select low interval carries one 17-bit word, clocked in
//! most-significant bit first on rising CLK edges:
//! ```text
//! ┌─────────┬──────────┬─────────────────┐
//! │ COMMAND │ ADDRESS  │ SEGMENT DATA    │
//! │ 3 bits  │ 6 bits   │ 8 bits          │
//! │ 16..14  │ 13..8    │ 7..0            │
//! └─────────┴──────────┴─────────────────┘
//! ```
//!
//! The meter refreshes the display with sixteen write-memory words at
//! addresses 0, 2, …, 30. Each data byte drives one displayed digit, so
//! one full refresh holds every digit of voltage, current, power and
//! energy at the same instant.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod packet;
pub mod segments;

pub use packet::{
    Packet, ADDRESS_STEP, DIGIT_SLOTS, LAST_ADDRESS, WORD_BITS, WORD_MASK, WRITE_COMMAND,
};
pub use segments::{Glyph, SegmentTable, POWER_ENERGY, VOLTAGE_CURRENT};
