//! Board-agnostic core logic for the segtap bus tap
//!
//! This crate contains everything between the GPIO edges and the decoded
//! meter values, with no dependency on a specific chip:
//!
//! - Frame buffer shared between the capture and report contexts
//! - Bit sampler driven by chip-select and clock edges
//! - Write-sequence extraction and validation
//! - Seven-segment digit decoding and scaling
//! - Meter facade with the per-quantity accessors
//! - Configuration types and parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod capture;
pub mod config;
pub mod decode;
pub mod meter;

pub use capture::{
    BitSampler, CaptureStats, FrameBuffer, Snapshot, FRAME_CAPACITY, MARKED_MAX_EDGES,
};
pub use config::{parse_config, ConfigError, MeterConfig};
pub use decode::{decode, extract_sequence, DecodeError, DigitSlots, Quantity, Reading};
pub use meter::{MeterTap, RawDump, Report, ENERGY_SENTINEL, FLOAT_SENTINEL};
